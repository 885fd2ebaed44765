// ==========================================
// 库存作业列表引擎 - 对外错误类型
// ==========================================
// 职责: 统一引擎/视图边界上的错误,转换仓储错误为可展示的消息
// 约束: 所有失败在异步边界被捕获并转为可观察状态,不进入渲染路径
// ==========================================

use crate::domain::ActionKind;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 异步调用失败
    // ==========================================
    /// 分页拉取失败：保留上一页数据,不自动重试
    #[error("数据加载失败: {0}")]
    TransientFetchError(String),

    /// 远程状态变更失败：不做缓存失效,状态保持不变
    #[error("操作失败: action={action}, operation={operation_uuid}, reason={reason}")]
    ActionFailed {
        action: ActionKind,
        operation_uuid: String,
        reason: String,
    },

    // ==========================================
    // 输入/规则错误
    // ==========================================
    /// 日期区间等用户输入格式错误
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为可由调用方重新发起的瞬时错误
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::TransientFetchError(_))
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::InvalidInput(format!("外键约束违反: {}", msg))
            }
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
