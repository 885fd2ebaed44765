// ==========================================
// 库存作业列表引擎 - 外部数据协作方
// ==========================================
// 说明: Engine 层定义 trait,传输层（REST/本地库）实现
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{ActionKind, StockOperationPage};
use async_trait::async_trait;

/// 分页拉取协作方
///
/// 只被 `PageDataSource` 调用
#[async_trait]
pub trait StockOperationFetcher: Send + Sync {
    /// 拉取一页（page 从 1 开始）
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<StockOperationPage>;
}

/// 远程状态变更协作方
///
/// 只被 `ActionDispatcher` 在收到确认后调用
#[async_trait]
pub trait StockOperationMutator: Send + Sync {
    async fn execute_action(
        &self,
        operation_uuid: &str,
        action: ActionKind,
        reason: Option<&str>,
    ) -> ApiResult<()>;
}
