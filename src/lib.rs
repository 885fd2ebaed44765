// ==========================================
// 库存作业列表引擎 - 核心库
// ==========================================
// 职责: 分页拉取库存作业,客户端过滤,行展开,
//       状态操作确认与缓存失效
// 技术栈: Rust + SQLite (本地存储) + tokio
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 本地存储
pub mod repository;

// 引擎层 - 分页/过滤/展开/操作分发
pub mod engine;

// 视图层 - 组合与渲染
pub mod view;

// 配置层 - 只读配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 对外错误类型
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ActionKind, ColumnKey, StockOperationStatus};

// 领域实体
pub use domain::{PageState, StockOperation, StockOperationItem, StockOperationPage, TableHeader};

// 引擎
pub use engine::{
    ActionDispatcher, FilterCriteria, FilterEngine, InvalidationBus, PageDataSource,
    RowExpansionStore,
};

// 视图
pub use view::{RenderedView, StockOperationsView};

// 错误
pub use api::{ApiError, ApiResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存作业列表引擎";
