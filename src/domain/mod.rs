// ==========================================
// 库存作业列表引擎 - 领域层
// ==========================================
// 职责: 实体与类型定义,不含 IO
// ==========================================

pub mod date_format;
pub mod page;
pub mod stock_operation;
pub mod types;

// 重导出核心实体
pub use page::{PageState, StockOperationPage, TableHeader};
pub use stock_operation::{PersonName, StockOperation, StockOperationItem};
pub use types::{ActionKind, ColumnKey, StockOperationStatus};
