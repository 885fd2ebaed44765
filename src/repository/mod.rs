// ==========================================
// 库存作业列表引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑（状态合法性校验除外,防止脏写）
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod stock_operation_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use stock_operation_repo::StockOperationRepository;
