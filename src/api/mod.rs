// ==========================================
// 库存作业列表引擎 - 对外错误边界
// ==========================================

pub mod error;

pub use error::{ApiError, ApiResult};
