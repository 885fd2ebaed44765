// ==========================================
// 库存作业列表引擎 - 应用层
// ==========================================
// 职责: 组装数据库、仓储、配置与视图
// ==========================================

pub mod seed;
pub mod state;

// 重导出
pub use seed::seed_demo_data;
pub use state::{get_default_db_path, AppState};
