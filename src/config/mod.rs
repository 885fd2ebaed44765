// ==========================================
// 库存作业列表引擎 - 配置层
// ==========================================
// 职责: 只读的 key/value 配置
// 存储: config_kv 表 (scope_id = 'global')
// ==========================================

pub mod config_manager;
pub mod view_config;
pub mod view_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use view_config::ViewConfig;
pub use view_config_trait::{ConfigResult, ViewConfigReader};
