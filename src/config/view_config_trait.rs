// ==========================================
// 库存作业列表引擎 - 视图配置读取 Trait
// ==========================================
// 职责: 定义列表视图所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ViewConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
// 约定: 配置缺失或格式错误时返回默认值,不报错
#[async_trait]
pub trait ViewConfigReader: Send + Sync {
    /// 库存来源类型 UUID（外部配置,未设置时为 None）
    async fn get_stock_source_type_uuid(&self) -> ConfigResult<Option<String>>;

    /// REST 前缀
    ///
    /// # 默认值
    /// - /ws/rest/v1
    async fn get_rest_base_url(&self) -> ConfigResult<String>;

    /// 可选的每页条数
    ///
    /// # 默认值
    /// - [10, 20, 30, 40, 50]
    async fn get_page_sizes(&self) -> ConfigResult<Vec<u32>>;

    /// 默认每页条数
    ///
    /// # 默认值
    /// - 10
    async fn get_default_page_size(&self) -> ConfigResult<u32>;

    /// 界面语言（"en" 或 "zh-CN"）
    ///
    /// # 默认值
    /// - en
    async fn get_locale(&self) -> ConfigResult<String>;
}
