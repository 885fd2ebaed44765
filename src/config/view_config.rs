// ==========================================
// 库存作业列表引擎 - 视图配置
// ==========================================
// 视图挂载时读取一次,之后只读
// ==========================================

use crate::config::config_manager::{
    DEFAULT_LOCALE, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZES, DEFAULT_REST_BASE_URL,
};
use crate::config::view_config_trait::{ConfigResult, ViewConfigReader};
use crate::engine::events::STOCK_OPERATION_RESOURCE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub stock_source_type_uuid: Option<String>,
    pub rest_base_url: String,
    pub page_sizes: Vec<u32>,
    pub default_page_size: u32,
    pub locale: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            stock_source_type_uuid: None,
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            default_page_size: DEFAULT_PAGE_SIZE,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ViewConfig {
    /// 从配置读取器加载
    ///
    /// 默认每页条数不在候选列表中时补入候选列表
    pub async fn load(reader: &dyn ViewConfigReader) -> ConfigResult<Self> {
        let mut config = Self {
            stock_source_type_uuid: reader.get_stock_source_type_uuid().await?,
            rest_base_url: reader.get_rest_base_url().await?,
            page_sizes: reader.get_page_sizes().await?,
            default_page_size: reader.get_default_page_size().await?,
            locale: reader.get_locale().await?,
        };

        if !config.page_sizes.contains(&config.default_page_size) {
            tracing::warn!(
                default_page_size = config.default_page_size,
                page_sizes = ?config.page_sizes,
                "默认每页条数不在候选列表中,已补入"
            );
            config.page_sizes.push(config.default_page_size);
            config.page_sizes.sort_unstable();
        }

        tracing::debug!(
            rest_base_url = %config.rest_base_url,
            locale = %config.locale,
            default_page_size = config.default_page_size,
            "视图配置已加载"
        );
        Ok(config)
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// 作业集合的完整资源路径（失效前缀）
    pub fn stock_operation_resource_path(&self) -> String {
        format!("{}{}", self.rest_base_url, STOCK_OPERATION_RESOURCE)
    }
}
