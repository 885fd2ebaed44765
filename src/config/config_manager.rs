// ==========================================
// 库存作业列表引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::view_config_trait::{ConfigResult, ViewConfigReader};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 默认每页条数候选
pub const DEFAULT_PAGE_SIZES: [u32; 5] = [10, 20, 30, 40, 50];

pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub const DEFAULT_REST_BASE_URL: &str = "/ws/rest/v1";

pub const DEFAULT_LOCALE: &str = "en";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 的配置值（初始化/演示数据使用）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> ConfigResult<HashMap<String, String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }
}

/// 解析每页条数列表：优先 JSON 数组,其次逗号分隔
///
/// 0 被过滤,结果去重升序；解析不出任何值时返回 None
pub fn parse_page_sizes(raw: &str) -> Option<Vec<u32>> {
    let mut sizes: Vec<u32> = match serde_json::from_str::<Vec<u32>>(raw) {
        Ok(values) => values,
        Err(_) => raw
            .trim_matches(|c| c == '[' || c == ']')
            .split(',')
            .filter_map(|s| s.trim().parse::<u32>().ok())
            .collect(),
    };

    sizes.retain(|&s| s > 0);
    sizes.sort_unstable();
    sizes.dedup();

    if sizes.is_empty() {
        None
    } else {
        Some(sizes)
    }
}

#[async_trait]
impl ViewConfigReader for ConfigManager {
    async fn get_stock_source_type_uuid(&self) -> ConfigResult<Option<String>> {
        Ok(self
            .get_config_value(config_keys::STOCK_SOURCE_TYPE_UUID)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    async fn get_rest_base_url(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::REST_BASE_URL, DEFAULT_REST_BASE_URL)?;
        Ok(value.trim().trim_end_matches('/').to_string())
    }

    async fn get_page_sizes(&self) -> ConfigResult<Vec<u32>> {
        let value = match self.get_config_value(config_keys::PAGE_SIZES)? {
            Some(v) => v,
            None => return Ok(DEFAULT_PAGE_SIZES.to_vec()),
        };

        match parse_page_sizes(&value) {
            Some(sizes) => Ok(sizes),
            None => {
                tracing::warn!(value = %value, "page_sizes 配置无效,使用默认值");
                Ok(DEFAULT_PAGE_SIZES.to_vec())
            }
        }
    }

    async fn get_default_page_size(&self) -> ConfigResult<u32> {
        let value = self.get_config_or_default(
            config_keys::DEFAULT_PAGE_SIZE,
            &DEFAULT_PAGE_SIZE.to_string(),
        )?;

        match value.trim().parse::<u32>() {
            Ok(size) if size > 0 => Ok(size),
            _ => {
                tracing::warn!(value = %value, "default_page_size 配置无效,使用默认值");
                Ok(DEFAULT_PAGE_SIZE)
            }
        }
    }

    async fn get_locale(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::LOCALE, DEFAULT_LOCALE)?;
        let locale = value.trim();
        if crate::i18n::is_supported_locale(locale) {
            Ok(locale.to_string())
        } else {
            tracing::warn!(locale = %locale, "不支持的语言,使用默认值");
            Ok(DEFAULT_LOCALE.to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 外部数据
    pub const STOCK_SOURCE_TYPE_UUID: &str = "stock_source_type_uuid";
    pub const REST_BASE_URL: &str = "rest_base_url";

    // 分页
    pub const PAGE_SIZES: &str = "page_sizes";
    pub const DEFAULT_PAGE_SIZE: &str = "default_page_size";

    // 界面
    pub const LOCALE: &str = "locale";
}
