// ==========================================
// 库存作业列表引擎 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享资源（连接/仓储/配置/失效总线）
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ViewConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::events::DialogPresenter;
use crate::engine::invalidation::InvalidationBus;
use crate::repository::StockOperationRepository;
use crate::view::{StockOperationsView, ViewCollaborators};

/// 应用状态
///
/// 同一连接由仓储与配置管理器共享
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub repository: Arc<StockOperationRepository>,

    pub config_manager: Arc<ConfigManager>,

    /// 作业列表缓存失效总线
    pub invalidation_bus: InvalidationBus,
}

impl AppState {
    /// 打开数据库并初始化表结构
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| ApiError::DatabaseError(format!("无法打开数据库: {}", e)))?;
        init_schema(&conn)
            .map_err(|e| ApiError::DatabaseError(format!("表结构初始化失败: {}", e)))?;
        let conn = Arc::new(Mutex::new(conn));

        let repository = Arc::new(StockOperationRepository::new(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| ApiError::InternalError(format!("无法创建ConfigManager: {}", e)))?,
        );

        Ok(Self {
            db_path,
            repository,
            config_manager,
            invalidation_bus: InvalidationBus::new(),
        })
    }

    /// 读取视图配置
    pub async fn load_view_config(&self) -> ApiResult<ViewConfig> {
        ViewConfig::load(self.config_manager.as_ref())
            .await
            .map_err(|e| ApiError::InternalError(format!("视图配置加载失败: {}", e)))
    }

    /// 以本地仓储为拉取/变更协作方构造列表视图（未挂载）
    pub async fn build_view(
        &self,
        presenter: Arc<dyn DialogPresenter>,
    ) -> ApiResult<StockOperationsView> {
        let config = self.load_view_config().await?;
        let collaborators = ViewCollaborators::with_bus(
            self.repository.clone(),
            self.repository.clone(),
            presenter,
            &self.invalidation_bus,
        );
        Ok(StockOperationsView::new(config, collaborators))
    }
}

/// 默认数据库路径
///
/// 优先使用环境变量 STOCK_OPERATIONS_DB_PATH,其次用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("STOCK_OPERATIONS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./stock_operations.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("stock-operations");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("stock_operations.db");
        }
    }

    path.to_string_lossy().to_string()
}
