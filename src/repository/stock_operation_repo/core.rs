use crate::api::error::ApiResult;
use crate::domain::date_format::DATE_FORMAT;
use crate::domain::{ActionKind, StockOperation, StockOperationPage, StockOperationStatus};
use crate::engine::ports::{StockOperationFetcher, StockOperationMutator};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// StockOperationRepository - 库存作业仓储
// ==========================================
// 红线: 状态变更必须经过状态 → 合法操作表校验
pub struct StockOperationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StockOperationRepository {
    /// 创建新的库存作业仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入作业及其明细（同一事务）
    ///
    /// # 返回
    /// - `Ok(uuid)`: 成功插入
    /// - `Err(UniqueConstraintViolation)`: uuid 重复
    pub fn insert(&self, op: &StockOperation) -> RepositoryResult<String> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO stock_operation (
                uuid, operation_type_name, status, source_name, destination_name,
                responsible_person_given_name, responsible_person_family_name,
                creator_given_name, creator_family_name,
                operation_date, date_created, completed_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                op.uuid,
                op.operation_type_name,
                op.status.as_str(),
                op.source_name,
                op.destination_name,
                op.responsible_person_given_name,
                op.responsible_person_family_name,
                op.creator_given_name,
                op.creator_family_name,
                op.operation_date.format(DATE_FORMAT).to_string(),
                op.date_created.format(DATE_FORMAT).to_string(),
                op.completed_date.map(|d| d.format(DATE_FORMAT).to_string()),
            ],
        )?;

        for (position, item) in op.stock_operation_items.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO stock_operation_item (operation_uuid, position, batch_no, quantity)
                VALUES (?, ?, ?, ?)
                "#,
                params![op.uuid, position as i64, item.batch_no, i64::from(item.quantity)],
            )?;
        }

        tx.commit()?;
        Ok(op.uuid.clone())
    }

    /// 执行状态变更操作
    ///
    /// # 参数
    /// - `uuid`: 作业ID
    /// - `action`: 操作
    /// - `reason`: 操作原因（驳回/退回/取消时由对话框填写）
    /// - `effective_date`: 完成日期（仅 Complete 写入 completed_date）
    ///
    /// # 返回
    /// - `Ok(status)`: 变更后的状态
    /// - `Err(NotFound)`: 作业不存在
    /// - `Err(InvalidStateTransition)`: 当前状态不允许该操作
    pub fn apply_action(
        &self,
        uuid: &str,
        action: ActionKind,
        reason: Option<&str>,
        effective_date: NaiveDate,
    ) -> RepositoryResult<StockOperationStatus> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let raw_status: Option<String> = tx
            .query_row(
                "SELECT status FROM stock_operation WHERE uuid = ?1",
                params![uuid],
                |row| row.get(0),
            )
            .optional()?;

        let raw_status = raw_status.ok_or_else(|| RepositoryError::NotFound {
            entity: "StockOperation".to_string(),
            id: uuid.to_string(),
        })?;

        let current = raw_status
            .parse::<StockOperationStatus>()
            .map_err(|message| RepositoryError::FieldValueError {
                field: "status".to_string(),
                message,
            })?;

        let target = action.target_status();
        if !current.allows(action) {
            return Err(RepositoryError::InvalidStateTransition {
                from: current.to_string(),
                to: target.to_string(),
            });
        }

        let completed_date = if action == ActionKind::Complete {
            Some(effective_date.format(DATE_FORMAT).to_string())
        } else {
            None
        };

        tx.execute(
            r#"
            UPDATE stock_operation
            SET status = ?1,
                completed_date = COALESCE(?2, completed_date),
                status_reason = ?3
            WHERE uuid = ?4
            "#,
            params![target.as_str(), completed_date, reason, uuid],
        )?;

        tx.commit()?;

        tracing::info!(
            operation_uuid = uuid,
            action = action.as_str(),
            from = current.as_str(),
            to = target.as_str(),
            "作业状态已变更"
        );
        Ok(target)
    }
}

// ==========================================
// 协作方实现
// ==========================================

#[async_trait]
impl StockOperationFetcher for StockOperationRepository {
    async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<StockOperationPage> {
        Ok(self.find_page(page, page_size)?)
    }
}

#[async_trait]
impl StockOperationMutator for StockOperationRepository {
    async fn execute_action(
        &self,
        operation_uuid: &str,
        action: ActionKind,
        reason: Option<&str>,
    ) -> ApiResult<()> {
        let today = chrono::Local::now().date_naive();
        self.apply_action(operation_uuid, action, reason, today)?;
        Ok(())
    }
}
