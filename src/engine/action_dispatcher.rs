// ==========================================
// 库存作业列表引擎 - 操作分发器
// ==========================================
// 职责: 按作业状态给出可用操作；发起确认对话框；
//       收到确认后执行远程状态变更,成功则失效缓存并提示
// 约束:
// - invoke 不阻塞、不改变状态,只登记意图
// - 失败不做缓存失效,也不刷新
// - 未知意图的事件一律拒绝
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ViewConfig;
use crate::domain::{ActionKind, StockOperation, StockOperationStatus};
use crate::engine::events::{
    ActionContext, CacheInvalidator, DialogEvent, DialogPresenter, Notification,
    STOCK_OPERATION_DIALOG_ID,
};
use crate::engine::ports::StockOperationMutator;
use crate::i18n;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 对话框事件的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// 远程状态变更已成功
    Applied {
        operation_uuid: String,
        action: ActionKind,
    },
    /// 用户取消,未发起任何调用
    Cancelled,
}

pub struct ActionDispatcher {
    mutator: Arc<dyn StockOperationMutator>,
    presenter: Arc<dyn DialogPresenter>,
    invalidator: Arc<dyn CacheInvalidator>,
    resource_path: String,
    locale: String,
    stock_source_type_uuid: Option<String>,
    pending: HashMap<Uuid, ActionContext>,
}

impl ActionDispatcher {
    pub fn new(
        mutator: Arc<dyn StockOperationMutator>,
        presenter: Arc<dyn DialogPresenter>,
        invalidator: Arc<dyn CacheInvalidator>,
        config: &ViewConfig,
    ) -> Self {
        Self {
            mutator,
            presenter,
            invalidator,
            resource_path: config.stock_operation_resource_path(),
            locale: config.locale.clone(),
            stock_source_type_uuid: config.stock_source_type_uuid.clone(),
            pending: HashMap::new(),
        }
    }

    /// 状态对应的可用操作（菜单按此渲染）
    pub fn available_actions(status: StockOperationStatus) -> &'static [ActionKind] {
        status.legal_actions()
    }

    /// 失效前缀
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// 等待对话框回应的意图数量
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_intent(&self, intent_id: &Uuid) -> Option<&ActionContext> {
        self.pending.get(intent_id)
    }

    /// 发起操作：校验状态后打开确认对话框
    ///
    /// # 返回
    /// - Ok(intent_id): 对话框事件需回带该 ID
    /// - Err(InvalidStateTransition): 当前状态不允许该操作
    pub fn invoke(&mut self, operation: &StockOperation, action: ActionKind) -> ApiResult<Uuid> {
        if !operation.status.allows(action) {
            tracing::warn!(
                operation = %operation.uuid,
                status = operation.status.as_str(),
                action = action.as_str(),
                "当前状态不允许该操作"
            );
            return Err(ApiError::InvalidStateTransition {
                from: operation.status.as_str().to_string(),
                to: action.target_status().as_str().to_string(),
            });
        }

        let intent_id = Uuid::new_v4();
        let context = ActionContext {
            intent_id,
            operation: operation.clone(),
            action,
            action_label: i18n::t_for(action.label_key(), &self.locale),
            stock_source_type_uuid: self.stock_source_type_uuid.clone(),
        };

        self.pending.insert(intent_id, context.clone());
        tracing::info!(
            intent_id = %intent_id,
            operation = %operation.uuid,
            action = action.as_str(),
            "打开作业操作对话框"
        );
        self.presenter.show_dialog(STOCK_OPERATION_DIALOG_ID, context);

        Ok(intent_id)
    }

    /// 处理对话框回送的事件
    ///
    /// 意图在处理前即被消费；失败后需重新 invoke
    pub async fn handle_dialog_event(&mut self, event: DialogEvent) -> ApiResult<ActionOutcome> {
        let intent_id = event.intent_id();
        let context = self
            .pending
            .remove(&intent_id)
            .ok_or_else(|| ApiError::NotFound(format!("对话框意图(id={})不存在", intent_id)))?;

        let reason = match event {
            DialogEvent::Cancelled { .. } => {
                tracing::info!(intent_id = %intent_id, "用户取消作业操作");
                return Ok(ActionOutcome::Cancelled);
            }
            DialogEvent::Confirmed { reason, .. } => reason,
        };

        let ActionContext {
            operation,
            action,
            action_label,
            ..
        } = context;

        let result = self
            .mutator
            .execute_action(&operation.uuid, action, reason.as_deref())
            .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    operation = %operation.uuid,
                    action = action.as_str(),
                    "作业操作成功,失效列表缓存"
                );
                self.invalidator.invalidate(&self.resource_path);
                self.presenter.show_notification(Notification::success(
                    i18n::t_for_args(
                        "notifications.action_success",
                        &self.locale,
                        &[("action", action_label.as_str())],
                    ),
                    operation.operation_type_name.clone(),
                ));
                Ok(ActionOutcome::Applied {
                    operation_uuid: operation.uuid,
                    action,
                })
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(
                    operation = %operation.uuid,
                    action = action.as_str(),
                    error = %reason,
                    "作业操作失败"
                );
                self.presenter.show_notification(Notification::error(
                    i18n::t_for_args(
                        "notifications.action_failed",
                        &self.locale,
                        &[("action", action_label.as_str())],
                    ),
                    reason.clone(),
                ));
                Err(ApiError::ActionFailed {
                    action,
                    operation_uuid: operation.uuid,
                    reason,
                })
            }
        }
    }

    /// 手动刷新：与成功操作相同的失效,不经过对话框
    pub fn refresh(&self) {
        tracing::info!(prefix = %self.resource_path, "手动刷新作业列表");
        self.invalidator.invalidate(&self.resource_path);
    }
}
