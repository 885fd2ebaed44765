// ==========================================
// 库存作业列表引擎 - 对话框与缓存失效协作方
// ==========================================
// 职责: 定义分发器与 UI 之间的消息契约
// 说明: 分发器发出意图(intent),对话框回送确认/取消事件,
//       核心逻辑不依赖真实对话框即可测试
// ==========================================

use crate::domain::{ActionKind, StockOperation};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// 作业操作确认对话框 ID
pub const STOCK_OPERATION_DIALOG_ID: &str = "stock-operation-dialog";

/// 库存作业集合资源路径（不含 REST 前缀）
pub const STOCK_OPERATION_RESOURCE: &str = "/stockmanagement/stockoperation";

// ==========================================
// 对话框消息
// ==========================================

/// 打开对话框时携带的上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContext {
    pub intent_id: Uuid,
    pub operation: StockOperation,
    pub action: ActionKind,
    /// 已翻译的操作显示名
    pub action_label: String,
    /// 来源位置类型；对话框据此决定可选的来源列表
    pub stock_source_type_uuid: Option<String>,
}

/// 对话框回送的事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DialogEvent {
    Confirmed {
        intent_id: Uuid,
        reason: Option<String>,
    },
    Cancelled {
        intent_id: Uuid,
    },
}

impl DialogEvent {
    pub fn intent_id(&self) -> Uuid {
        match self {
            DialogEvent::Confirmed { intent_id, .. } | DialogEvent::Cancelled { intent_id } => {
                *intent_id
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Success,
    Error,
}

/// 提示消息（toast / 对话框内错误）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub subtitle: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    pub fn error(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

// ==========================================
// 协作方 Trait
// ==========================================

/// 对话框/提示协作方
///
/// 两个方法都是 fire-and-forget,不阻塞分发器
pub trait DialogPresenter: Send + Sync {
    fn show_dialog(&self, dialog_id: &str, context: ActionContext);

    fn show_notification(&self, notification: Notification);
}

/// 缓存失效协作方
///
/// 按前缀/子串匹配资源路径,多次失效同一路径可安全合并
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, resource_path_prefix: &str);
}

/// 空操作对话框（无界面运行时使用）
#[derive(Debug, Clone, Default)]
pub struct NoOpDialogPresenter;

impl DialogPresenter for NoOpDialogPresenter {
    fn show_dialog(&self, dialog_id: &str, context: ActionContext) {
        tracing::debug!(
            dialog_id,
            intent_id = %context.intent_id,
            action = context.action.as_str(),
            "NoOpDialogPresenter: 跳过对话框"
        );
    }

    fn show_notification(&self, notification: Notification) {
        tracing::debug!(
            kind = ?notification.kind,
            title = %notification.title,
            "NoOpDialogPresenter: 跳过提示"
        );
    }
}

// ==========================================
// 通道实现
// ==========================================

/// 发往 UI 任务的消息
#[derive(Debug, Clone, PartialEq)]
pub enum DialogMessage {
    Show {
        dialog_id: String,
        context: ActionContext,
    },
    Notify(Notification),
}

/// 通过 mpsc 通道把对话框请求交给另一个任务处理
#[derive(Debug, Clone)]
pub struct ChannelDialogPresenter {
    tx: mpsc::UnboundedSender<DialogMessage>,
}

impl ChannelDialogPresenter {
    /// 创建通道对；接收端交给 UI 任务
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DialogMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, message: DialogMessage) {
        if self.tx.send(message).is_err() {
            tracing::warn!("对话框接收端已关闭,消息被丢弃");
        }
    }
}

impl DialogPresenter for ChannelDialogPresenter {
    fn show_dialog(&self, dialog_id: &str, context: ActionContext) {
        self.send(DialogMessage::Show {
            dialog_id: dialog_id.to_string(),
            context,
        });
    }

    fn show_notification(&self, notification: Notification) {
        self.send(DialogMessage::Notify(notification));
    }
}
