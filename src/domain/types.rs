// ==========================================
// 库存作业列表引擎 - 领域类型定义
// ==========================================
// 职责: 作业状态、状态 → 合法操作映射、列键
// 红线: 合法操作只由状态决定,不在调用方散落判断
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 作业状态 (Stock Operation Status)
// ==========================================
// 主线: NEW → IN_PROGRESS → COMPLETED
// 序列化格式: SCREAMING_SNAKE_CASE (与 REST 载荷一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockOperationStatus {
    New,        // 新建
    Submitted,  // 已提交审批
    InProgress, // 执行中
    Approved,   // 已审批
    Dispatched, // 已发出
    Returned,   // 已退回
    Rejected,   // 已驳回
    Cancelled,  // 已取消
    Completed,  // 已完成
}

impl StockOperationStatus {
    pub const ALL: [StockOperationStatus; 9] = [
        StockOperationStatus::New,
        StockOperationStatus::Submitted,
        StockOperationStatus::InProgress,
        StockOperationStatus::Approved,
        StockOperationStatus::Dispatched,
        StockOperationStatus::Returned,
        StockOperationStatus::Rejected,
        StockOperationStatus::Cancelled,
        StockOperationStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StockOperationStatus::New => "NEW",
            StockOperationStatus::Submitted => "SUBMITTED",
            StockOperationStatus::InProgress => "IN_PROGRESS",
            StockOperationStatus::Approved => "APPROVED",
            StockOperationStatus::Dispatched => "DISPATCHED",
            StockOperationStatus::Returned => "RETURNED",
            StockOperationStatus::Rejected => "REJECTED",
            StockOperationStatus::Cancelled => "CANCELLED",
            StockOperationStatus::Completed => "COMPLETED",
        }
    }

    /// 该状态下允许的操作集合
    ///
    /// 新增状态/操作只需在此表追加一行
    pub fn legal_actions(self) -> &'static [ActionKind] {
        use ActionKind::*;
        match self {
            StockOperationStatus::New => &[Submit, Complete, Cancel],
            StockOperationStatus::Submitted => &[Approve, Reject, Return, Cancel],
            StockOperationStatus::InProgress => &[Complete, Cancel],
            StockOperationStatus::Approved => &[Dispatch, Complete, Cancel],
            StockOperationStatus::Dispatched => &[Complete],
            StockOperationStatus::Returned => &[Submit, Cancel],
            StockOperationStatus::Rejected
            | StockOperationStatus::Cancelled
            | StockOperationStatus::Completed => &[],
        }
    }

    /// 是否为终态（无任何后续操作）
    pub fn is_terminal(self) -> bool {
        self.legal_actions().is_empty()
    }

    pub fn allows(self, action: ActionKind) -> bool {
        self.legal_actions().contains(&action)
    }
}

impl fmt::Display for StockOperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockOperationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        StockOperationStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("未知作业状态: {}", s))
    }
}

// ==========================================
// 作业操作 (Action Kind)
// ==========================================
// 每个操作对应一个目标状态,以及 REST 操作名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Submit,
    Approve,
    Reject,
    Return,
    Dispatch,
    Complete,
    Cancel,
}

impl ActionKind {
    /// REST 操作名（stockoperationaction 的 name 字段）
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Submit => "SUBMIT",
            ActionKind::Approve => "APPROVE",
            ActionKind::Reject => "REJECT",
            ActionKind::Return => "RETURN",
            ActionKind::Dispatch => "DISPATCH",
            ActionKind::Complete => "COMPLETE",
            ActionKind::Cancel => "CANCEL",
        }
    }

    /// 操作成功后的目标状态
    pub fn target_status(&self) -> StockOperationStatus {
        match self {
            ActionKind::Submit => StockOperationStatus::Submitted,
            ActionKind::Approve => StockOperationStatus::Approved,
            ActionKind::Reject => StockOperationStatus::Rejected,
            ActionKind::Return => StockOperationStatus::Returned,
            ActionKind::Dispatch => StockOperationStatus::Dispatched,
            ActionKind::Complete => StockOperationStatus::Completed,
            ActionKind::Cancel => StockOperationStatus::Cancelled,
        }
    }

    /// 菜单显示名的翻译键
    pub fn label_key(&self) -> &'static str {
        match self {
            ActionKind::Submit => "actions.submit",
            ActionKind::Approve => "actions.approve",
            ActionKind::Reject => "actions.reject",
            ActionKind::Return => "actions.return",
            ActionKind::Dispatch => "actions.dispatch",
            ActionKind::Complete => "actions.complete",
            ActionKind::Cancel => "actions.cancel",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 列键 (Column Key)
// ==========================================
// 与表头 key 对齐；渲染出的列同时决定自由文本搜索的字段集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKey {
    OperationTypeName,
    Status,
    Source,
    Destination,
    ResponsiblePerson,
    OperationDate,
}

impl ColumnKey {
    /// 默认列顺序
    pub const DEFAULT_COLUMNS: [ColumnKey; 6] = [
        ColumnKey::OperationTypeName,
        ColumnKey::Status,
        ColumnKey::Source,
        ColumnKey::Destination,
        ColumnKey::ResponsiblePerson,
        ColumnKey::OperationDate,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            ColumnKey::OperationTypeName => "columns.operation_type",
            ColumnKey::Status => "columns.status",
            ColumnKey::Source => "columns.source",
            ColumnKey::Destination => "columns.destination",
            ColumnKey::ResponsiblePerson => "columns.responsible_person",
            ColumnKey::OperationDate => "columns.operation_date",
        }
    }
}
