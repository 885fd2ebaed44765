// ==========================================
// 库存作业列表引擎 - 库存作业领域模型
// ==========================================
// 对齐: REST stockoperation 载荷 (camelCase)
// 红线: uuid 在同一页内唯一；明细行只属于其父作业
// ==========================================

use crate::domain::date_format;
use crate::domain::types::{ActionKind, ColumnKey, StockOperationStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// StockOperation - 库存作业
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOperation {
    pub uuid: String,
    pub operation_type_name: String,
    pub status: StockOperationStatus,

    // ===== 库位 =====
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub destination_name: Option<String>,

    // ===== 责任人 / 创建人 =====
    #[serde(default)]
    pub responsible_person_given_name: Option<String>,
    #[serde(default)]
    pub responsible_person_family_name: Option<String>,
    #[serde(default)]
    pub creator_given_name: Option<String>,
    #[serde(default)]
    pub creator_family_name: Option<String>,

    // ===== 日期 =====
    #[serde(with = "date_format")]
    pub operation_date: NaiveDate,
    #[serde(with = "date_format")]
    pub date_created: NaiveDate,
    #[serde(default, with = "date_format::option")]
    pub completed_date: Option<NaiveDate>,

    #[serde(default)]
    pub stock_operation_items: Vec<StockOperationItem>,
}

// ==========================================
// StockOperationItem - 作业明细（批次）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOperationItem {
    #[serde(default)]
    pub batch_no: String,
    pub quantity: u32,
}

/// 人名（名 + 姓）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

impl PersonName {
    pub fn is_empty(&self) -> bool {
        self.to_string().is_empty()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        f.write_str(&parts.join(" "))
    }
}

impl StockOperation {
    pub fn responsible_person(&self) -> PersonName {
        PersonName {
            given_name: self.responsible_person_given_name.clone(),
            family_name: self.responsible_person_family_name.clone(),
        }
    }

    pub fn creator(&self) -> PersonName {
        PersonName {
            given_name: self.creator_given_name.clone(),
            family_name: self.creator_family_name.clone(),
        }
    }

    /// 当前状态下允许的操作
    pub fn legal_actions(&self) -> &'static [ActionKind] {
        self.status.legal_actions()
    }

    /// 某一列的显示文本；缺省字段显示为空串
    pub fn display_value(&self, column: ColumnKey) -> String {
        match column {
            ColumnKey::OperationTypeName => self.operation_type_name.clone(),
            ColumnKey::Status => self.status.to_string(),
            ColumnKey::Source => self.source_name.clone().unwrap_or_default(),
            ColumnKey::Destination => self.destination_name.clone().unwrap_or_default(),
            ColumnKey::ResponsiblePerson => self.responsible_person().to_string(),
            ColumnKey::OperationDate => {
                self.operation_date.format(date_format::DATE_FORMAT).to_string()
            }
        }
    }

    /// 参与自由文本搜索的字段值,即 `columns` 各列的显示文本
    pub fn searchable_values<'a>(
        &'a self,
        columns: &'a [ColumnKey],
    ) -> impl Iterator<Item = String> + 'a {
        columns.iter().map(move |column| self.display_value(*column))
    }

    /// 明细总数量
    pub fn total_quantity(&self) -> u64 {
        self.stock_operation_items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }
}
