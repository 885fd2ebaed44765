// ==========================================
// 库存作业列表视图 - 渲染结果
// ==========================================
// 渲染产物只是数据；文本输出见 Display 实现
// ==========================================

use crate::domain::{ActionKind, TableHeader};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedView {
    pub title: String,
    pub subtitle: String,
    pub filter_bar: FilterBar,
    pub body: ViewBody,
    pub pagination: PaginationBar,
    pub is_loading: bool,
    /// 拉取失败的提示（不阻断渲染）
    pub fetch_error: Option<String>,
    /// 日期输入错误
    pub validation_error: Option<String>,
    /// 来源位置类型（宿主据此选择来源位置的展示方式）
    pub stock_source_type_uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterBar {
    pub search_placeholder: String,
    pub search_text: String,
    pub start_date: DateInput,
    pub end_date: DateInput,
    pub refresh_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInput {
    pub label: String,
    pub placeholder: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViewBody {
    /// 首次加载中
    LoadingPlaceholder { label: String },
    Table {
        headers: Vec<TableHeader>,
        rows: Vec<RenderedRow>,
        /// 无结果时的提示
        empty_message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    pub uuid: String,
    /// 与表头一一对应
    pub cells: Vec<String>,
    pub expanded: bool,
    pub actions: Vec<ActionMenuEntry>,
    pub detail: Option<RowDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMenuEntry {
    pub action: ActionKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDetail {
    pub date_created_label: String,
    pub date_created: String,
    pub date_completed_label: String,
    /// 未完成时为空串
    pub date_completed: String,
    pub batch_number_label: String,
    pub quantity_label: String,
    pub batches: Vec<BatchLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchLine {
    pub batch_no: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBar {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub page_sizes: Vec<u32>,
    pub total_items: u64,
    pub items_per_page_label: String,
    pub summary: String,
}

impl RenderedView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, ViewBody::LoadingPlaceholder { .. })
    }

    /// 表格行；占位状态下为空
    pub fn rows(&self) -> &[RenderedRow] {
        match &self.body {
            ViewBody::Table { rows, .. } => rows.as_slice(),
            ViewBody::LoadingPlaceholder { .. } => &[],
        }
    }

    pub fn row(&self, uuid: &str) -> Option<&RenderedRow> {
        self.rows().iter().find(|row| row.uuid == uuid)
    }

    /// 文本输出中是否出现 `text`
    pub fn contains_text(&self, text: &str) -> bool {
        self.to_string().contains(text)
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;

        let bar = &self.filter_bar;
        writeln!(
            f,
            "[{}: {}] [{}: {}] [{}: {}] [{}]",
            bar.search_placeholder,
            bar.search_text,
            bar.start_date.label,
            display_or(&bar.start_date.value, &bar.start_date.placeholder),
            bar.end_date.label,
            display_or(&bar.end_date.value, &bar.end_date.placeholder),
            bar.refresh_label
        )?;

        if let Some(error) = &self.validation_error {
            writeln!(f, "! {}", error)?;
        }
        if let Some(error) = &self.fetch_error {
            writeln!(f, "! {}", error)?;
        }

        match &self.body {
            ViewBody::LoadingPlaceholder { label } => writeln!(f, "{}", label)?,
            ViewBody::Table {
                headers,
                rows,
                empty_message,
            } => {
                let header_line: Vec<&str> = headers.iter().map(|h| h.header.as_str()).collect();
                writeln!(f, "{}", header_line.join(" | "))?;

                for row in rows {
                    let marker = if row.expanded { "-" } else { "+" };
                    let actions: Vec<&str> = row.actions.iter().map(|a| a.label.as_str()).collect();
                    writeln!(f, "{} {}  [{}]", marker, row.cells.join(" | "), actions.join(", "))?;

                    if let Some(detail) = &row.detail {
                        writeln!(
                            f,
                            "    {}: {}  {}: {}",
                            detail.date_created_label,
                            detail.date_created,
                            detail.date_completed_label,
                            detail.date_completed
                        )?;
                        writeln!(f, "    {} | {}", detail.batch_number_label, detail.quantity_label)?;
                        for batch in &detail.batches {
                            writeln!(f, "    {} | {}", batch.batch_no, batch.quantity)?;
                        }
                    }
                }

                if let Some(message) = empty_message {
                    writeln!(f, "{}", message)?;
                }
            }
        }

        write!(f, "{}", self.pagination.summary)
    }
}

fn display_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
