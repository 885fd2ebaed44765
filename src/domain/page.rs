// ==========================================
// 库存作业列表引擎 - 分页领域模型
// ==========================================

use crate::domain::stock_operation::StockOperation;
use crate::domain::types::ColumnKey;
use serde::{Deserialize, Serialize};

/// 表头描述：由数据源提供，视图只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHeader {
    pub key: ColumnKey,
    pub header: String,
}

/// 拉取到的一页原始数据（未过滤）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOperationPage {
    pub items: Vec<StockOperation>,
    pub total_items: u64,
}

// ==========================================
// PageState - 分页状态
// ==========================================
// 只能通过 PageDataSource 的导航操作修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub current_page: u32, // 从 1 开始
    pub current_page_size: u32,
    pub total_items: u64,
    pub page_sizes: Vec<u32>,
    pub is_loading: bool,
}

impl PageState {
    pub fn new(page_size: u32, page_sizes: Vec<u32>) -> Self {
        Self {
            current_page: 1,
            current_page_size: page_size,
            total_items: 0,
            page_sizes,
            is_loading: false,
        }
    }

    /// 总页数（至少 1 页）
    pub fn total_pages(&self) -> u32 {
        if self.current_page_size == 0 || self.total_items == 0 {
            return 1;
        }
        let size = u64::from(self.current_page_size);
        let pages = (self.total_items + size - 1) / size;
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// 当前页第一条记录的偏移量
    pub fn start_index(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.current_page_size)
    }
}
