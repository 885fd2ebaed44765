// ==========================================
// 库存作业列表引擎 - 视图层
// ==========================================
// 职责: 组合引擎组件,产出可渲染的数据
// ==========================================

pub mod render;
pub mod stock_operations_view;

pub use render::{
    ActionMenuEntry, BatchLine, DateInput, FilterBar, PaginationBar, RenderedRow, RenderedView,
    RowDetail, ViewBody,
};
pub use stock_operations_view::{StockOperationsView, ViewCollaborators};
