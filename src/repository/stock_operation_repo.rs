// ==========================================
// 库存作业列表引擎 - 库存作业数据仓储
// ==========================================
// 表: stock_operation + stock_operation_item
// 角色: 本地数据源,同时充当分页拉取与状态变更两个协作方
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use self::core::StockOperationRepository;
