// ==========================================
// 库存作业列表引擎 - 引擎层
// ==========================================
// 职责: 分页数据源、客户端过滤、行展开、操作分发
// 红线: 引擎层不直接访问数据库,只依赖 ports 中的协作方 trait
// ==========================================

pub mod action_dispatcher;
pub mod events;
pub mod expansion;
pub mod filter;
pub mod invalidation;
pub mod page_data_source;
pub mod ports;

// 重导出核心组件
pub use action_dispatcher::{ActionDispatcher, ActionOutcome};
pub use events::{
    ActionContext, CacheInvalidator, ChannelDialogPresenter, DialogEvent, DialogMessage,
    DialogPresenter, NoOpDialogPresenter, Notification, NotificationKind,
    STOCK_OPERATION_DIALOG_ID, STOCK_OPERATION_RESOURCE,
};
pub use expansion::RowExpansionStore;
pub use filter::{DateRange, FilterCriteria, FilterEngine};
pub use invalidation::{InvalidationBus, InvalidationSubscription};
pub use page_data_source::{
    FetchOutcome, LoadStatus, PageDataSource, PageRequest, PageSnapshot, PendingFetch,
};
pub use ports::{StockOperationFetcher, StockOperationMutator};
