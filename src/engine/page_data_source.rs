// ==========================================
// 库存作业列表引擎 - 分页数据源
// ==========================================
// 职责: 持有页码/每页条数/总数/当前页原始数据与表头,提供导航
// 约束:
// - 拉取期间保留上一页数据(stale-while-revalidate),首次加载除外
// - 每次拉取分配单调递增序号,只有最新序号的响应可以更新状态
// - 拉取失败: isLoading 复位,数据不变,返回 TransientFetchError,不自动重试
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ViewConfig;
use crate::domain::{ColumnKey, PageState, StockOperation, StockOperationPage, TableHeader};
use crate::engine::invalidation::InvalidationSubscription;
use crate::engine::ports::StockOperationFetcher;
use crate::i18n;
use std::sync::Arc;

/// 一次拉取请求（序号 + 目标页）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub sequence: u64,
    pub page: u32,
    pub page_size: u32,
}

/// 已登记但尚未执行的拉取
///
/// 持有 fetcher 的 Arc,执行时无需借用数据源,
/// 因而可以在新的请求发出之后才完成
pub struct PendingFetch {
    request: PageRequest,
    fetcher: Arc<dyn StockOperationFetcher>,
}

impl PendingFetch {
    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub async fn run(self) -> FetchOutcome {
        let result = self
            .fetcher
            .fetch_page(self.request.page, self.request.page_size)
            .await;
        FetchOutcome {
            request: self.request,
            result,
        }
    }
}

/// 拉取结果（尚未应用到数据源）
pub struct FetchOutcome {
    pub request: PageRequest,
    pub result: ApiResult<StockOperationPage>,
}

/// 应用结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// 响应已更新状态
    Applied,
    /// 响应已过期(有更新的请求),被丢弃
    Stale,
    /// 目标页已加载,未发起拉取
    Unchanged,
}

/// `load` 契约的只读视图
#[derive(Debug, Clone, Copy)]
pub struct PageSnapshot<'a> {
    pub items: &'a [StockOperation],
    pub table_headers: &'a [TableHeader],
    pub current_page: u32,
    pub page_sizes: &'a [u32],
    pub current_page_size: u32,
    pub total_items: u64,
    pub is_loading: bool,
}

/// 按语言生成默认表头
pub fn default_table_headers(locale: &str) -> Vec<TableHeader> {
    ColumnKey::DEFAULT_COLUMNS
        .iter()
        .map(|key| TableHeader {
            key: *key,
            header: i18n::t_for(key.label_key(), locale),
        })
        .collect()
}

// ==========================================
// PageDataSource
// ==========================================
pub struct PageDataSource {
    fetcher: Arc<dyn StockOperationFetcher>,
    state: PageState,
    items: Vec<StockOperation>,
    table_headers: Vec<TableHeader>,
    resource_path: String,
    latest_sequence: u64,
    /// 最近一次成功加载的 (page, page_size)
    loaded: Option<(u32, u32)>,
    last_error: Option<String>,
    subscription: Option<InvalidationSubscription>,
}

impl PageDataSource {
    pub fn new(fetcher: Arc<dyn StockOperationFetcher>, config: &ViewConfig) -> Self {
        Self {
            fetcher,
            state: PageState::new(config.default_page_size, config.page_sizes.clone()),
            items: Vec::new(),
            table_headers: default_table_headers(&config.locale),
            resource_path: config.stock_operation_resource_path(),
            latest_sequence: 0,
            loaded: None,
            last_error: None,
            subscription: None,
        }
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn snapshot(&self) -> PageSnapshot<'_> {
        PageSnapshot {
            items: &self.items,
            table_headers: &self.table_headers,
            current_page: self.state.current_page,
            page_sizes: &self.state.page_sizes,
            current_page_size: self.state.current_page_size,
            total_items: self.state.total_items,
            is_loading: self.state.is_loading,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn items(&self) -> &[StockOperation] {
        &self.items
    }

    pub fn table_headers(&self) -> &[TableHeader] {
        &self.table_headers
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// 尚未有任何一次成功加载
    pub fn is_first_load(&self) -> bool {
        self.loaded.is_none()
    }

    /// 最近一次拉取失败的消息（成功加载后清空）
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn find_item(&self, uuid: &str) -> Option<&StockOperation> {
        self.items.iter().find(|op| op.uuid == uuid)
    }

    /// 当前页的缓存键（与 REST 查询 URL 同形）
    pub fn cache_key(&self) -> String {
        format!(
            "{}?v=full&limit={}&startIndex={}",
            self.resource_path,
            self.state.current_page_size,
            self.state.start_index()
        )
    }

    // ==========================================
    // 拉取：登记 → 执行 → 应用
    // ==========================================

    /// 登记一次拉取,立即更新页码/条数并置 isLoading
    pub fn begin_load(&mut self, page: u32, page_size: u32) -> ApiResult<PendingFetch> {
        if page == 0 {
            return Err(ApiError::InvalidInput("页码从1开始".to_string()));
        }
        if page_size == 0 {
            return Err(ApiError::InvalidInput("每页条数必须大于0".to_string()));
        }

        self.latest_sequence += 1;
        let request = PageRequest {
            sequence: self.latest_sequence,
            page,
            page_size,
        };

        self.state.current_page = page;
        self.state.current_page_size = page_size;
        self.state.is_loading = true;

        tracing::info!(sequence = request.sequence, page, page_size, "开始拉取作业分页");
        Ok(PendingFetch {
            request,
            fetcher: Arc::clone(&self.fetcher),
        })
    }

    /// 应用拉取结果；过期响应直接丢弃
    pub fn apply(&mut self, outcome: FetchOutcome) -> ApiResult<LoadStatus> {
        let FetchOutcome { request, result } = outcome;

        if request.sequence != self.latest_sequence {
            tracing::warn!(
                sequence = request.sequence,
                latest = self.latest_sequence,
                "丢弃过期的分页响应"
            );
            return Ok(LoadStatus::Stale);
        }

        self.state.is_loading = false;
        match result {
            Ok(page) => {
                tracing::info!(
                    sequence = request.sequence,
                    items = page.items.len(),
                    total_items = page.total_items,
                    "分页数据已更新"
                );
                self.items = page.items;
                self.state.total_items = page.total_items;
                self.loaded = Some((request.page, request.page_size));
                self.last_error = None;
                Ok(LoadStatus::Applied)
            }
            Err(err) => {
                let message = match err {
                    ApiError::TransientFetchError(msg) => msg,
                    other => other.to_string(),
                };
                tracing::warn!(sequence = request.sequence, error = %message, "分页拉取失败");
                self.last_error = Some(message.clone());
                Err(ApiError::TransientFetchError(message))
            }
        }
    }

    /// 拉取指定页（登记 + 执行 + 应用）
    pub async fn load(&mut self, page: u32, page_size: u32) -> ApiResult<LoadStatus> {
        let pending = self.begin_load(page, page_size)?;
        let outcome = pending.run().await;
        self.apply(outcome)
    }

    /// 目标页已加载且无进行中的拉取时不重复拉取
    pub async fn ensure_loaded(&mut self, page: u32, page_size: u32) -> ApiResult<LoadStatus> {
        if self.loaded == Some((page, page_size)) && !self.state.is_loading {
            return Ok(LoadStatus::Unchanged);
        }
        self.load(page, page_size).await
    }

    /// 跳转页码（保持每页条数）
    pub async fn go_to(&mut self, page: u32) -> ApiResult<LoadStatus> {
        let size = self.state.current_page_size;
        self.load(page, size).await
    }

    /// 修改每页条数,页码回到 1
    pub async fn set_page_size(&mut self, page_size: u32) -> ApiResult<LoadStatus> {
        self.load(1, page_size).await
    }

    /// 按当前页码/条数重新拉取
    pub async fn revalidate(&mut self) -> ApiResult<LoadStatus> {
        let (page, size) = (self.state.current_page, self.state.current_page_size);
        self.load(page, size).await
    }

    // ==========================================
    // 缓存失效订阅
    // ==========================================

    pub fn watch(&mut self, subscription: InvalidationSubscription) {
        self.subscription = Some(subscription);
    }

    /// 取空失效积压；若命中当前缓存键则重新拉取一次
    ///
    /// # 返回
    /// - `Ok(None)`: 无命中（或未订阅）
    /// - `Ok(Some(status))`: 已重新拉取
    pub async fn poll_invalidation(&mut self) -> ApiResult<Option<LoadStatus>> {
        let key = self.cache_key();
        let matched = match self.subscription.as_mut() {
            Some(sub) => sub.drain_matches(&key),
            None => false,
        };

        if !matched {
            return Ok(None);
        }

        tracing::debug!(cache_key = %key, "缓存失效命中,重新拉取当前页");
        self.revalidate().await.map(Some)
    }

    /// 挂起直到下一次命中当前页的失效,随后重新拉取一次
    ///
    /// 同批积压的其余失效一并消化；未订阅或总线关闭时返回 None
    pub async fn wait_for_invalidation(&mut self) -> ApiResult<Option<LoadStatus>> {
        let key = self.cache_key();
        let matched = match self.subscription.as_mut() {
            Some(sub) => {
                let hit = sub.wait_for_match(&key).await;
                if hit {
                    sub.drain_matches(&key);
                }
                hit
            }
            None => false,
        };

        if !matched {
            return Ok(None);
        }

        tracing::debug!(cache_key = %key, "等待到缓存失效,重新拉取当前页");
        self.revalidate().await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StockOperationStatus;
    use crate::engine::events::CacheInvalidator;
    use crate::engine::invalidation::InvalidationBus;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn op(uuid: &str) -> StockOperation {
        let on = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        StockOperation {
            uuid: uuid.to_string(),
            operation_type_name: "Receive".to_string(),
            status: StockOperationStatus::New,
            source_name: None,
            destination_name: None,
            responsible_person_given_name: None,
            responsible_person_family_name: None,
            creator_given_name: None,
            creator_family_name: None,
            operation_date: on,
            date_created: on,
            completed_date: None,
            stock_operation_items: Vec::new(),
        }
    }

    /// 每页返回 "p{page}-{i}" 形式的记录,可注入一次失败
    #[derive(Default)]
    struct ScriptedFetcher {
        calls: AtomicUsize,
        fail_next: Mutex<bool>,
    }

    #[async_trait]
    impl StockOperationFetcher for ScriptedFetcher {
        async fn fetch_page(&self, page: u32, page_size: u32) -> ApiResult<StockOperationPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = {
                let mut guard = self.fail_next.lock().unwrap();
                std::mem::replace(&mut *guard, false)
            };
            if fail {
                return Err(ApiError::TransientFetchError("network down".to_string()));
            }
            let items = (0..page_size.min(2))
                .map(|i| op(&format!("p{}-{}", page, i)))
                .collect();
            Ok(StockOperationPage {
                items,
                total_items: 42,
            })
        }
    }

    fn source(fetcher: Arc<ScriptedFetcher>) -> PageDataSource {
        PageDataSource::new(fetcher, &ViewConfig::default())
    }

    #[tokio::test]
    async fn test_first_load_populates_state() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher.clone());
        assert!(ds.is_first_load());
        assert!(ds.items().is_empty());

        let status = ds.load(1, 10).await.unwrap();
        assert_eq!(status, LoadStatus::Applied);

        let snap = ds.snapshot();
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.total_items, 42);
        assert_eq!(snap.current_page, 1);
        assert!(!snap.is_loading);
        assert_eq!(snap.table_headers.len(), ColumnKey::DEFAULT_COLUMNS.len());
        assert!(!ds.is_first_load());
    }

    #[tokio::test]
    async fn test_stale_items_visible_while_loading() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher);
        ds.load(1, 10).await.unwrap();

        let pending = ds.begin_load(2, 10).unwrap();
        assert!(ds.is_loading());
        assert_eq!(ds.items()[0].uuid, "p1-0");

        let outcome = pending.run().await;
        ds.apply(outcome).unwrap();
        assert_eq!(ds.items()[0].uuid, "p2-0");
        assert_eq!(ds.state().current_page, 2);
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher);

        let older = ds.begin_load(2, 10).unwrap();
        let newer = ds.begin_load(3, 10).unwrap();

        let (older_out, newer_out) = futures::join!(older.run(), newer.run());

        // 新请求先返回
        assert_eq!(ds.apply(newer_out).unwrap(), LoadStatus::Applied);
        // 旧请求后返回,必须被丢弃
        assert_eq!(ds.apply(older_out).unwrap(), LoadStatus::Stale);

        assert_eq!(ds.items()[0].uuid, "p3-0");
        assert_eq!(ds.state().current_page, 3);
        assert!(!ds.is_loading());
    }

    #[tokio::test]
    async fn test_stale_response_does_not_clear_loading() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher);

        let older = ds.begin_load(1, 10).unwrap();
        let newer = ds.begin_load(2, 10).unwrap();

        let older_out = older.run().await;
        assert_eq!(ds.apply(older_out).unwrap(), LoadStatus::Stale);
        assert!(ds.is_loading());
        assert!(ds.items().is_empty());

        let newer_out = newer.run().await;
        ds.apply(newer_out).unwrap();
        assert!(!ds.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_items() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher.clone());
        ds.load(1, 10).await.unwrap();

        *fetcher.fail_next.lock().unwrap() = true;
        let result = ds.go_to(2).await;

        assert!(matches!(result, Err(ApiError::TransientFetchError(_))));
        assert!(!ds.is_loading());
        assert_eq!(ds.items()[0].uuid, "p1-0");
        assert_eq!(ds.last_error(), Some("network down"));

        // 调用方可重新发起
        ds.go_to(2).await.unwrap();
        assert_eq!(ds.items()[0].uuid, "p2-0");
        assert_eq!(ds.last_error(), None);
    }

    #[tokio::test]
    async fn test_set_page_size_resets_page() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher);
        ds.load(3, 10).await.unwrap();

        ds.set_page_size(20).await.unwrap();
        assert_eq!(ds.state().current_page, 1);
        assert_eq!(ds.state().current_page_size, 20);
    }

    #[tokio::test]
    async fn test_invalid_navigation_rejected_without_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher.clone());

        assert!(matches!(ds.load(0, 10).await, Err(ApiError::InvalidInput(_))));
        assert!(matches!(ds.set_page_size(0).await, Err(ApiError::InvalidInput(_))));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(!ds.is_loading());
    }

    #[tokio::test]
    async fn test_ensure_loaded_skips_duplicate_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher.clone());

        ds.ensure_loaded(1, 10).await.unwrap();
        let status = ds.ensure_loaded(1, 10).await.unwrap();
        assert_eq!(status, LoadStatus::Unchanged);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidation_triggers_single_revalidate() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let bus = InvalidationBus::new();
        let mut ds = source(fetcher.clone());
        ds.watch(bus.subscribe());
        ds.load(1, 10).await.unwrap();

        assert_eq!(ds.poll_invalidation().await.unwrap(), None);

        bus.invalidate("/ws/rest/v1/stockmanagement/stockoperation");
        bus.invalidate("/stockmanagement/stockoperation");
        assert_eq!(ds.poll_invalidation().await.unwrap(), Some(LoadStatus::Applied));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

        bus.invalidate("/stockmanagement/stockitem");
        assert_eq!(ds.poll_invalidation().await.unwrap(), None);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_wait_for_invalidation_without_bus() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut ds = source(fetcher.clone());
        ds.load(1, 10).await.unwrap();
        assert_eq!(ds.wait_for_invalidation().await.unwrap(), None);

        let bus = InvalidationBus::new();
        ds.watch(bus.subscribe());
        drop(bus);
        assert_eq!(ds.wait_for_invalidation().await.unwrap(), None);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_for_invalidation_coalesces_backlog() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let bus = InvalidationBus::new();
        let mut ds = source(fetcher.clone());
        ds.watch(bus.subscribe());
        ds.load(1, 10).await.unwrap();

        bus.invalidate("/stockmanagement/stockoperation");
        bus.invalidate("/stockmanagement/stockoperation");
        assert_eq!(ds.wait_for_invalidation().await.unwrap(), Some(LoadStatus::Applied));
        assert_eq!(ds.poll_invalidation().await.unwrap(), None);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_key_contains_resource_path() {
        let ds = source(Arc::new(ScriptedFetcher::default()));
        let key = ds.cache_key();
        assert!(key.starts_with("/ws/rest/v1/stockmanagement/stockoperation?"));
        assert!(key.contains("limit=10"));
        assert!(key.contains("startIndex=0"));
    }
}
