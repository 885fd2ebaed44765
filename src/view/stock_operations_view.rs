// ==========================================
// 库存作业列表视图 - 组合层
// ==========================================
// 职责: 持有过滤条件与展开状态,把数据源/过滤/分发器组合成渲染结果
// 红线:
// - render 是纯函数,不发起拉取
// - 所有失败转为可观察状态（fetch_error / validation_error / 通知）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ViewConfig;
use crate::domain::date_format::DATE_FORMAT;
use crate::domain::{ActionKind, ColumnKey, StockOperation};
use crate::engine::action_dispatcher::{ActionDispatcher, ActionOutcome};
use crate::engine::events::{CacheInvalidator, DialogEvent, DialogPresenter};
use crate::engine::expansion::RowExpansionStore;
use crate::engine::filter::{DateRange, FilterCriteria, FilterEngine};
use crate::engine::invalidation::{InvalidationBus, InvalidationSubscription};
use crate::engine::page_data_source::{FetchOutcome, LoadStatus, PageDataSource, PendingFetch};
use crate::engine::ports::{StockOperationFetcher, StockOperationMutator};
use crate::i18n::{t_for, t_for_args};
use crate::view::render::{
    ActionMenuEntry, BatchLine, DateInput, FilterBar, PaginationBar, RenderedRow, RenderedView,
    RowDetail, ViewBody,
};
use std::sync::Arc;
use uuid::Uuid;

/// 视图依赖的外部协作方
pub struct ViewCollaborators {
    pub fetcher: Arc<dyn StockOperationFetcher>,
    pub mutator: Arc<dyn StockOperationMutator>,
    pub presenter: Arc<dyn DialogPresenter>,
    pub invalidator: Arc<dyn CacheInvalidator>,
    /// 未订阅时,失效不会触发重新拉取
    pub subscription: Option<InvalidationSubscription>,
}

impl ViewCollaborators {
    /// 使用同一条失效总线：分发器发布,数据源订阅
    pub fn with_bus(
        fetcher: Arc<dyn StockOperationFetcher>,
        mutator: Arc<dyn StockOperationMutator>,
        presenter: Arc<dyn DialogPresenter>,
        bus: &InvalidationBus,
    ) -> Self {
        Self {
            fetcher,
            mutator,
            presenter,
            invalidator: Arc::new(bus.clone()),
            subscription: Some(bus.subscribe()),
        }
    }
}

// ==========================================
// StockOperationsView
// ==========================================
pub struct StockOperationsView {
    config: ViewConfig,
    data_source: PageDataSource,
    dispatcher: ActionDispatcher,
    criteria: FilterCriteria,
    expansion: RowExpansionStore,
    start_date_input: String,
    end_date_input: String,
    validation_error: Option<String>,
    mounted: bool,
}

impl StockOperationsView {
    pub fn new(config: ViewConfig, collaborators: ViewCollaborators) -> Self {
        let ViewCollaborators {
            fetcher,
            mutator,
            presenter,
            invalidator,
            subscription,
        } = collaborators;

        let mut data_source = PageDataSource::new(fetcher, &config);
        if let Some(subscription) = subscription {
            data_source.watch(subscription);
        }
        let dispatcher = ActionDispatcher::new(mutator, presenter, invalidator, &config);

        Self {
            config,
            data_source,
            dispatcher,
            criteria: FilterCriteria::new(),
            expansion: RowExpansionStore::new(),
            start_date_input: String::new(),
            end_date_input: String::new(),
            validation_error: None,
            mounted: false,
        }
    }

    // ==========================================
    // 生命周期
    // ==========================================

    /// 挂载：过滤条件为空,加载当前页（已加载则不重复拉取）
    pub async fn mount(&mut self) -> ApiResult<LoadStatus> {
        self.reset_local_state();
        self.mounted = true;
        tracing::info!(locale = %self.config.locale, "挂载库存作业列表");

        let state = self.data_source.state();
        let (page, size) = (state.current_page, state.current_page_size);
        self.data_source.ensure_loaded(page, size).await
    }

    /// 卸载：清空过滤条件与展开状态
    pub fn unmount(&mut self) {
        self.reset_local_state();
        self.mounted = false;
        tracing::info!("卸载库存作业列表");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn reset_local_state(&mut self) {
        self.criteria = FilterCriteria::new();
        self.expansion.clear();
        self.start_date_input.clear();
        self.end_date_input.clear();
        self.validation_error = None;
    }

    // ==========================================
    // 分页
    // ==========================================

    /// 登记拉取（由调用方执行后交回 `apply_fetch`）
    pub fn begin_load(&mut self, page: u32, page_size: u32) -> ApiResult<PendingFetch> {
        self.data_source.begin_load(page, page_size)
    }

    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> ApiResult<LoadStatus> {
        self.data_source.apply(outcome)
    }

    pub async fn go_to(&mut self, page: u32) -> ApiResult<LoadStatus> {
        self.data_source.go_to(page).await
    }

    pub async fn set_page_size(&mut self, page_size: u32) -> ApiResult<LoadStatus> {
        self.data_source.set_page_size(page_size).await
    }

    /// 处理积压的缓存失效（命中则重新拉取当前页一次）
    pub async fn sync(&mut self) -> ApiResult<Option<LoadStatus>> {
        self.data_source.poll_invalidation().await
    }

    /// 宿主事件循环用：等待下一次相关失效并刷新当前页
    pub async fn wait_for_invalidation(&mut self) -> ApiResult<Option<LoadStatus>> {
        self.data_source.wait_for_invalidation().await
    }

    // ==========================================
    // 过滤
    // ==========================================

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        tracing::debug!(search = %self.criteria.search_text, "更新搜索文本");
    }

    /// 设置日期区间输入
    ///
    /// 输入无效时记录 ValidationError,区间不参与过滤
    pub fn set_date_inputs(&mut self, start: &str, end: &str) -> ApiResult<()> {
        self.start_date_input = start.to_string();
        self.end_date_input = end.to_string();

        match DateRange::from_inputs(start, end) {
            Ok(range) => {
                self.criteria.date_range = range;
                self.validation_error = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(start, end, error = %err, "日期区间输入无效");
                self.criteria.date_range = DateRange::default();
                self.validation_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::new();
        self.start_date_input.clear();
        self.end_date_input.clear();
        self.validation_error = None;
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    /// 当前页经过滤后的记录；文本只匹配表头中渲染出的列
    pub fn filtered_items(&self) -> Vec<&StockOperation> {
        let columns: Vec<ColumnKey> = self
            .data_source
            .table_headers()
            .iter()
            .map(|header| header.key)
            .collect();
        FilterEngine::apply_over(self.data_source.items(), &self.criteria, &columns)
    }

    // ==========================================
    // 行展开
    // ==========================================

    pub fn toggle_row(&mut self, uuid: &str) -> bool {
        self.expansion.toggle(uuid)
    }

    pub fn is_expanded(&self, uuid: &str) -> bool {
        self.expansion.is_expanded(uuid)
    }

    // ==========================================
    // 操作
    // ==========================================

    /// 在当前页中找到作业并打开操作确认对话框
    pub fn open_action(&mut self, operation_uuid: &str, action: ActionKind) -> ApiResult<Uuid> {
        let operation = self
            .data_source
            .find_item(operation_uuid)
            .ok_or_else(|| ApiError::NotFound(format!("库存作业(id={})不在当前页", operation_uuid)))?;
        self.dispatcher.invoke(operation, action)
    }

    /// 对话框回送事件；成功后处理缓存失效,使列表反映新状态
    ///
    /// 重新拉取失败不影响操作结果,记录在数据源的错误状态中
    pub async fn handle_dialog_event(&mut self, event: DialogEvent) -> ApiResult<ActionOutcome> {
        let outcome = self.dispatcher.handle_dialog_event(event).await?;

        if let ActionOutcome::Applied { .. } = outcome {
            if let Err(err) = self.sync().await {
                tracing::warn!(error = %err, "操作成功后刷新列表失败");
            }
        }
        Ok(outcome)
    }

    /// 手动刷新：失效缓存（不打开对话框）并处理失效
    pub async fn refresh(&mut self) -> ApiResult<Option<LoadStatus>> {
        self.dispatcher.refresh();
        self.sync().await
    }

    pub fn data_source(&self) -> &PageDataSource {
        &self.data_source
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    // ==========================================
    // 渲染
    // ==========================================

    pub fn render(&self) -> RenderedView {
        let locale = self.config.locale.as_str();
        let state = self.data_source.state();

        let body = if self.data_source.is_loading() && self.data_source.is_first_load() {
            ViewBody::LoadingPlaceholder {
                label: t_for("view.loading", locale),
            }
        } else {
            let rows: Vec<RenderedRow> = self
                .filtered_items()
                .into_iter()
                .map(|op| self.render_row(op))
                .collect();
            let empty_message = if rows.is_empty() {
                Some(t_for("view.no_results", locale))
            } else {
                None
            };
            ViewBody::Table {
                headers: self.data_source.table_headers().to_vec(),
                rows,
                empty_message,
            }
        };

        let total_pages = state.total_pages();
        let (page, pages, total) = (
            state.current_page.to_string(),
            total_pages.to_string(),
            state.total_items.to_string(),
        );
        let summary = t_for_args(
            "view.page_summary",
            locale,
            &[
                ("page", page.as_str()),
                ("pages", pages.as_str()),
                ("total", total.as_str()),
            ],
        );

        RenderedView {
            title: t_for("view.title", locale),
            subtitle: t_for("view.subtitle", locale),
            filter_bar: FilterBar {
                search_placeholder: t_for("view.filter_placeholder", locale),
                search_text: self.criteria.search_text.clone(),
                start_date: DateInput {
                    label: t_for("view.start_date", locale),
                    placeholder: t_for("view.date_placeholder", locale),
                    value: self.start_date_input.clone(),
                },
                end_date: DateInput {
                    label: t_for("view.end_date", locale),
                    placeholder: t_for("view.date_placeholder", locale),
                    value: self.end_date_input.clone(),
                },
                refresh_label: t_for("view.refresh", locale),
            },
            body,
            pagination: PaginationBar {
                current_page: state.current_page,
                total_pages,
                page_size: state.current_page_size,
                page_sizes: state.page_sizes.clone(),
                total_items: state.total_items,
                items_per_page_label: t_for("view.items_per_page", locale),
                summary,
            },
            is_loading: state.is_loading,
            fetch_error: self
                .data_source
                .last_error()
                .map(|reason| t_for_args("view.load_failed", locale, &[("reason", reason)])),
            validation_error: self
                .validation_error
                .as_deref()
                .map(|reason| t_for_args("view.invalid_date", locale, &[("reason", reason)])),
            stock_source_type_uuid: self.config.stock_source_type_uuid.clone(),
        }
    }

    fn render_row(&self, op: &StockOperation) -> RenderedRow {
        let locale = self.config.locale.as_str();
        let expanded = self.expansion.is_expanded(&op.uuid);

        let cells = self
            .data_source
            .table_headers()
            .iter()
            .map(|header| op.display_value(header.key))
            .collect();

        let actions = ActionDispatcher::available_actions(op.status)
            .iter()
            .map(|action| ActionMenuEntry {
                action: *action,
                label: t_for(action.label_key(), locale),
            })
            .collect();

        let detail = expanded.then(|| RowDetail {
            date_created_label: t_for("detail.date_created", locale),
            date_created: op.date_created.format(DATE_FORMAT).to_string(),
            date_completed_label: t_for("detail.date_completed", locale),
            date_completed: op
                .completed_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            batch_number_label: t_for("detail.batch_number", locale),
            quantity_label: t_for("detail.quantity", locale),
            batches: op
                .stock_operation_items
                .iter()
                .map(|item| BatchLine {
                    batch_no: item.batch_no.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        });

        RenderedRow {
            uuid: op.uuid.clone(),
            cells,
            expanded,
            actions,
            detail,
        }
    }
}
