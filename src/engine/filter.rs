// ==========================================
// 库存作业列表引擎 - 客户端过滤
// ==========================================
// 职责: 对"已拉取的当前页"做文本与日期区间过滤
// 约束: 纯函数,无副作用；两个谓词做交集(与顺序无关)
// 红线: 过滤不改变 totalItems,不触发分页
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{ColumnKey, StockOperation};
use chrono::NaiveDate;

/// 日期输入框接受的格式（先按输入框占位格式,再按 ISO）
pub const DATE_INPUT_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

// ==========================================
// DateRange - 闭区间（单侧缺省即该侧开放）
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// 两侧都未设置
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// 从两个日期输入框的原始文本构造区间
    ///
    /// 空输入表示该侧未设置；任一侧格式错误或起止颠倒时返回 ValidationError
    pub fn from_inputs(start: &str, end: &str) -> ApiResult<Self> {
        let range = Self::new(parse_date_input(start)?, parse_date_input(end)?);
        if let (Some(s), Some(e)) = (range.start, range.end) {
            if s > e {
                return Err(ApiError::ValidationError(format!(
                    "开始日期晚于结束日期: {} > {}",
                    s, e
                )));
            }
        }
        Ok(range)
    }
}

/// 解析单个日期输入框；空白输入返回 None
pub fn parse_date_input(raw: &str) -> ApiResult<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(Some)
        .ok_or_else(|| ApiError::ValidationError(format!("无法识别的日期: {}", trimmed)))
}

// ==========================================
// FilterCriteria - 过滤条件
// ==========================================
// 视图挂载时为空,随用户输入变化,不持久化
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub date_range: DateRange,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// 空条件：不缩小任何结果
    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty() && self.date_range.is_unbounded()
    }
}

// ==========================================
// FilterEngine
// ==========================================
pub struct FilterEngine;

impl FilterEngine {
    /// 按默认列应用过滤条件,保持原有顺序
    pub fn apply<'a>(items: &'a [StockOperation], criteria: &FilterCriteria) -> Vec<&'a StockOperation> {
        Self::apply_over(items, criteria, &ColumnKey::DEFAULT_COLUMNS)
    }

    /// 文本只在 `columns`（即渲染出的列）的显示文本中搜索
    pub fn apply_over<'a>(
        items: &'a [StockOperation],
        criteria: &FilterCriteria,
        columns: &[ColumnKey],
    ) -> Vec<&'a StockOperation> {
        let needle = normalize(&criteria.search_text);
        let filtered: Vec<&StockOperation> = items
            .iter()
            .filter(|item| {
                Self::matches_text(item, &needle, columns)
                    && Self::matches_date(item, &criteria.date_range)
            })
            .collect();

        tracing::debug!(
            total = items.len(),
            kept = filtered.len(),
            search = %criteria.search_text,
            "客户端过滤完成"
        );
        filtered
    }

    /// 单条记录是否通过全部条件
    pub fn matches(item: &StockOperation, criteria: &FilterCriteria) -> bool {
        Self::matches_text(item, &normalize(&criteria.search_text), &ColumnKey::DEFAULT_COLUMNS)
            && Self::matches_date(item, &criteria.date_range)
    }

    /// 文本谓词；`needle` 需已规范化（去空白 + 小写）
    fn matches_text(item: &StockOperation, needle: &str, columns: &[ColumnKey]) -> bool {
        needle.is_empty()
            || item
                .searchable_values(columns)
                .any(|value| value.to_lowercase().contains(needle))
    }

    fn matches_date(item: &StockOperation, range: &DateRange) -> bool {
        range.contains(item.operation_date)
    }
}

fn normalize(search_text: &str) -> String {
    search_text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StockOperationItem, StockOperationStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn op(uuid: &str, type_name: &str, status: StockOperationStatus, on: NaiveDate) -> StockOperation {
        StockOperation {
            uuid: uuid.to_string(),
            operation_type_name: type_name.to_string(),
            status,
            source_name: Some("Warehouse".to_string()),
            destination_name: Some("Pharmacy".to_string()),
            responsible_person_given_name: Some("John".to_string()),
            responsible_person_family_name: Some("Doe".to_string()),
            creator_given_name: None,
            creator_family_name: None,
            operation_date: on,
            date_created: on,
            completed_date: None,
            stock_operation_items: vec![StockOperationItem {
                batch_no: "B1".to_string(),
                quantity: 1,
            }],
        }
    }

    fn sample() -> Vec<StockOperation> {
        vec![
            op("1", "Receive", StockOperationStatus::New, date(2023, 5, 1)),
            op("2", "Transfer Out", StockOperationStatus::Completed, date(2023, 5, 15)),
            op("3", "Adjustment", StockOperationStatus::InProgress, date(2023, 6, 2)),
        ]
    }

    fn ids(items: &[&StockOperation]) -> Vec<String> {
        items.iter().map(|op| op.uuid.clone()).collect()
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let items = sample();
        let result = FilterEngine::apply(&items, &FilterCriteria::new());
        assert_eq!(ids(&result), vec!["1", "2", "3"]);

        let blank = FilterCriteria::new().with_search("   ");
        assert!(blank.is_empty());
        assert_eq!(FilterEngine::apply(&items, &blank).len(), 3);
    }

    #[test]
    fn test_text_filter_is_case_insensitive() {
        let items = sample();
        let result = FilterEngine::apply(&items, &FilterCriteria::new().with_search("rEcEiVe"));
        assert_eq!(ids(&result), vec!["1"]);

        let by_status = FilterEngine::apply(&items, &FilterCriteria::new().with_search("in_prog"));
        assert_eq!(ids(&by_status), vec!["3"]);
    }

    #[test]
    fn test_text_filter_sound_and_complete() {
        let items = sample();
        for needle in ["out", "2023-05", "05-01", "NEW", "doe", "zzz"] {
            let kept = FilterEngine::apply(&items, &FilterCriteria::new().with_search(needle));
            for item in &items {
                let cells: Vec<String> = ColumnKey::DEFAULT_COLUMNS
                    .iter()
                    .map(|column| item.display_value(*column))
                    .collect();
                let shown = cells
                    .iter()
                    .any(|cell| cell.to_lowercase().contains(&needle.to_lowercase()));
                assert_eq!(
                    shown,
                    kept.iter().any(|k| k.uuid == item.uuid),
                    "item {} needle {} cells {:?}",
                    item.uuid,
                    needle,
                    cells
                );
            }
        }
    }

    #[test]
    fn test_text_filter_matches_rendered_date() {
        let items = sample();
        let exact = FilterEngine::apply(&items, &FilterCriteria::new().with_search("2023-05-01"));
        assert_eq!(ids(&exact), vec!["1"]);

        let month = FilterEngine::apply(&items, &FilterCriteria::new().with_search("2023-05"));
        assert_eq!(ids(&month), vec!["1", "2"]);
    }

    #[test]
    fn test_text_filter_limited_to_given_columns() {
        let items = sample();
        let criteria = FilterCriteria::new().with_search("2023-05-01");
        let without_date = [ColumnKey::OperationTypeName, ColumnKey::Status];
        assert!(FilterEngine::apply_over(&items, &criteria, &without_date).is_empty());
        assert_eq!(
            ids(&FilterEngine::apply_over(&items, &criteria, &[ColumnKey::OperationDate])),
            vec!["1"]
        );
    }

    #[test]
    fn test_text_filter_matches_responsible_person() {
        let items = sample();
        let result = FilterEngine::apply(&items, &FilterCriteria::new().with_search("john doe"));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let items = sample();
        let range = DateRange::between(date(2023, 5, 1), date(2023, 5, 15));
        let result = FilterEngine::apply(&items, &FilterCriteria::new().with_date_range(range));
        assert_eq!(ids(&result), vec!["1", "2"]);
    }

    #[test]
    fn test_open_ended_ranges() {
        let items = sample();
        let from = DateRange::new(Some(date(2023, 5, 2)), None);
        assert_eq!(
            ids(&FilterEngine::apply(&items, &FilterCriteria::new().with_date_range(from))),
            vec!["2", "3"]
        );

        let until = DateRange::new(None, Some(date(2023, 5, 1)));
        assert_eq!(
            ids(&FilterEngine::apply(&items, &FilterCriteria::new().with_date_range(until))),
            vec!["1"]
        );
    }

    #[test]
    fn test_combined_filter_is_intersection() {
        let items = sample();
        let text = FilterCriteria::new().with_search("transfer");
        let range = DateRange::between(date(2023, 5, 10), date(2023, 6, 30));
        let dates = FilterCriteria::new().with_date_range(range);
        let both = text.clone().with_date_range(range);

        let text_ids = ids(&FilterEngine::apply(&items, &text));
        let date_ids = ids(&FilterEngine::apply(&items, &dates));
        let expected: Vec<String> = text_ids.into_iter().filter(|id| date_ids.contains(id)).collect();

        assert_eq!(expected, vec!["2"]);
        assert_eq!(ids(&FilterEngine::apply(&items, &both)), expected);
        for item in &items {
            assert_eq!(
                FilterEngine::matches(item, &both),
                FilterEngine::matches(item, &text) && FilterEngine::matches(item, &dates)
            );
        }
    }

    #[test]
    fn test_parse_date_input_formats() {
        assert_eq!(parse_date_input("05/01/2023").unwrap(), Some(date(2023, 5, 1)));
        assert_eq!(parse_date_input("2023-05-31").unwrap(), Some(date(2023, 5, 31)));
        assert_eq!(parse_date_input("  ").unwrap(), None);
        assert!(matches!(parse_date_input("31/31/2023"), Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn test_range_from_inputs_rejects_reversed() {
        let ok = DateRange::from_inputs("05/01/2023", "05/31/2023").unwrap();
        assert_eq!(ok, DateRange::between(date(2023, 5, 1), date(2023, 5, 31)));

        let half = DateRange::from_inputs("", "05/31/2023").unwrap();
        assert_eq!(half.start, None);

        assert!(matches!(
            DateRange::from_inputs("06/01/2023", "05/01/2023"),
            Err(ApiError::ValidationError(_))
        ));
    }
}
