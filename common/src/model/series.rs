use serde::Serialize;

/// Total value of the indicator at one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePoint {
    pub date: String,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
}

/// One bar of the composition chart.
///
/// `category_values` follows the composition key order and only holds the
/// entries that are drawn for this date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedRow {
    pub date: String,
    pub category_values: Vec<CategoryValue>,
    /// Last non-zero segment in key order; the renderer rounds its corners.
    pub dominant_category: Option<String>,
}

/// Everything the charts need for one (territory, source) selection.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSeries {
    pub by_date: Vec<DatePoint>,
    /// Date of the snapshot below, `None` when the rows carry no date at all.
    pub snapshot_date: Option<String>,
    /// Latest-date breakdown, largest first.
    pub by_category_at_date: Vec<CategoryValue>,
    /// Composition key order: the total label first, then categories by ascending overall total.
    pub stack_keys: Vec<String>,
    pub stacked_by_date: Vec<StackedRow>,
}

/// A category's share of the snapshot, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub category: String,
    pub value: f64,
    pub percent: f64,
}
