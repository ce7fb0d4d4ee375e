//! Snapshot, total series and composition matrix for one territory.
//!
//! Every function here is total: missing dates, missing categories or an
//! all-zero sheet produce empty output, never a panic or an error.

use crate::model::row::NormalizedRow;
use crate::model::series::{AggregatedSeries, CategoryValue, DatePoint, StackedRow};
use crate::pipeline::parse::normalize_key;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Category label of the rows that already hold the all-categories total.
/// Compared case-sensitively.
pub const TOTAL_CATEGORY: &str = "Em todos os acolhimentos";

/// Territory shown before the user picks one.
pub const DEFAULT_TERRITORY: &str = "RJ";

fn is_total(row: &NormalizedRow) -> bool {
    row.modality == TOTAL_CATEGORY
}

fn is_breakdown(row: &NormalizedRow) -> bool {
    !row.modality.is_empty() && !is_total(row)
}

/// Rows of one territory, optionally narrowed to one source.
///
/// A blank `territory` selects [`DEFAULT_TERRITORY`]. Territories and sources
/// are compared by [`normalize_key`]. Rows without a source are kept under any
/// source selection, since their sheet simply has no source column.
pub fn filter_rows(
    rows: &[NormalizedRow],
    territory: Option<&str>,
    source: Option<&str>,
) -> Vec<NormalizedRow> {
    let territory = normalize_key(
        territory
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TERRITORY),
    );
    let source = source.map(normalize_key).filter(|s| !s.is_empty());

    rows.iter()
        .filter(|row| normalize_key(&row.territory) == territory)
        .filter(|row| match &source {
            Some(wanted) => row.source.is_empty() || normalize_key(&row.source) == *wanted,
            None => true,
        })
        .cloned()
        .collect()
}

/// Non-blank dates, ascending. Lexicographic order is chronological for ISO dates.
pub fn distinct_dates(rows: &[NormalizedRow]) -> Vec<String> {
    rows.iter()
        .filter(|row| !row.date.is_empty())
        .map(|row| row.date.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Total at `date`: the explicit total row when it holds a number, otherwise
/// the sum of every categorised row at that date with blanks counted as zero.
pub fn total_for_date(rows: &[NormalizedRow], date: &str) -> f64 {
    let at_date = || rows.iter().filter(move |row| row.date == date);

    if let Some(explicit) = at_date().filter(|row| is_total(row)).find_map(|row| row.value) {
        return explicit;
    }
    at_date()
        .filter(|row| is_breakdown(row))
        .map(|row| row.value.unwrap_or(0.0))
        .sum()
}

/// One point per distinct date.
pub fn total_series(rows: &[NormalizedRow]) -> Vec<DatePoint> {
    distinct_dates(rows)
        .into_iter()
        .map(|date| {
            let total_value = total_for_date(rows, &date);
            DatePoint { date, total_value }
        })
        .collect()
}

/// Sums values per category over `rows`, ignoring the total label and blank categories.
fn category_sums<'a, I>(rows: I) -> BTreeMap<&'a str, f64>
where
    I: IntoIterator<Item = &'a NormalizedRow>,
{
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows.into_iter().filter(|row| is_breakdown(row)) {
        *sums.entry(row.modality.as_str()).or_insert(0.0) += row.value.unwrap_or(0.0);
    }
    sums
}

/// Breakdown by category at the latest date, largest first.
///
/// Categories summing to zero or less are dropped. Returns the date alongside
/// the values; both are empty when no row has a date.
pub fn snapshot(rows: &[NormalizedRow]) -> (Option<String>, Vec<CategoryValue>) {
    let Some(latest) = rows
        .iter()
        .filter(|row| !row.date.is_empty())
        .map(|row| row.date.as_str())
        .max()
    else {
        return (None, Vec::new());
    };

    let mut values: Vec<CategoryValue> = category_sums(rows.iter().filter(|row| row.date == latest))
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|(category, value)| CategoryValue {
            category: category.to_string(),
            value,
        })
        .collect();
    values.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

    (Some(latest.to_string()), values)
}

/// Composition key order and one stacked row per distinct date.
///
/// Keys are the total label followed by every category that is positive at
/// least once, ordered by ascending overall sum so the largest segment sits on
/// top of the stack. A date whose categories carry any positive value stacks
/// only the categories; a date without breakdown stacks the total row alone.
/// Zero segments are left out.
pub fn composition(rows: &[NormalizedRow]) -> (Vec<String>, Vec<StackedRow>) {
    let positive_somewhere: BTreeSet<&str> = rows
        .iter()
        .filter(|row| is_breakdown(row) && row.value.is_some_and(|v| v > 0.0))
        .map(|row| row.modality.as_str())
        .collect();

    let mut categories: Vec<(&str, f64)> = category_sums(rows)
        .into_iter()
        .filter(|(category, _)| positive_somewhere.contains(category))
        .collect();
    categories.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut keys = vec![TOTAL_CATEGORY.to_string()];
    keys.extend(categories.iter().map(|(category, _)| category.to_string()));

    let stacked = distinct_dates(rows)
        .into_iter()
        .map(|date| {
            let at_date: Vec<&NormalizedRow> = rows.iter().filter(|row| row.date == date).collect();
            let sums = category_sums(at_date.iter().copied());
            let has_breakdown = at_date
                .iter()
                .any(|row| is_breakdown(row) && row.value.is_some_and(|v| v > 0.0));

            let category_values: Vec<CategoryValue> = if has_breakdown {
                categories
                    .iter()
                    .filter_map(|(category, _)| {
                        let value = sums.get(category).copied().unwrap_or(0.0);
                        (value != 0.0).then(|| CategoryValue {
                            category: category.to_string(),
                            value,
                        })
                    })
                    .collect()
            } else {
                at_date
                    .iter()
                    .filter(|row| is_total(row))
                    .find_map(|row| row.value)
                    .filter(|value| *value != 0.0)
                    .map(|value| CategoryValue {
                        category: TOTAL_CATEGORY.to_string(),
                        value,
                    })
                    .into_iter()
                    .collect()
            };

            let dominant_category = category_values.last().map(|cv| cv.category.clone());
            StackedRow {
                date,
                category_values,
                dominant_category,
            }
        })
        .collect();

    (keys, stacked)
}

/// Runs every view over rows already narrowed to one territory/source.
pub fn aggregate(rows: &[NormalizedRow]) -> AggregatedSeries {
    let (snapshot_date, by_category_at_date) = snapshot(rows);
    let (stack_keys, stacked_by_date) = composition(rows);
    AggregatedSeries {
        by_date: total_series(rows),
        snapshot_date,
        by_category_at_date,
        stack_keys,
        stacked_by_date,
    }
}
