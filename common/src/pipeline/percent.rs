use crate::model::series::{CategoryValue, Share};
use serde::{Deserialize, Serialize};

/// What a snapshot's percentages are relative to.
///
/// The two modes come from different views and give different numbers: a pie
/// always adds up to 100 %, while a fixed population (say, all children in
/// care according to another source) usually does not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "total", rename_all = "snake_case")]
pub enum Denominator {
    /// Sum of the breakdown's own values.
    Dynamic,
    /// A constant supplied from outside the sheet.
    Fixed(f64),
}

/// Each category's share of `denominator`, in input order.
///
/// A denominator that is not a positive finite number gives an empty vector.
pub fn percentages(breakdown: &[CategoryValue], denominator: Denominator) -> Vec<Share> {
    let total = match denominator {
        Denominator::Dynamic => breakdown.iter().map(|cv| cv.value).sum::<f64>(),
        Denominator::Fixed(total) => total,
    };
    if !(total.is_finite() && total > 0.0) {
        return Vec::new();
    }

    breakdown
        .iter()
        .map(|cv| Share {
            category: cv.category.clone(),
            value: cv.value,
            percent: cv.value / total * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown() -> Vec<CategoryValue> {
        vec![
            CategoryValue { category: "A".into(), value: 30.0 },
            CategoryValue { category: "B".into(), value: 10.0 },
        ]
    }

    #[test]
    fn dynamic_shares_add_up_to_one_hundred() {
        let shares = percentages(&breakdown(), Denominator::Dynamic);
        assert_eq!(shares[0].percent, 75.0);
        assert_eq!(shares[1].percent, 25.0);
    }

    #[test]
    fn fixed_denominator_is_used_verbatim() {
        let shares = percentages(&breakdown(), Denominator::Fixed(80.0));
        assert_eq!(shares[0].percent, 37.5);
        assert_eq!(shares[1].percent, 12.5);
    }

    #[test]
    fn non_positive_denominators_give_nothing() {
        assert!(percentages(&breakdown(), Denominator::Fixed(0.0)).is_empty());
        assert!(percentages(&breakdown(), Denominator::Fixed(-5.0)).is_empty());
        assert!(percentages(&breakdown(), Denominator::Fixed(f64::NAN)).is_empty());
        assert!(percentages(&[], Denominator::Dynamic).is_empty());
    }

    #[test]
    fn denominator_round_trips_through_json() {
        let parsed: Denominator = serde_json::from_str(r#"{"mode":"fixed","total":12.5}"#).unwrap();
        assert_eq!(parsed, Denominator::Fixed(12.5));
        let parsed: Denominator = serde_json::from_str(r#"{"mode":"dynamic"}"#).unwrap();
        assert_eq!(parsed, Denominator::Dynamic);
    }
}
