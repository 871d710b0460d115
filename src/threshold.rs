//! Bucketed classification of a numeric metric into a display label.
//!
//! A [`ThresholdTable`] is an ordered list of `(min, label)` pairs with
//! strictly decreasing bounds.  Classification walks the table from the top
//! and returns the first label whose bound is at or below the value.  The
//! last entry doubles as the catch-all, so every input (negative, NaN, …)
//! maps to *some* label.

use serde::{Deserialize, Serialize};

/// One row of a [`ThresholdTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Inclusive lower bound.
    pub min: f64,
    /// Label shown when the value falls into this bucket.
    pub label: String,
}

impl Threshold {
    pub fn new(min: f64, label: impl Into<String>) -> Self {
        Self {
            min,
            label: label.into(),
        }
    }
}

/// Reasons a threshold list is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("threshold table is empty")]
    Empty,
    #[error("threshold bound at index {index} is not finite")]
    NonFinite { index: usize },
    #[error("threshold bounds must strictly decrease: {previous} then {next} at index {index}")]
    NotDescending {
        index: usize,
        previous: f64,
        next: f64,
    },
}

/// Validated, descending table of thresholds.
///
/// On the wire this is a plain JSON array:
///
/// ```json
/// [ { "min": 60, "label": "high" }, { "min": 0, "label": "low" } ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Threshold>", into = "Vec<Threshold>")]
pub struct ThresholdTable {
    entries: Vec<Threshold>,
}

impl ThresholdTable {
    /// Build a table, checking that it is non-empty and that every bound is
    /// finite and strictly below its predecessor.
    pub fn new(entries: Vec<Threshold>) -> Result<Self, ThresholdError> {
        if entries.is_empty() {
            return Err(ThresholdError::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            if !entry.min.is_finite() {
                return Err(ThresholdError::NonFinite { index });
            }
            if index > 0 {
                let previous = entries[index - 1].min;
                if entry.min >= previous {
                    return Err(ThresholdError::NotDescending {
                        index,
                        previous,
                        next: entry.min,
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Convenience constructor from `(bound, label)` pairs.
    pub fn from_pairs<L: Into<String>>(
        pairs: impl IntoIterator<Item = (f64, L)>,
    ) -> Result<Self, ThresholdError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(min, label)| Threshold::new(min, label))
                .collect(),
        )
    }

    /// Label of the entry with the greatest bound `<= value`, or the
    /// catch-all when the value is below every bound (or NaN).
    pub fn classify(&self, value: f64) -> &str {
        self.entries
            .iter()
            .find(|t| t.min <= value)
            .or_else(|| self.entries.last())
            .map(|t| t.label.as_str())
            .unwrap_or_default()
    }

    /// Index of the matching entry; `0` is the highest bucket.
    pub fn bucket(&self, value: f64) -> usize {
        self.entries
            .iter()
            .position(|t| t.min <= value)
            .unwrap_or(self.entries.len() - 1)
    }

    pub fn entries(&self) -> &[Threshold] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a constructed table; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<Threshold>> for ThresholdTable {
    type Error = ThresholdError;

    fn try_from(entries: Vec<Threshold>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ThresholdTable> for Vec<Threshold> {
    fn from(table: ThresholdTable) -> Self {
        table.entries
    }
}

//  Built-in tables

/// Wi-Fi link quality out of 70, as reported by `iwconfig`.
pub fn wifi_signal_table() -> ThresholdTable {
    ThresholdTable {
        entries: vec![
            Threshold::new(60.0, "\u{f1eb}"),
            Threshold::new(50.0, "\u{f0925}"),
            Threshold::new(40.0, "\u{f0922}"),
            Threshold::new(30.0, "\u{f091f}"),
            Threshold::new(0.0, "\u{f092f}"),
        ],
    }
}

/// Battery charge percentage.  Only a full `100` gets the full glyph.
pub fn battery_table() -> ThresholdTable {
    ThresholdTable {
        entries: vec![
            Threshold::new(100.0, "\u{f0079}"),
            Threshold::new(90.0, "\u{f0082}"),
            Threshold::new(80.0, "\u{f0080}"),
            Threshold::new(70.0, "\u{f0080}"),
            Threshold::new(60.0, "\u{f007f}"),
            Threshold::new(50.0, "\u{f007e}"),
            Threshold::new(40.0, "\u{f007d}"),
            Threshold::new(30.0, "\u{f007c}"),
            Threshold::new(20.0, "\u{f007b}"),
            Threshold::new(10.0, "\u{f007a}"),
            Threshold::new(0.0, "\u{f244}"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> ThresholdTable {
        ThresholdTable::from_pairs([(60.0, "high"), (30.0, "mid"), (0.0, "low")]).unwrap()
    }

    #[test]
    fn picks_greatest_bound_not_above_value() {
        let t = levels();
        assert_eq!(t.classify(70.0), "high");
        assert_eq!(t.classify(60.0), "high");
        assert_eq!(t.classify(59.9), "mid");
        assert_eq!(t.classify(30.0), "mid");
        assert_eq!(t.classify(29.0), "low");
        assert_eq!(t.classify(0.0), "low");
    }

    #[test]
    fn classify_is_total() {
        let t = levels();
        assert_eq!(t.classify(-5.0), "low");
        assert_eq!(t.classify(f64::NEG_INFINITY), "low");
        assert_eq!(t.classify(f64::NAN), "low");
        assert_eq!(t.classify(1e12), "high");
    }

    #[test]
    fn buckets_never_rise_as_value_drops() {
        let t = battery_table();
        let mut last = 0;
        for v in (-10..=110).rev() {
            let b = t.bucket(v as f64);
            assert!(b >= last, "bucket went up at {}", v);
            last = b;
        }
        assert_eq!(last, t.len() - 1);
    }

    #[test]
    fn empty_table_rejected() {
        assert_eq!(ThresholdTable::new(vec![]), Err(ThresholdError::Empty));
    }

    #[test]
    fn equal_bounds_rejected() {
        let err = ThresholdTable::from_pairs([(10.0, "a"), (10.0, "b")]).unwrap_err();
        assert!(matches!(err, ThresholdError::NotDescending { index: 1, .. }));
    }

    #[test]
    fn ascending_bounds_rejected() {
        let err = ThresholdTable::from_pairs([(0.0, "a"), (10.0, "b")]).unwrap_err();
        assert!(matches!(err, ThresholdError::NotDescending { .. }));
    }

    #[test]
    fn nan_bound_rejected() {
        let err = ThresholdTable::from_pairs([(f64::NAN, "a")]).unwrap_err();
        assert_eq!(err, ThresholdError::NonFinite { index: 0 });
    }

    #[test]
    fn deserialize_validates() {
        let ok: ThresholdTable =
            serde_json::from_str(r#"[{"min": 5, "label": "x"}, {"min": 0, "label": "y"}]"#)
                .unwrap();
        assert_eq!(ok.len(), 2);
        let bad = serde_json::from_str::<ThresholdTable>(
            r#"[{"min": 0, "label": "x"}, {"min": 5, "label": "y"}]"#,
        );
        assert!(bad.is_err());
        assert!(serde_json::from_str::<ThresholdTable>("[]").is_err());
    }

    #[test]
    fn builtin_tables_are_valid() {
        assert!(ThresholdTable::new(battery_table().entries().to_vec()).is_ok());
        assert!(ThresholdTable::new(wifi_signal_table().entries().to_vec()).is_ok());
    }

    #[test]
    fn battery_full_and_critical() {
        let t = battery_table();
        assert_eq!(t.classify(100.0), "\u{f0079}");
        assert_eq!(t.classify(99.0), "\u{f0082}");
        assert_eq!(t.classify(5.0), "\u{f244}");
    }

    #[test]
    fn wifi_levels() {
        let t = wifi_signal_table();
        assert_eq!(t.classify(70.0), "\u{f1eb}");
        assert_eq!(t.classify(45.0), "\u{f0922}");
        assert_eq!(t.classify(12.0), "\u{f092f}");
    }
}
