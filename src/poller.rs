//! The status poller: query a source, derive a label, remember it.
//!
//! [`StatusPoller`] owns one [`MetricSource`] and one [`LabelMapping`].
//! Every [`refresh`](StatusPoller::refresh) is a full recomputation.  When
//! the source fails, the failure is logged and counted, and the previously
//! displayed label stays in place: a broken tool must never blank out or
//! take down the panel.

use crate::metric::{MetricError, MetricValue};
use crate::threshold::ThresholdTable;
use crate::traits::MetricSource;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How a raw reading becomes a label.
///
/// ```json
/// { "thresholds": [ { "min": 60, "label": "▂▄▆█" }, { "min": 0, "label": "▂" } ] }
/// { "value": { "format": "{}%" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMapping {
    /// Classify numeric readings through a table.  Text readings are shown
    /// verbatim.
    Thresholds(ThresholdTable),
    /// Show the reading itself, optionally substituted into `format` at
    /// the first `{}`.
    Value {
        #[serde(default)]
        format: Option<String>,
    },
}

impl Default for LabelMapping {
    fn default() -> Self {
        LabelMapping::Value { format: None }
    }
}

impl LabelMapping {
    /// Derive the label for `value`.
    pub fn label(&self, value: &MetricValue) -> String {
        match (self, value) {
            (LabelMapping::Thresholds(table), MetricValue::Number(n)) => {
                table.classify(*n).to_string()
            }
            (LabelMapping::Thresholds(_), MetricValue::Text(s)) => s.clone(),
            (LabelMapping::Value { format: None }, v) => v.to_string(),
            (LabelMapping::Value { format: Some(fmt) }, v) => {
                fmt.replacen("{}", &v.to_string(), 1)
            }
        }
    }
}

/// Result of one refresh, for callers that care.  Hosts may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The label changed.
    Updated,
    /// The reading succeeded and produced the same label as before.
    Unchanged,
    /// The metric was unavailable; the previous label was kept.
    Failed,
}

/// Counters that make "label unchanged" distinguishable from "refresh is
/// failing every time".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollerStats {
    pub successes: u64,
    pub failures: u64,
    /// Failures since the last success.
    pub consecutive_failures: u64,
    pub last_error: Option<String>,
}

/// A label kept in sync with one external metric.
pub struct StatusPoller<S: MetricSource> {
    source: S,
    mapping: LabelMapping,
    display: String,
    stats: PollerStats,
}

impl<S: MetricSource> StatusPoller<S> {
    /// Create a poller and run the first refresh immediately so the label
    /// is never blank when the source works.
    pub fn new(source: S, mapping: LabelMapping) -> Self {
        Self::with_initial(source, mapping, String::new())
    }

    /// Like [`new`](Self::new), but `initial` is shown until the first
    /// successful refresh.
    pub fn with_initial(source: S, mapping: LabelMapping, initial: impl Into<String>) -> Self {
        let mut poller = Self {
            source,
            mapping,
            display: initial.into(),
            stats: PollerStats::default(),
        };
        poller.refresh();
        poller
    }

    /// Query the source and update the label.
    ///
    /// Never fails: errors are logged, counted in [`stats`](Self::stats)
    /// and the previous label is kept.
    pub fn refresh(&mut self) -> RefreshOutcome {
        match self.try_refresh() {
            Ok(label) if label == self.display => RefreshOutcome::Unchanged,
            Ok(label) => {
                debug!("{}: {:?} -> {:?}", self.source.describe(), self.display, label);
                self.display = label;
                RefreshOutcome::Updated
            }
            Err(e) => {
                warn!("metric unavailable from {}: {}", self.source.describe(), e);
                RefreshOutcome::Failed
            }
        }
    }

    /// Query the source and return the label it maps to, without touching
    /// the displayed label.  Updates [`stats`](Self::stats).
    pub fn try_refresh(&mut self) -> Result<String, MetricError> {
        match self.source.read() {
            Ok(value) => {
                self.stats.successes += 1;
                self.stats.consecutive_failures = 0;
                Ok(self.mapping.label(&value))
            }
            Err(e) => {
                self.stats.failures += 1;
                self.stats.consecutive_failures += 1;
                self.stats.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Current label.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn stats(&self) -> &PollerStats {
        &self.stats
    }

    pub fn mapping(&self) -> &LabelMapping {
        &self.mapping
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
