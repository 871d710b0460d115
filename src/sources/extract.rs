//! Parsing rules that pull one value out of raw text output.
//!
//! Command output formats (looking at you, `iwconfig`) are not stable across
//! tool versions or locales, so marker-based rules search every line rather
//! than trusting a fixed line number.

use crate::metric::{MetricError, MetricValue};
use serde::{Deserialize, Serialize};

/// Where in the output the value lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extract {
    /// The entire output, trimmed.
    #[default]
    Whole,
    /// Text after `start` and, if given, before the next `end` on the first
    /// line containing `start`.
    Between { start: String, end: Option<String> },
    /// One line by zero-based index, trimmed.
    Line(usize),
}

/// How to interpret the extracted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Number,
    Text,
}

/// An extraction rule plus the kind of value it produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parser {
    #[serde(default)]
    pub extract: Extract,
    #[serde(default)]
    pub kind: ValueKind,
}

impl Parser {
    pub fn new(extract: Extract, kind: ValueKind) -> Self {
        Self { extract, kind }
    }

    /// Apply the rule to `output`.
    pub fn parse(&self, output: &str) -> Result<MetricValue, MetricError> {
        let raw = self.extract.apply(output)?;
        match self.kind {
            ValueKind::Number => parse_number(raw).map(MetricValue::Number),
            ValueKind::Text => Ok(MetricValue::Text(clean_text(raw))),
        }
    }
}

impl Extract {
    fn apply<'a>(&self, output: &'a str) -> Result<&'a str, MetricError> {
        match self {
            Extract::Whole => Ok(output.trim()),
            Extract::Line(index) => output
                .lines()
                .nth(*index)
                .map(str::trim)
                .ok_or_else(|| {
                    MetricError::UnexpectedOutputShape(format!(
                        "no line {} in {} line(s) of output",
                        index,
                        output.lines().count()
                    ))
                }),
            Extract::Between { start, end } => {
                let rest = output
                    .lines()
                    .find_map(|line| line.find(start.as_str()).map(|i| &line[i + start.len()..]))
                    .ok_or_else(|| {
                        MetricError::UnexpectedOutputShape(format!("marker {:?} not found", start))
                    })?;
                match end {
                    None => Ok(rest.trim()),
                    Some(end) => rest
                        .find(end.as_str())
                        .map(|i| rest[..i].trim())
                        .ok_or_else(|| {
                            MetricError::UnexpectedOutputShape(format!(
                                "end marker {:?} not found after {:?}",
                                end, start
                            ))
                        }),
                }
            }
        }
    }
}

fn parse_number(raw: &str) -> Result<f64, MetricError> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
        .ok_or_else(|| MetricError::UnexpectedOutputShape(format!("not a number: {:?}", raw)))
}

/// Strip quotes and surrounding whitespace, and collapse the double-space
/// padding some tools emit.
fn clean_text(raw: &str) -> String {
    let unquoted: String = raw.chars().filter(|c| *c != '"').collect();
    let mut out = unquoted.trim().to_string();
    while out.contains("  ") {
        out = out.replace("  ", " ");
    }
    out
}
