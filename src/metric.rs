//! Values and errors shared by every metric source.
//!
//! A source yields exactly one [`MetricValue`] per query.  Anything that
//! goes wrong on the way there is a [`MetricError`]; the poller treats all
//! of them as "metric unavailable" and keeps its previous label.

use std::fmt;
use std::time::Duration;

/// A single raw reading from a metric source.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Numeric reading, classified through a threshold table or shown as is.
    Number(f64),
    /// Free-form text, shown as is.
    Text(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// Why a metric could not be read.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    /// The program does not exist on `PATH`.
    #[error("command not found: {program}")]
    CommandNotFound { program: String },

    /// The program ran but exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The program did not finish within its deadline and was killed.
    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    /// Spawning, reading a pipe or reading a file failed.
    #[error("io error on {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Output was readable but did not look like we expected.
    #[error("unexpected output: {0}")]
    UnexpectedOutputShape(String),

    /// Value parsed but no label covers it.  Unreachable while every
    /// threshold table ends in a catch-all.
    #[error("value {0} is out of range")]
    ValueOutOfRange(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_have_no_fraction() {
        assert_eq!(MetricValue::Number(100.0).to_string(), "100");
        assert_eq!(MetricValue::Number(-3.0).to_string(), "-3");
        assert_eq!(MetricValue::Number(42.5).to_string(), "42.5");
    }

    #[test]
    fn text_displays_verbatim() {
        assert_eq!(MetricValue::Text("home-net".into()).to_string(), "home-net");
        assert_eq!(MetricValue::Text("x".into()).as_number(), None);
    }

    #[test]
    fn error_messages_name_the_program() {
        let e = MetricError::CommandNotFound {
            program: "iwconfig".into(),
        };
        assert_eq!(e.to_string(), "command not found: iwconfig");
        let e = MetricError::Timeout {
            program: "sleep".into(),
            timeout: Duration::from_millis(50),
        };
        assert!(e.to_string().contains("sleep timed out"));
    }
}
