//! Concrete [`MetricSource`](crate::traits::MetricSource) backends.
//!
//! * [`command`] runs a program and parses its stdout.
//! * [`file`] reads a file (sysfs attributes, mostly).
//! * [`extract`] holds the parsing rules both of them share.
//!
//! [`SourceConfig`] is the serialisable description of either, and
//! [`SourceConfig::build`] turns it into a boxed source.

pub mod command;
pub mod extract;
pub mod file;

use crate::traits::MetricSource;
use command::CommandMetric;
use extract::Parser;
use file::FileMetric;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one metric source.
///
/// ```json
/// { "type": "command", "program": "iwconfig",
///   "parse": { "extract": { "between": { "start": "Link Quality=", "end": "/70" } } } }
/// { "type": "file", "path": "/sys/class/power_supply/BAT0/capacity" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        parse: Parser,
    },
    File {
        path: String,
        #[serde(default)]
        parse: Parser,
    },
}

impl SourceConfig {
    /// Instantiate the source.  `timeout` bounds each command invocation
    /// and is ignored for file sources.
    pub fn build(&self, timeout: Duration) -> Box<dyn MetricSource> {
        match self {
            SourceConfig::Command {
                program,
                args,
                parse,
            } => Box::new(
                CommandMetric::new(program.clone(), args.clone(), parse.clone())
                    .with_timeout(timeout),
            ),
            SourceConfig::File { path, parse } => Box::new(FileMetric::new(path, parse.clone())),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MetricValue;
    use super::extract::{Extract, ValueKind};

    #[test]
    fn deserialize_command_source() {
        let json = r#"{
            "type": "command",
            "program": "iwconfig",
            "parse": { "extract": { "between": { "start": "ESSID:" } }, "kind": "text" }
        }"#;
        let cfg: SourceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            cfg,
            SourceConfig::Command {
                program: "iwconfig".into(),
                args: vec![],
                parse: Parser::new(
                    Extract::Between {
                        start: "ESSID:".into(),
                        end: None
                    },
                    ValueKind::Text
                ),
            }
        );
    }

    #[test]
    fn deserialize_file_source_defaults_to_whole_number() {
        let cfg: SourceConfig =
            serde_json::from_str(r#"{ "type": "file", "path": "/tmp/x" }"#).unwrap();
        assert_eq!(
            cfg,
            SourceConfig::File {
                path: "/tmp/x".into(),
                parse: Parser::default()
            }
        );
    }

    #[test]
    fn unknown_type_rejected() {
        assert!(serde_json::from_str::<SourceConfig>(r#"{ "type": "dbus" }"#).is_err());
    }

    #[test]
    fn built_file_source_reads() {
        let path = super::test_support::tmp_path("built");
        std::fs::write(&path, "55").unwrap();
        let cfg = SourceConfig::File {
            path: path.display().to_string(),
            parse: Parser::default(),
        };
        let mut src = cfg.build(Duration::from_millis(100));
        assert_eq!(src.read().unwrap(), MetricValue::Number(55.0));
        assert_eq!(src.describe(), path.display().to_string());
        let _ = std::fs::remove_file(&path);
    }
}
