//! Application configuration.
//!
//! The configuration is loaded from a JSON file (by default
//! `$XDG_CONFIG_HOME/glyphbar/config.json`, or the path given with
//! `--config <path>`).  Every key is optional; a missing `widgets` list
//! yields the built-in battery and Wi-Fi widgets.
//!
//! # Example
//!
//! ```json
//! {
//!   "command_timeout_ms": 500,
//!   "interval_ms": 30000,
//!   "output": "json",
//!   "widgets": [
//!     {
//!       "name": "battery",
//!       "source": { "type": "file", "path": "/sys/class/power_supply/BAT0/capacity" },
//!       "display": { "value": { "format": "{}%" } },
//!       "style": { "foreground": "#22c55e" },
//!       "triggers": ["ScreenChange", "Tick"]
//!     },
//!     { "name": "label", "text": "Arch Linux" }
//!   ]
//! }
//! ```

use crate::hooks::HookEvent;
use crate::panel::{OutputFormat, Panel};
use crate::poller::LabelMapping;
use crate::sources::extract::{Extract, Parser, ValueKind};
use crate::sources::file::BATTERY_CAPACITY;
use crate::sources::SourceConfig;
use crate::threshold::{battery_table, wifi_signal_table};
use crate::widget::{Decoration, LabelStyle, PollingLabel, StaticLabel, StyleError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Palette of the stock panel.
pub mod colors {
    pub const BG: &str = "#1E1F27";
    pub const YELLOW: &str = "#eab308";
    pub const PURPLE: &str = "#9333ea";
    pub const GREEN: &str = "#22c55e";
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Socket path for hook events.  Defaults to
    /// `$XDG_RUNTIME_DIR/glyphbar.sock`.
    pub socket_path: Option<String>,
    /// Emit [`HookEvent::Tick`] this often.  Unset means no timer.
    pub interval_ms: Option<u64>,
    /// Deadline for each command invocation.
    pub command_timeout_ms: u64,
    pub output: OutputFormat,
    /// Separator between widgets in plain output.
    pub separator: String,
    pub widgets: Vec<WidgetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: None,
            interval_ms: None,
            command_timeout_ms: 1000,
            output: OutputFormat::Plain,
            separator: " ".into(),
            widgets: default_widgets(),
        }
    }
}

/// One panel entry.  Without a `source` it is a static label showing `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub name: String,
    #[serde(default)]
    pub source: Option<SourceConfig>,
    /// Static text, or the initial text of a polling widget.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub display: LabelMapping,
    #[serde(default)]
    pub style: LabelStyle,
    #[serde(default = "default_triggers")]
    pub triggers: Vec<HookEvent>,
}

/// `Tick` only ever arrives when `interval_ms` starts the ticker.
fn default_triggers() -> Vec<HookEvent> {
    vec![HookEvent::ScreenChange, HookEvent::RefreshAll, HookEvent::Tick]
}

/// Error from loading, parsing or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("duplicate widget name {0:?}")]
    DuplicateName(String),
    #[error("widget {0:?} has neither a source nor text")]
    Empty(String),
    #[error("widget {name:?}: {source}")]
    Style { name: String, source: StyleError },
    #[error("widget {0:?}: command program is empty")]
    EmptyProgram(String),
    #[error("command_timeout_ms must be positive")]
    ZeroTimeout,
    #[error("interval_ms must be positive")]
    ZeroInterval,
}

impl Config {
    /// Load and validate configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.interval_ms == Some(0) {
            return Err(ConfigError::ZeroInterval);
        }
        let mut seen = HashSet::new();
        for w in &self.widgets {
            if !seen.insert(w.name.as_str()) {
                return Err(ConfigError::DuplicateName(w.name.clone()));
            }
            match &w.source {
                None if w.text.is_none() => return Err(ConfigError::Empty(w.name.clone())),
                Some(SourceConfig::Command { program, .. }) if program.trim().is_empty() => {
                    return Err(ConfigError::EmptyProgram(w.name.clone()))
                }
                _ => {}
            }
            w.style.validate().map_err(|source| ConfigError::Style {
                name: w.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval_ms.map(Duration::from_millis)
    }

    /// Build the panel.  Polling widgets run their first refresh here.
    pub fn build_panel(&self) -> Panel {
        let mut panel = Panel::new(self.separator.clone());
        for w in &self.widgets {
            let text = w.text.clone().unwrap_or_default();
            match &w.source {
                None => panel.push(Box::new(StaticLabel::new(&w.name, text, w.style.clone()))),
                Some(source) => panel.push(Box::new(PollingLabel::new(
                    &w.name,
                    source.build(self.command_timeout()),
                    w.display.clone(),
                    text,
                    w.style.clone(),
                    w.triggers.clone(),
                ))),
            }
        }
        panel
    }
}

//  Stock widgets

fn decorated(style: LabelStyle) -> LabelStyle {
    LabelStyle {
        background: Some(colors::BG.into()),
        decoration: Decoration::Rounded { radius: 10 },
        ..style
    }
}

fn iwconfig(extract: Extract, kind: ValueKind) -> SourceConfig {
    SourceConfig::Command {
        program: "iwconfig".into(),
        args: vec![],
        parse: Parser::new(extract, kind),
    }
}

fn battery_capacity() -> SourceConfig {
    SourceConfig::File {
        path: BATTERY_CAPACITY.into(),
        parse: Parser::default(),
    }
}

/// The battery and Wi-Fi cluster of the stock panel.
pub fn default_widgets() -> Vec<WidgetConfig> {
    let base = LabelStyle::default();
    vec![
        WidgetConfig {
            name: "battery-icon".into(),
            source: Some(battery_capacity()),
            text: None,
            display: LabelMapping::Thresholds(battery_table()),
            style: decorated(
                base.clone()
                    .with_font_size(20)
                    .with_foreground(colors::GREEN)
                    .with_padding(4),
            ),
            triggers: default_triggers(),
        },
        WidgetConfig {
            name: "battery-percent".into(),
            source: Some(battery_capacity()),
            text: None,
            display: LabelMapping::default(),
            style: decorated(base.clone().with_padding(4)),
            triggers: default_triggers(),
        },
        WidgetConfig {
            name: "wifi-icon".into(),
            source: Some(iwconfig(
                Extract::Between {
                    start: "Link Quality=".into(),
                    end: Some("/70".into()),
                },
                ValueKind::Number,
            )),
            text: None,
            display: LabelMapping::Thresholds(wifi_signal_table()),
            style: decorated(base.clone().with_font_size(16).with_foreground(colors::YELLOW)),
            triggers: default_triggers(),
        },
        WidgetConfig {
            name: "wifi-name".into(),
            source: Some(iwconfig(
                Extract::Between {
                    start: "ESSID:".into(),
                    end: None,
                },
                ValueKind::Text,
            )),
            text: None,
            display: LabelMapping::default(),
            style: decorated(base.clone().with_padding(10)),
            triggers: default_triggers(),
        },
        WidgetConfig {
            name: "volume-icon".into(),
            source: None,
            text: Some("\u{f071f}".into()),
            display: LabelMapping::default(),
            style: decorated(
                base.with_font_size(16)
                    .with_foreground(colors::PURPLE)
                    .with_padding(4),
            ),
            triggers: vec![],
        },
    ]
}
