//! Panel widgets: styled labels, either fixed or backed by a poller.

use crate::hooks::HookEvent;
use crate::metric::MetricError;
use crate::poller::{LabelMapping, PollerStats, RefreshOutcome, StatusPoller};
use crate::traits::{MetricSource, Widget};
use serde::{Deserialize, Serialize};

/// Background shape drawn behind a label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    #[default]
    None,
    /// Filled rounded rectangle in the label's background colour.
    Rounded { radius: u32 },
}

/// Presentation options for one label.
///
/// Colours are `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font_size: u32,
    pub foreground: Option<String>,
    pub background: Option<String>,
    /// Horizontal padding in pixels, emitted as `separator_block_width` in
    /// JSON output.  Plain output ignores it.
    pub padding: u32,
    pub decoration: Decoration,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 12,
            foreground: None,
            background: None,
            padding: 3,
            decoration: Decoration::None,
        }
    }
}

/// Problems found while validating a [`LabelStyle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("invalid colour {0:?}, expected #RRGGBB or #RRGGBBAA")]
    Colour(String),
    #[error("font size must be positive")]
    FontSize,
}

impl LabelStyle {
    pub fn validate(&self) -> Result<(), StyleError> {
        if self.font_size == 0 {
            return Err(StyleError::FontSize);
        }
        for colour in [&self.foreground, &self.background].into_iter().flatten() {
            if !is_hex_colour(colour) {
                return Err(StyleError::Colour(colour.clone()));
            }
        }
        Ok(())
    }

    pub fn with_foreground(mut self, colour: &str) -> Self {
        self.foreground = Some(colour.to_string());
        self
    }

    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }
}

fn is_hex_colour(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

//  Static label

/// A label whose text never changes (icons, titles).
#[derive(Debug, Clone)]
pub struct StaticLabel {
    name: String,
    text: String,
    style: LabelStyle,
}

impl StaticLabel {
    pub fn new(name: impl Into<String>, text: impl Into<String>, style: LabelStyle) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            style,
        }
    }
}

impl Widget for StaticLabel {
    fn name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn style(&self) -> &LabelStyle {
        &self.style
    }
}

//  Polling label

/// A [`StatusPoller`] dressed up as a panel widget.
pub struct PollingLabel<S: MetricSource> {
    name: String,
    poller: StatusPoller<S>,
    style: LabelStyle,
    triggers: Vec<HookEvent>,
}

impl<S: MetricSource> PollingLabel<S> {
    /// Build the widget.  The poller refreshes once right away.
    pub fn new(
        name: impl Into<String>,
        source: S,
        mapping: LabelMapping,
        initial: impl Into<String>,
        style: LabelStyle,
        triggers: Vec<HookEvent>,
    ) -> Self {
        Self {
            name: name.into(),
            poller: StatusPoller::with_initial(source, mapping, initial),
            style,
            triggers,
        }
    }

    pub fn stats(&self) -> &PollerStats {
        self.poller.stats()
    }

    pub fn try_refresh(&mut self) -> Result<String, MetricError> {
        self.poller.try_refresh()
    }
}

impl<S: MetricSource> Widget for PollingLabel<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        self.poller.display()
    }

    fn style(&self) -> &LabelStyle {
        &self.style
    }

    fn triggers(&self) -> &[HookEvent] {
        &self.triggers
    }

    fn refresh(&mut self) -> RefreshOutcome {
        self.poller.refresh()
    }
}
