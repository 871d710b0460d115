//! The panel: an ordered row of widgets and its text rendering.
//!
//! Widgets sit behind [`RefCell`]s so that hook callbacks registered via
//! [`Panel::register_hooks`] can refresh them while the panel itself is
//! only borrowed shared.  Everything here lives on the event-loop thread.

use crate::hooks::HookRegistry;
use crate::traits::Widget;
use crate::widget::Decoration;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// How the panel is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One line of text, widgets joined by the separator.
    #[default]
    Plain,
    /// One JSON array of i3bar-style blocks per line.
    Json,
}

/// One entry of [`OutputFormat::Json`] output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub full_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub separator_block_width: u32,
    #[serde(rename = "_font_size")]
    pub font_size: u32,
    #[serde(rename = "_radius", skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
}

/// Ordered collection of widgets.
pub struct Panel {
    widgets: Vec<RefCell<Box<dyn Widget>>>,
    separator: String,
}

impl Panel {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            widgets: Vec::new(),
            separator: separator.into(),
        }
    }

    /// Append a widget at the right end of the panel.
    pub fn push(&mut self, widget: Box<dyn Widget>) {
        self.widgets.push(RefCell::new(widget));
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Current text of the widget called `name`.
    pub fn text_of(&self, name: &str) -> Option<String> {
        self.widgets
            .iter()
            .map(|w| w.borrow())
            .find(|w| w.name() == name)
            .map(|w| w.text().to_string())
    }

    /// Subscribe every widget to each of its trigger events.
    pub fn register_hooks<'a>(&'a self, registry: &mut HookRegistry<'a>) {
        for cell in &self.widgets {
            let triggers = cell.borrow().triggers().to_vec();
            for event in triggers {
                registry.subscribe(event, move |ev| {
                    let mut widget = cell.borrow_mut();
                    let outcome = widget.refresh();
                    debug!("{} on {}: {:?}", widget.name(), ev, outcome);
                });
            }
        }
    }

    /// Render the panel in the given format.
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Plain => self.render_plain(),
            OutputFormat::Json => {
                // Serialising plain structs of strings and integers cannot fail.
                serde_json::to_string(&self.blocks()).unwrap_or_else(|_| "[]".into())
            }
        }
    }

    fn render_plain(&self) -> String {
        self.widgets
            .iter()
            .map(|w| w.borrow().text().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    /// The panel as a list of JSON blocks.
    pub fn blocks(&self) -> Vec<Block> {
        self.widgets
            .iter()
            .map(|cell| {
                let w = cell.borrow();
                let style = w.style();
                Block {
                    name: w.name().to_string(),
                    full_text: w.text().to_string(),
                    color: style.foreground.clone(),
                    background: style.background.clone(),
                    separator_block_width: style.padding,
                    font_size: style.font_size,
                    radius: match style.decoration {
                        Decoration::None => None,
                        Decoration::Rounded { radius } => Some(radius),
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookEvent;
    use crate::metric::{MetricError, MetricValue};
    use crate::poller::LabelMapping;
    use crate::traits::MetricSource;
    use crate::widget::{LabelStyle, PollingLabel, StaticLabel};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Source whose reading is controlled from the test.
    struct Shared(Rc<Cell<f64>>);

    impl MetricSource for Shared {
        fn read(&mut self) -> Result<MetricValue, MetricError> {
            Ok(MetricValue::Number(self.0.get()))
        }

        fn describe(&self) -> String {
            "shared".into()
        }
    }

    fn panel_with(value: &Rc<Cell<f64>>, triggers: Vec<HookEvent>) -> Panel {
        let mut panel = Panel::new(" | ");
        panel.push(Box::new(StaticLabel::new("icon", "B", LabelStyle::default())));
        panel.push(Box::new(PollingLabel::new(
            "percent",
            Shared(value.clone()),
            LabelMapping::default(),
            "",
            LabelStyle::default().with_foreground("#22c55e"),
            triggers,
        )));
        panel.push(Box::new(StaticLabel::new("empty", "", LabelStyle::default())));
        panel
    }

    #[test]
    fn plain_render_skips_empty_labels() {
        let v = Rc::new(Cell::new(80.0));
        let panel = panel_with(&v, vec![HookEvent::ScreenChange]);
        assert_eq!(panel.render(OutputFormat::Plain), "B | 80");
    }

    #[test]
    fn hooks_refresh_subscribed_widgets() {
        let v = Rc::new(Cell::new(80.0));
        let panel = panel_with(&v, vec![HookEvent::ScreenChange]);
        let mut reg = HookRegistry::new();
        panel.register_hooks(&mut reg);
        assert_eq!(reg.subscribers(HookEvent::ScreenChange), 1);

        v.set(79.0);
        assert_eq!(reg.emit(HookEvent::Tick), 0);
        assert_eq!(panel.text_of("percent").as_deref(), Some("80"));
        assert_eq!(reg.emit(HookEvent::ScreenChange), 1);
        assert_eq!(panel.text_of("percent").as_deref(), Some("79"));
    }

    #[test]
    fn json_blocks_carry_style() {
        let v = Rc::new(Cell::new(50.0));
        let panel = panel_with(&v, vec![]);
        let json = panel.render(OutputFormat::Json);
        let blocks: Vec<Block> = serde_json::from_str(&json).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].name, "percent");
        assert_eq!(blocks[1].full_text, "50");
        assert_eq!(blocks[1].color.as_deref(), Some("#22c55e"));
        assert!(!json.contains("\"color\":null"));
        assert!(json.contains("\"_font_size\":12"));
    }

    #[test]
    fn padding_only_widens_json_blocks() {
        let mut panel = Panel::new(" ");
        panel.push(Box::new(StaticLabel::new("a", "A", LabelStyle::default().with_padding(0))));
        panel.push(Box::new(StaticLabel::new("b", "B", LabelStyle::default().with_padding(12))));
        assert_eq!(panel.render(OutputFormat::Plain), "A B");
        let blocks = panel.blocks();
        assert_eq!(blocks[0].separator_block_width, 0);
        assert_eq!(blocks[1].separator_block_width, 12);
    }

    #[test]
    fn text_of_unknown_widget() {
        let panel = Panel::new(" ");
        assert!(panel.is_empty());
        assert_eq!(panel.text_of("nope"), None);
    }
}
