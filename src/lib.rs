//! **glyphbar** — event-driven glyph labels for window-manager panels.
//!
//! A panel is a row of widgets.  Most are plain labels; the interesting ones
//! are *status pollers*: each runs a read-only external query (`iwconfig`,
//! a sysfs battery file, …), extracts one value from the output, and maps
//! it to a short label such as a Nerd Font glyph or a percentage.
//!
//! # Architecture
//!
//! The crate is organised around three traits in [`traits`]:
//!
//! * [`traits::MetricSource`] — one external query plus its parse rule.
//!   Implementations live in [`sources`].
//! * [`traits::Widget`] — what the [`panel::Panel`] renders: text, a style,
//!   and an optional refresh.
//! * [`traits::TriggerSource`] — delivers host [`hooks::HookEvent`]s (a Unix
//!   socket in [`ipc`], a timer in [`ticker`]) to the event loop.
//!
//! Events reach widgets through a [`hooks::HookRegistry`] that the daemon
//! fills at start-up; a [`poller::StatusPoller`] that fails keeps showing
//! its last good label.

pub mod config;
pub mod hooks;
pub mod ipc;
pub mod metric;
pub mod panel;
pub mod poller;
pub mod sources;
pub mod threshold;
pub mod ticker;
pub mod traits;
pub mod widget;
