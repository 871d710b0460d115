//! Core traits that decouple glyphbar from any specific metric backend,
//! panel host or trigger transport.
//!
//! Every concrete backend (a subprocess, a sysfs file, a Unix-socket
//! listener, a test harness, …) implements one of these traits.  The
//! [`StatusPoller`](crate::poller::StatusPoller) and the
//! [`Panel`](crate::panel::Panel) only depend on these abstractions.

use crate::hooks::HookEvent;
use crate::metric::{MetricError, MetricValue};
use crate::poller::RefreshOutcome;
use crate::widget::LabelStyle;
use std::sync::mpsc;

/// A read-only query that yields one raw metric value.
///
/// Implementations must not change system state: calling
/// [`read`](MetricSource::read) twice in a row with nothing changed
/// outside the process must return the same value.
pub trait MetricSource {
    /// Run the query and parse its output.
    fn read(&mut self) -> Result<MetricValue, MetricError>;

    /// Short human-readable description used in log messages
    /// (e.g. `"iwconfig"` or `"/sys/class/power_supply/BAT0/capacity"`).
    fn describe(&self) -> String;
}

impl<S: MetricSource + ?Sized> MetricSource for Box<S> {
    fn read(&mut self) -> Result<MetricValue, MetricError> {
        (**self).read()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

//  Widget

/// What the panel needs from each entry: something renderable as text,
/// plus an optional way to refresh it.
pub trait Widget {
    /// Unique name within the panel.
    fn name(&self) -> &str;

    /// Text to draw right now.
    fn text(&self) -> &str;

    /// Presentation options.
    fn style(&self) -> &LabelStyle;

    /// Events that should trigger [`refresh`](Widget::refresh).
    ///
    /// Static widgets return an empty slice.
    fn triggers(&self) -> &[HookEvent] {
        &[]
    }

    /// Re-derive the displayed text.  Never fails; widgets without a
    /// backing source report [`RefreshOutcome::Unchanged`].
    fn refresh(&mut self) -> RefreshOutcome {
        RefreshOutcome::Unchanged
    }
}

//  Trigger Source

/// A source of [`HookEvent`]s.
///
/// Implementations listen on some transport — a Unix socket, a timer, a
/// compositor event stream, … — and forward events into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](TriggerSource::run) **blocks** until the source is exhausted,
///   the receiver hangs up, or an unrecoverable error occurs.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait TriggerSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every event into `sink`.
    fn run(&mut self, sink: mpsc::Sender<HookEvent>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    //  Mock MetricSource

    /// A test double that replays a fixed sequence of readings.
    struct Replay {
        values: Vec<f64>,
    }

    impl MetricSource for Replay {
        fn read(&mut self) -> Result<MetricValue, MetricError> {
            if self.values.is_empty() {
                return Err(MetricError::UnexpectedOutputShape("drained".into()));
            }
            Ok(MetricValue::Number(self.values.remove(0)))
        }

        fn describe(&self) -> String {
            "replay".into()
        }
    }

    #[test]
    fn boxed_source_forwards() {
        let mut src: Box<dyn MetricSource> = Box::new(Replay {
            values: vec![1.0, 2.0],
        });
        assert_eq!(src.describe(), "replay");
        assert_eq!(src.read().unwrap(), MetricValue::Number(1.0));
        assert_eq!(src.read().unwrap(), MetricValue::Number(2.0));
        assert!(src.read().is_err());
    }

    //  Mock Widget

    struct Fixed {
        style: LabelStyle,
    }

    impl Widget for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn text(&self) -> &str {
            "x"
        }

        fn style(&self) -> &LabelStyle {
            &self.style
        }
    }

    #[test]
    fn widget_defaults_are_inert() {
        let mut w = Fixed {
            style: LabelStyle::default(),
        };
        assert!(w.triggers().is_empty());
        assert_eq!(w.refresh(), RefreshOutcome::Unchanged);
        assert_eq!(w.text(), "x");
    }

    //  Mock TriggerSource

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    /// Emits a fixed sequence of events.
    struct MockTriggers {
        events: Vec<HookEvent>,
    }

    impl TriggerSource for MockTriggers {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<HookEvent>) -> Result<(), MockError> {
            for ev in self.events.drain(..) {
                let _ = sink.send(ev);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_events() {
        let mut src = MockTriggers {
            events: vec![HookEvent::ScreenChange, HookEvent::Tick],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let evs: Vec<HookEvent> = rx.try_iter().collect();
        assert_eq!(evs, vec![HookEvent::ScreenChange, HookEvent::Tick]);
    }
}
