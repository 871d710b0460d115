//! Host events and the registry that routes them to callbacks.
//!
//! Nothing subscribes itself to a global hook table.  Whoever builds the
//! panel creates a [`HookRegistry`], registers `(event, callback)` pairs on
//! it, and hands it to the event loop, which calls
//! [`emit`](HookRegistry::emit) for every incoming [`HookEvent`].

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A signal from the host that labels may be stale.
///
/// On the wire each event is a bare JSON string, e.g. `"ScreenChange"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    /// Outputs were added, removed or reconfigured.
    ScreenChange,
    /// Periodic tick from the interval ticker.
    Tick,
    /// Explicit request to refresh everything subscribed to it.
    RefreshAll,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookEvent::ScreenChange => write!(f, "screen-change"),
            HookEvent::Tick => write!(f, "tick"),
            HookEvent::RefreshAll => write!(f, "refresh-all"),
        }
    }
}

/// Callback run when a subscribed event fires.
pub type Hook<'a> = Box<dyn FnMut(HookEvent) + 'a>;

/// Event → callbacks table.
///
/// Callbacks for one event run in subscription order.
#[derive(Default)]
pub struct HookRegistry<'a> {
    hooks: HashMap<HookEvent, Vec<Hook<'a>>>,
}

impl<'a> HookRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` every time `event` is emitted.
    pub fn subscribe(&mut self, event: HookEvent, hook: impl FnMut(HookEvent) + 'a) {
        self.hooks.entry(event).or_default().push(Box::new(hook));
    }

    /// Run every callback subscribed to `event`; returns how many ran.
    pub fn emit(&mut self, event: HookEvent) -> usize {
        let Some(hooks) = self.hooks.get_mut(&event) else {
            debug!("no subscribers for {}", event);
            return 0;
        };
        for hook in hooks.iter_mut() {
            hook(event);
        }
        hooks.len()
    }

    /// Number of callbacks subscribed to `event`.
    pub fn subscribers(&self, event: HookEvent) -> usize {
        self.hooks.get(&event).map_or(0, Vec::len)
    }
}

impl fmt::Debug for HookRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self.hooks.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("HookRegistry").field("hooks", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn emit_runs_only_matching_hooks() {
        let log = RefCell::new(Vec::new());
        let mut reg = HookRegistry::new();
        reg.subscribe(HookEvent::ScreenChange, |e| log.borrow_mut().push(("a", e)));
        reg.subscribe(HookEvent::Tick, |e| log.borrow_mut().push(("b", e)));

        assert_eq!(reg.emit(HookEvent::ScreenChange), 1);
        assert_eq!(reg.emit(HookEvent::RefreshAll), 0);
        drop(reg);
        assert_eq!(log.into_inner(), vec![("a", HookEvent::ScreenChange)]);
    }

    #[test]
    fn hooks_run_in_subscription_order() {
        let order = RefCell::new(Vec::new());
        let mut reg = HookRegistry::new();
        for i in 0..3 {
            let order = &order;
            reg.subscribe(HookEvent::RefreshAll, move |_| order.borrow_mut().push(i));
        }
        assert_eq!(reg.subscribers(HookEvent::RefreshAll), 3);
        reg.emit(HookEvent::RefreshAll);
        drop(reg);
        assert_eq!(order.into_inner(), vec![0, 1, 2]);
    }

    #[test]
    fn events_on_the_wire() {
        let e: HookEvent = serde_json::from_str(r#""ScreenChange""#).unwrap();
        assert_eq!(e, HookEvent::ScreenChange);
        assert_eq!(serde_json::to_string(&HookEvent::Tick).unwrap(), r#""Tick""#);
        assert!(serde_json::from_str::<HookEvent>(r#""Reboot""#).is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(HookEvent::ScreenChange.to_string(), "screen-change");
        assert_eq!(HookEvent::RefreshAll.to_string(), "refresh-all");
    }
}
