//! Optional periodic [`HookEvent::Tick`] source.
//!
//! Off unless `interval_ms` is configured: labels normally refresh only when
//! the host signals an event, and may go stale in between.

use crate::hooks::HookEvent;
use crate::traits::TriggerSource;
use log::debug;
use std::convert::Infallible;
use std::sync::mpsc;
use std::time::Duration;

/// Sends [`HookEvent::Tick`] every `interval` until the receiver hangs up.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    interval: Duration,
    limit: Option<u64>,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            limit: None,
        }
    }

    /// Stop after `n` ticks.
    pub fn take(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }
}

impl TriggerSource for IntervalTicker {
    type Error = Infallible;

    fn run(&mut self, sink: mpsc::Sender<HookEvent>) -> Result<(), Infallible> {
        let mut sent = 0u64;
        while self.limit.map_or(true, |n| sent < n) {
            std::thread::sleep(self.interval);
            if sink.send(HookEvent::Tick).is_err() {
                debug!("ticker sink closed");
                break;
            }
            sent += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_after_limit() {
        let (tx, rx) = mpsc::channel();
        IntervalTicker::new(Duration::from_millis(1))
            .take(3)
            .run(tx)
            .unwrap();
        let ticks: Vec<_> = rx.try_iter().collect();
        assert_eq!(ticks, vec![HookEvent::Tick; 3]);
    }

    #[test]
    fn stops_when_receiver_drops() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        // Would loop forever without the hang-up check.
        IntervalTicker::new(Duration::from_millis(1)).run(tx).unwrap();
    }
}
