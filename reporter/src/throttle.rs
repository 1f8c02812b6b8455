// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::{Duration, Instant};

use crate::status::SuiteAction;

/// Updates are sent at most once per interval so that suites with many quick
/// cases don't flood the collector.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(1);

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Decides whether a send may go out now. Denied attempts are simply dropped;
/// the next event tries again with whatever has accumulated by then.
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    interval: Duration,
    last_acknowledged: Option<Instant>,
}

impl Default for ThrottleGate {
    fn default() -> Self {
        ThrottleGate::new(DEFAULT_UPDATE_INTERVAL)
    }
}

impl ThrottleGate {
    pub fn new(interval: Duration) -> Self {
        ThrottleGate {
            interval,
            last_acknowledged: None,
        }
    }

    pub fn last_acknowledged(&self) -> Option<Instant> {
        self.last_acknowledged
    }

    pub fn permits(&self, action: SuiteAction, now: Instant) -> bool {
        if action.is_boundary() {
            return true;
        }

        match self.last_acknowledged {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Records a send the collector accepted. Only accepted sends move the
    /// window; attempts that failed or were dropped leave it where it was.
    pub fn acknowledge(&mut self, now: Instant) {
        self.last_acknowledged = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_is_permitted() {
        let gate = ThrottleGate::default();
        assert!(gate.permits(SuiteAction::Update, Instant::now()));
    }

    #[test]
    fn update_within_interval_is_denied() {
        let start = Instant::now();
        let mut gate = ThrottleGate::new(Duration::from_secs(1));
        gate.acknowledge(start);

        assert!(!gate.permits(SuiteAction::Update, start + Duration::from_millis(999)));
        assert!(gate.permits(SuiteAction::Update, start + Duration::from_secs(1)));
        assert!(gate.permits(SuiteAction::Update, start + Duration::from_millis(1500)));
    }

    #[test]
    fn boundary_actions_are_never_denied() {
        let start = Instant::now();
        let mut gate = ThrottleGate::new(Duration::from_secs(60));
        gate.acknowledge(start);

        assert!(gate.permits(SuiteAction::Start, start));
        assert!(gate.permits(SuiteAction::End, start));
        gate.acknowledge(start);
        assert!(gate.permits(SuiteAction::End, start + Duration::from_millis(1)));
    }

    #[test]
    fn window_moves_only_on_acknowledge() {
        let start = Instant::now();
        let mut gate = ThrottleGate::new(Duration::from_secs(1));
        gate.acknowledge(start);

        let later = start + Duration::from_secs(2);
        assert!(gate.permits(SuiteAction::Update, later));
        // asking again without acknowledging still succeeds
        assert!(gate.permits(SuiteAction::Update, later));
        assert_eq!(gate.last_acknowledged(), Some(start));

        gate.acknowledge(later);
        assert!(!gate.permits(SuiteAction::Update, later + Duration::from_millis(10)));
    }
}
