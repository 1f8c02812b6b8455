// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Accumulates one suite's report and streams it to a remote collector.
//!
//! A [`SuiteAggregator`] is single use: it moves from uninitialized to started
//! on the suite start, absorbs setup, case and teardown results, and ends with
//! the suite. Every mutation asks the [`ThrottleGate`] whether to send; the
//! start and end of the suite always go out, updates at most once per interval.
//! Results that have been accepted by the collector are dropped locally, so each
//! send only carries what completed since the last accepted one.
//!
//! Nothing here fails the test run being reported. Delivery problems become a
//! single diagnostic line and the unsent results wait for the next event.

use std::time::Duration;

use crate::errors::Result;
use crate::events::LifecycleEvent;
use crate::harness::{SetupSummary, SpecSummary, SuiteSummary};
use crate::reporters::Reporter;
use crate::status::{CaseResult, Suite, SuiteAction, SuiteMessage, SuiteStats};
use crate::throttle::{Clock, SystemClock, ThrottleGate};
use crate::transport::{self, HttpTransport, Transport};
use crate::utils::writer::Writer;

const PHASE_SUITE_START: &str = "Suite (start)";
const PHASE_SETUP: &str = "BeforeSuite";
const PHASE_CASE: &str = "Spec";
const PHASE_TEARDOWN: &str = "AfterSuite";
const PHASE_SUITE_END: &str = "Suite (end)";

#[derive(Default)]
enum Lifecycle {
    #[default]
    Uninitialized,
    Started(Suite),
    Ended(Suite),
}

pub struct SuiteAggregator<T = HttpTransport, C = SystemClock> {
    lifecycle: Lifecycle,
    completed: usize,
    gate: ThrottleGate,
    transport: T,
    clock: C,
    diagnostics: Writer,
}

impl SuiteAggregator<HttpTransport, SystemClock> {
    /// An aggregator posting to `http://<addr>/report-suite`.
    pub fn remote(addr: &str, timeout: Duration, interval: Duration) -> Result<Self> {
        Ok(SuiteAggregator::new(
            HttpTransport::new(addr, timeout)?,
            SystemClock,
            ThrottleGate::new(interval),
        ))
    }
}

impl<T: Transport, C: Clock> SuiteAggregator<T, C> {
    pub fn new(transport: T, clock: C, gate: ThrottleGate) -> Self {
        SuiteAggregator {
            lifecycle: Lifecycle::Uninitialized,
            completed: 0,
            gate,
            transport,
            clock,
            diagnostics: Writer::default(),
        }
    }

    /// Sends diagnostics to `writer` instead of standard error.
    pub fn with_diagnostics(mut self, writer: Writer) -> Self {
        self.diagnostics = writer;
        self
    }

    pub fn into_diagnostics(self) -> Writer {
        self.diagnostics
    }

    /// The suite as it stands, once started.
    pub fn suite(&self) -> Option<&Suite> {
        match &self.lifecycle {
            Lifecycle::Started(suite) | Lifecycle::Ended(suite) => Some(suite),
            Lifecycle::Uninitialized => None,
        }
    }

    pub fn has_ended(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ended(..))
    }

    pub fn apply(&mut self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::SuiteStarted(sum) => {
                self.on_suite_start(sum.suite_description.as_str(), sum.suite_id.as_str())
            }
            LifecycleEvent::SetupCompleted(sum) => self.on_setup_complete(sum),
            LifecycleEvent::CaseCompleted(sum) => self.on_case_complete(sum),
            LifecycleEvent::TeardownCompleted(sum) => self.on_teardown_complete(sum),
            LifecycleEvent::SuiteEnded(sum) => self.on_suite_end(sum),
        }
    }

    pub fn on_suite_start(&mut self, name: impl Into<String>, id: impl Into<String>) {
        if !matches!(self.lifecycle, Lifecycle::Uninitialized) {
            panic!("suite start reported twice, an aggregator reports exactly one suite");
        }

        self.lifecycle = Lifecycle::Started(Suite::new(name, id));
        self.completed = 0;
        self.request(SuiteAction::Start, PHASE_SUITE_START);
    }

    pub fn on_setup_complete(&mut self, sum: &SetupSummary) {
        let result = CaseResult::from(sum);
        self.started(PHASE_SETUP).before_suite = Some(result);
        self.request(SuiteAction::Update, PHASE_SETUP);
    }

    pub fn on_case_complete(&mut self, sum: &SpecSummary) {
        let result = CaseResult::from(sum);
        self.completed += 1;
        self.started(PHASE_CASE).pending_cases.push(result);
        self.request(SuiteAction::Update, PHASE_CASE);
    }

    pub fn on_teardown_complete(&mut self, sum: &SetupSummary) {
        let result = CaseResult::from(sum);
        self.started(PHASE_TEARDOWN).after_suite = Some(result);
        self.request(SuiteAction::Update, PHASE_TEARDOWN);
    }

    pub fn on_suite_end(&mut self, sum: &SuiteSummary) {
        let stats = SuiteStats::from(sum);
        if stats.total != self.completed {
            log::warn!(
                "harness summary counts {} specs but {} were reported as completed",
                stats.total,
                self.completed
            );
        }

        let suite = self.started(PHASE_SUITE_END);
        suite.run_time = sum.run_time;
        suite.stats = Some(stats);
        if let Lifecycle::Started(suite) = std::mem::take(&mut self.lifecycle) {
            self.lifecycle = Lifecycle::Ended(suite);
        }

        self.request(SuiteAction::End, PHASE_SUITE_END);
    }

    fn started(&mut self, phase: &str) -> &mut Suite {
        match &mut self.lifecycle {
            Lifecycle::Started(suite) => suite,
            Lifecycle::Uninitialized => panic!("{phase} reported before the suite started"),
            Lifecycle::Ended(suite) => {
                panic!("{phase} reported after suite {:?} ended", suite.name)
            }
        }
    }

    fn request(&mut self, action: SuiteAction, phase: &str) {
        if !self.gate.permits(action, self.clock.now()) {
            log::debug!("throttled {action} from {phase}");
            return;
        }

        let suite = match &mut self.lifecycle {
            Lifecycle::Started(suite) | Lifecycle::Ended(suite) => suite,
            Lifecycle::Uninitialized => unreachable!("sends are only requested for a started suite"),
        };

        let message = SuiteMessage {
            action,
            suite: &*suite,
        };
        let delivered = transport::deliver(&mut self.transport, &message);
        match delivered {
            Ok(()) => {
                log::debug!(
                    "sent {action} for suite {:?} with {} new results",
                    suite.name,
                    suite.pending_cases.len()
                );
                self.gate.acknowledge(self.clock.now());
                suite.pending_cases.clear();
            }
            Err(e) => {
                let line = format!(
                    "unable to send {action} for suite {:?} from {phase}: {e}",
                    suite.name
                );
                if let Err(io) = self.diagnostics.write_err(line) {
                    log::error!("unable to write diagnostics: {io}");
                }
            }
        }
    }
}

impl<T: Transport, C: Clock> Reporter for SuiteAggregator<T, C> {
    fn handle(&mut self, event: &LifecycleEvent) {
        self.apply(event)
    }
}
