// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::harness::{SetupSummary, SpecSummary, SuiteSummary};

/// Every lifecycle hook a harness reports, in the order it reports them:
/// one start, at most one setup, any number of cases, at most one teardown,
/// and one end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "summary", rename_all = "kebab-case")]
pub enum LifecycleEvent {
    SuiteStarted(SuiteSummary),
    SetupCompleted(SetupSummary),
    CaseCompleted(SpecSummary),
    TeardownCompleted(SetupSummary),
    SuiteEnded(SuiteSummary),
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::SuiteStarted(..) => "suite-started",
            LifecycleEvent::SetupCompleted(..) => "setup-completed",
            LifecycleEvent::CaseCompleted(..) => "case-completed",
            LifecycleEvent::TeardownCompleted(..) => "teardown-completed",
            LifecycleEvent::SuiteEnded(..) => "suite-ended",
        }
    }
}

/// Parses one event per non-blank line.
pub fn parse_events(content: &str) -> Result<Vec<LifecycleEvent>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<LifecycleEvent>(line).map_err(|e| {
                Error::ParseError(format!("event on line {}: {}", idx + 1, e))
            })
        })
        .collect()
}

/// Checks that `events` form exactly one well-ordered suite run, so that
/// replaying them never trips the aggregator's lifecycle assertions.
pub fn validate_order(events: &[LifecycleEvent]) -> Result<()> {
    enum Stage {
        Before,
        Started,
        SetupDone,
        TeardownDone,
        Ended,
    }

    let mut stage = Stage::Before;
    for (idx, event) in events.iter().enumerate() {
        let position = idx + 1;
        let out_of_order = |reason: &str| {
            Err(Error::OrderError(format!(
                "{} at position {position} {reason}",
                event.name()
            )))
        };

        stage = match (event, &stage) {
            (_, Stage::Ended) => return out_of_order("follows the end of the suite"),
            (LifecycleEvent::SuiteStarted(..), Stage::Before) => Stage::Started,
            (LifecycleEvent::SuiteStarted(..), _) => {
                return out_of_order("repeats the start of the suite")
            }
            (_, Stage::Before) => return out_of_order("precedes the start of the suite"),
            (LifecycleEvent::SetupCompleted(..), Stage::Started) => Stage::SetupDone,
            (LifecycleEvent::SetupCompleted(..), _) => {
                return out_of_order("arrives after setup, cases or teardown already ran")
            }
            (LifecycleEvent::CaseCompleted(..), Stage::TeardownDone) => {
                return out_of_order("arrives after teardown")
            }
            (LifecycleEvent::CaseCompleted(..), _) => {
                // setup may no longer follow once a case has completed
                Stage::SetupDone
            }
            (LifecycleEvent::TeardownCompleted(..), Stage::TeardownDone) => {
                return out_of_order("repeats the teardown")
            }
            (LifecycleEvent::TeardownCompleted(..), _) => Stage::TeardownDone,
            (LifecycleEvent::SuiteEnded(..), _) => Stage::Ended,
        };
    }

    match stage {
        Stage::Ended => Ok(()),
        Stage::Before => Err(Error::OrderError("no events to replay".to_string())),
        _ => Err(Error::OrderError(
            "the suite never ended, expected a trailing suite-ended event".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::SpecState;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn start() -> LifecycleEvent {
        LifecycleEvent::SuiteStarted(SuiteSummary::default())
    }
    fn setup() -> LifecycleEvent {
        LifecycleEvent::SetupCompleted(SetupSummary::default())
    }
    fn case() -> LifecycleEvent {
        LifecycleEvent::CaseCompleted(SpecSummary::default())
    }
    fn teardown() -> LifecycleEvent {
        LifecycleEvent::TeardownCompleted(SetupSummary::default())
    }
    fn end() -> LifecycleEvent {
        LifecycleEvent::SuiteEnded(SuiteSummary::default())
    }

    #[rstest]
    #[case(vec![start(), end()])]
    #[case(vec![start(), setup(), end()])]
    #[case(vec![start(), case(), case(), end()])]
    #[case(vec![start(), setup(), case(), teardown(), end()])]
    #[case(vec![start(), teardown(), end()])]
    fn accepts_well_ordered_runs(#[case] events: Vec<LifecycleEvent>) {
        assert!(validate_order(&events).is_ok());
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![case(), end()])]
    #[case(vec![start(), start(), end()])]
    #[case(vec![start(), case(), setup(), end()])]
    #[case(vec![start(), setup(), setup(), end()])]
    #[case(vec![start(), teardown(), case(), end()])]
    #[case(vec![start(), teardown(), teardown(), end()])]
    #[case(vec![start(), case()])]
    #[case(vec![start(), end(), end()])]
    fn rejects_out_of_order_runs(#[case] events: Vec<LifecycleEvent>) {
        match validate_order(&events) {
            Err(Error::OrderError(..)) => {}
            other => panic!("expected an order error, got {other:?}"),
        }
    }

    #[test]
    fn parses_json_lines() {
        let content = indoc! {r#"
            {"event": "suite-started", "summary": {"suite_description": "Widgets", "suite_id": "abc123"}}

            {"event": "case-completed", "summary": {"component_texts": ["creates a widget"], "state": "passed", "run_time": 10000000}}
            {"event": "suite-ended", "summary": {"number_of_total_specs": 1, "run_time": 20000000}}
        "#};

        let events = parse_events(content).unwrap();
        assert_eq!(events.len(), 3);
        match &events[0] {
            LifecycleEvent::SuiteStarted(sum) => {
                assert_eq!(sum.suite_description, "Widgets");
                assert_eq!(sum.suite_id, "abc123");
            }
            other => panic!("unexpected {other:?}"),
        }
        match &events[1] {
            LifecycleEvent::CaseCompleted(sum) => {
                assert_eq!(sum.state, SpecState::Passed);
                assert_eq!(sum.run_time.as_millis(), 10);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_error_names_the_line() {
        let content = "{\"event\": \"suite-started\", \"summary\": {}}\n{\"event\": \"bogus\"}\n";
        match parse_events(content) {
            Err(Error::ParseError(msg)) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
