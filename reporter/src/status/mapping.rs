// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use crate::harness::{
    CodeLocation, SetupSummary, SpecComponentType, SpecFailure, SpecState, SpecSummary,
    SuiteSummary,
};
use crate::status::{
    CaseResult, Component, ComponentKind, FailureComponent, FailureDetail, Location, Outcome,
    SuiteStats,
};

impl From<&CodeLocation> for Location {
    fn from(loc: &CodeLocation) -> Self {
        Location {
            file: loc.file_name.clone(),
            line: loc.line_number,
            stack: loc.full_stack_trace.clone(),
        }
    }
}

impl From<SpecState> for Outcome {
    /// # Panics
    ///
    /// An `invalid` state means the harness and the reporter disagree about the
    /// lifecycle; there is no outcome that could be reported honestly.
    fn from(state: SpecState) -> Self {
        match state {
            SpecState::Pending => Outcome::Pending,
            SpecState::Skipped => Outcome::Skipped,
            SpecState::Passed => Outcome::Passed,
            SpecState::Failed => Outcome::Failed,
            SpecState::Panicked => Outcome::Panicked,
            SpecState::TimedOut => Outcome::TimedOut,
            SpecState::Invalid => panic!("encountered spec with invalid state"),
        }
    }
}

impl From<SpecComponentType> for ComponentKind {
    fn from(typ: SpecComponentType) -> Self {
        match typ {
            SpecComponentType::Container => ComponentKind::Container,
            SpecComponentType::BeforeEach => ComponentKind::BeforeEach,
            SpecComponentType::JustBeforeEach => ComponentKind::JustBeforeEach,
            SpecComponentType::JustAfterEach => ComponentKind::JustAfterEach,
            SpecComponentType::AfterEach => ComponentKind::AfterEach,
            SpecComponentType::It => ComponentKind::It,
            SpecComponentType::BeforeSuite
            | SpecComponentType::AfterSuite
            | SpecComponentType::Measure
            | SpecComponentType::Invalid => ComponentKind::Unknown,
        }
    }
}

impl From<&SpecFailure> for FailureDetail {
    fn from(failure: &SpecFailure) -> Self {
        FailureDetail {
            message: failure.message.clone(),
            location: Location::from(&failure.location),
            panic: failure.forwarded_panic.clone(),
            component: FailureComponent {
                kind: ComponentKind::from(failure.component_type),
                location: Location::from(&failure.component_code_location),
                index: failure.component_index,
            },
        }
    }
}

/// Bundles component texts and code locations into the serializable form.
/// A text without a matching location gets an empty one.
pub(crate) fn summary_to_components(texts: &[String], locs: &[CodeLocation]) -> Vec<Component> {
    texts
        .iter()
        .enumerate()
        .map(|(idx, text)| Component {
            text: text.clone(),
            location: locs.get(idx).map(Location::from).unwrap_or_default(),
        })
        .collect()
}

fn with_state(
    components: Vec<Component>,
    run_time: Duration,
    output: &str,
    state: SpecState,
    failure: &SpecFailure,
) -> CaseResult {
    let outcome = Outcome::from(state);
    CaseResult {
        components,
        outcome,
        run_time,
        failure: outcome.has_failure().then(|| FailureDetail::from(failure)),
        output: output.to_string(),
    }
}

impl From<&SpecSummary> for CaseResult {
    fn from(sum: &SpecSummary) -> Self {
        with_state(
            summary_to_components(&sum.component_texts, &sum.component_code_locations),
            sum.run_time,
            &sum.captured_output,
            sum.state,
            &sum.failure,
        )
    }
}

impl From<&SetupSummary> for CaseResult {
    fn from(sum: &SetupSummary) -> Self {
        with_state(
            vec![Component {
                text: String::new(),
                location: Location::from(&sum.code_location),
            }],
            sum.run_time,
            &sum.captured_output,
            sum.state,
            &sum.failure,
        )
    }
}

/// The harness's own counts are authoritative. They cover specs this process
/// never saw, e.g. ones run on other parallel nodes.
impl From<&SuiteSummary> for SuiteStats {
    fn from(sum: &SuiteSummary) -> Self {
        SuiteStats {
            total: sum.number_of_total_specs,
            pending: sum.number_of_pending_specs,
            skipped: sum.number_of_skipped_specs,
            passed: sum.number_of_passed_specs,
            failed: sum.number_of_failed_specs,
            flakes: sum.number_of_flaked_specs,
        }
    }
}
