// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Wire types for the remote suite report.
//!
//! A [`SuiteMessage`] is POSTed to the collector for every lifecycle action.
//! Field names follow the collector's camelCase JSON schema and durations are
//! encoded as integer nanoseconds.

pub(crate) mod mapping;

use std::fmt::Display;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The kind of lifecycle action an envelope represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuiteAction {
    /// Sent at the beginning of a suite, before anything has run.
    #[serde(rename = "suite-start")]
    Start,
    /// Sent when new cases complete or a setup/teardown phase runs.
    #[serde(rename = "suite-update")]
    Update,
    /// Sent once the suite completes.
    #[serde(rename = "suite-end")]
    End,
}

impl SuiteAction {
    /// Boundary actions are never throttled.
    pub fn is_boundary(self) -> bool {
        matches!(self, SuiteAction::Start | SuiteAction::End)
    }
}

impl Display for SuiteAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SuiteAction::Start => "suite-start",
            SuiteAction::Update => "suite-update",
            SuiteAction::End => "suite-end",
        };

        f.write_str(text)
    }
}

/// The outcome of running a single case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Passed,
    Skipped,
    Failed,
    Panicked,
    TimedOut,
    Pending,
}

impl Outcome {
    /// Whether a case with this outcome carries a [`FailureDetail`].
    pub fn has_failure(self) -> bool {
        !matches!(self, Outcome::Passed | Outcome::Pending)
    }
}

/// One level of nesting in a case's path. Each variant names the harness
/// construct it corresponds to; `Container` is a describe/context grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Container,
    BeforeEach,
    JustBeforeEach,
    JustAfterEach,
    AfterEach,
    It,
    Unknown,
}

/// A source code location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stack: String,
}

/// One grouping level in the path to a case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub text: String,
    pub location: Location,
}

/// The component of a case in which a failure occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureComponent {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub location: Location,
    /// Position of the failing component in the case's component path.
    pub index: usize,
}

/// Describes why a case did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub message: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub panic: String,
    pub component: FailureComponent,
}

/// The result of a case, or of a suite-level setup or teardown phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResult {
    /// Uniquely identifies the path to this case (e.g. Describe, Describe, It).
    pub components: Vec<Component>,
    #[serde(rename = "state")]
    pub outcome: Outcome,
    #[serde(with = "nanos")]
    pub run_time: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureDetail>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
}

impl CaseResult {
    /// The component texts joined by single spaces, skipping empty ones.
    pub fn full_text(&self) -> String {
        self.components
            .iter()
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

/// Final tallies of the cases run, broken down by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteStats {
    pub total: usize,
    pub pending: usize,
    pub skipped: usize,
    pub passed: usize,
    pub failed: usize,
    pub flakes: usize,
}

/// An in-progress or complete suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suite {
    pub name: String,
    /// A unique, semi-random identifier for this suite.
    pub id: String,
    /// Time spent running the suite. Only meaningful on `suite-end`.
    #[serde(with = "nanos")]
    pub run_time: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_suite: Option<CaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_suite: Option<CaseResult>,
    /// Cases completed since the last acknowledged send. The collector appends
    /// these; once a send is accepted they are not sent again.
    #[serde(
        rename = "moreTestCases",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub pending_cases: Vec<CaseResult>,
    /// Only present once the suite has ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<SuiteStats>,
}

impl Suite {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Suite {
            name: name.into(),
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn has_ended(&self) -> bool {
        self.stats.is_some()
    }
}

/// The envelope POSTed to the collector.
#[derive(Debug, Serialize)]
pub struct SuiteMessage<'suite> {
    pub action: SuiteAction,
    pub suite: &'suite Suite,
}

pub(crate) mod nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(value.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_nanos(u64::deserialize(deserializer)?))
    }
}
