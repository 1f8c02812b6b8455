// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The test harness's own vocabulary.
//!
//! These are the summaries a BDD-style harness hands to its reporters. They are
//! richer than the wire model (more component types, an `invalid` state) and are
//! converted by the mapping in [`crate::status`] before anything is sent.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecState {
    #[default]
    Invalid,
    Pending,
    Skipped,
    Passed,
    Failed,
    Panicked,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecComponentType {
    #[default]
    Invalid,
    Container,
    BeforeSuite,
    AfterSuite,
    BeforeEach,
    JustBeforeEach,
    JustAfterEach,
    AfterEach,
    It,
    Measure,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeLocation {
    pub file_name: String,
    pub line_number: usize,
    pub full_stack_trace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecFailure {
    pub message: String,
    pub location: CodeLocation,
    pub forwarded_panic: String,
    pub component_index: usize,
    pub component_type: SpecComponentType,
    pub component_code_location: CodeLocation,
}

/// Summary of one completed spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecSummary {
    pub component_texts: Vec<String>,
    pub component_code_locations: Vec<CodeLocation>,
    pub state: SpecState,
    #[serde(with = "crate::status::nanos")]
    pub run_time: Duration,
    pub failure: SpecFailure,
    pub captured_output: String,
}

/// Summary of a suite-level setup or teardown phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupSummary {
    pub component_type: SpecComponentType,
    pub code_location: CodeLocation,
    pub state: SpecState,
    #[serde(with = "crate::status::nanos")]
    pub run_time: Duration,
    pub failure: SpecFailure,
    pub captured_output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteSummary {
    pub suite_description: String,
    pub suite_succeeded: bool,
    pub suite_id: String,
    pub number_of_specs_before_parallelization: usize,
    pub number_of_total_specs: usize,
    pub number_of_specs_that_will_be_run: usize,
    pub number_of_pending_specs: usize,
    pub number_of_skipped_specs: usize,
    pub number_of_passed_specs: usize,
    pub number_of_failed_specs: usize,
    pub number_of_flaked_specs: usize,
    #[serde(with = "crate::status::nanos")]
    pub run_time: Duration,
}
