// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod aggregator;
pub mod command;
pub mod commands;
pub mod config;
mod errors;
pub mod events;
pub mod harness;
pub mod reporters;
pub mod status;
pub mod throttle;
pub mod transport;
pub mod utils;

pub use crate::aggregator::SuiteAggregator;
pub use crate::config::{ci_reporters, ReportConfig};
pub use crate::errors::{Error, Result};
pub use crate::events::LifecycleEvent;
pub use crate::reporters::Reporter;
pub use crate::status::{Suite, SuiteAction, SuiteMessage};
