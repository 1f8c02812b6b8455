// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod replay;

//
// Constants
//
// Application metadata
pub const APP_NAME: &str = "suite-reporter";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
// Commands
pub const REPLAY: &str = "replay";
// Arguments for replay
pub const EVENTS: (&str, char) = ("events", 'e');
pub const ADDR: (&str, char) = ("addr", 'a');
pub const JUNIT_DIR: (&str, char) = ("junit-dir", 'j');
pub const SUITE_NAME: (&str, char) = ("suite-name", 'n');
pub const FROM_ENV: (&str, char) = ("ci", 'c');
pub const TIMEOUT_MS: &str = "timeout-ms";
pub const INTERVAL_MS: &str = "interval-ms";
pub const VERBOSE: (&str, char) = ("verbose", 'v');

pub const SUCCESS_STATUS_CODE: i32 = 0;
pub const ERROR_STATUS_CODE: i32 = 5;
