// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::time::Duration;

use crate::aggregator::SuiteAggregator;
use crate::errors::Result;
use crate::reporters::junit::JunitReporter;
use crate::reporters::Reporter;
use crate::throttle::DEFAULT_UPDATE_INTERVAL;
use crate::transport::DEFAULT_REQUEST_TIMEOUT;

pub const CI: &str = "CI";
pub const ARTIFACTS: &str = "ARTIFACTS";
pub const JUNIT_OUTPUT: &str = "JUNIT_OUTPUT";
pub const PROW_JOB_ID: &str = "PROW_JOB_ID";
pub const REMOTE_TEST_OUT_ADDR: &str = "REMOTE_TEST_OUT_ADDR";

/// Which reporters to install for a run and how they behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub on_ci: bool,
    /// Directory for JUnit output. Only used when `want_junit` is set.
    pub artifacts: Option<PathBuf>,
    pub want_junit: bool,
    /// `host:port` of the remote collector.
    pub remote_addr: Option<String>,
    pub update_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            on_ci: false,
            artifacts: None,
            want_junit: false,
            remote_addr: None,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Self {
        ReportConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let has = |key: &str| get(key).is_some();

        ReportConfig {
            on_ci: has(CI),
            artifacts: get(ARTIFACTS).map(PathBuf::from),
            // prow wants JUnit, but allow turning it on manually too
            want_junit: has(JUNIT_OUTPUT) || has(PROW_JOB_ID),
            remote_addr: get(REMOTE_TEST_OUT_ADDR),
            ..Default::default()
        }
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Reporters appropriate for the current environment. Off CI there are none.
/// On CI, JUnit output is written when an artifacts directory is known and
/// JUnit was asked for, and results are streamed remotely when a collector
/// address is set.
pub fn ci_reporters(suite_name: &str, config: &ReportConfig) -> Result<Vec<Box<dyn Reporter>>> {
    let mut reporters: Vec<Box<dyn Reporter>> = vec![];
    if !config.on_ci {
        return Ok(reporters);
    }

    if let (Some(dir), true) = (&config.artifacts, config.want_junit) {
        reporters.push(Box::new(JunitReporter::new(dir, suite_name)));
    }

    if let Some(addr) = &config.remote_addr {
        reporters.push(Box::new(SuiteAggregator::remote(
            addr,
            config.request_timeout,
            config.update_interval,
        )?));
    }

    Ok(reporters)
}
