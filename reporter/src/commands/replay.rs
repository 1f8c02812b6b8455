// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{value_parser, Arg, ArgAction, ArgMatches};

use crate::command::Command;
use crate::commands::{
    ADDR, ERROR_STATUS_CODE, EVENTS, FROM_ENV, INTERVAL_MS, JUNIT_DIR, REPLAY, SUCCESS_STATUS_CODE,
    SUITE_NAME, TIMEOUT_MS,
};
use crate::config::{ci_reporters, ReportConfig};
use crate::errors::{Error, Result};
use crate::events::{parse_events, validate_order, LifecycleEvent};
use crate::reporters::Reporter;
use crate::utils::reader::{ReadBuffer, Reader};
use crate::utils::writer::Writer;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Replay {}

#[allow(clippy::new_without_default)]
impl Replay {
    pub fn new() -> Self {
        Replay {}
    }
}

impl Command for Replay {
    fn name(&self) -> &'static str {
        REPLAY
    }

    fn command(&self) -> clap::Command {
        clap::Command::new(REPLAY)
            .about(
                r#"Replays a recorded stream of suite lifecycle events, one JSON object per line,
through the remote and JUnit reporters. Delivery problems are reported on stderr
and never change the exit code."#,
            )
            .arg(
                Arg::new(EVENTS.0)
                    .long(EVENTS.0)
                    .short(EVENTS.1)
                    .help("File of JSON-lines lifecycle events, reads stdin when absent")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new(ADDR.0)
                    .long(ADDR.0)
                    .short(ADDR.1)
                    .help("host:port of the collector receiving /report-suite requests")
                    .action(ArgAction::Set)
                    .conflicts_with(FROM_ENV.0),
            )
            .arg(
                Arg::new(JUNIT_DIR.0)
                    .long(JUNIT_DIR.0)
                    .short(JUNIT_DIR.1)
                    .help("Directory to write a JUnit XML report into")
                    .action(ArgAction::Set)
                    .conflicts_with(FROM_ENV.0),
            )
            .arg(
                Arg::new(SUITE_NAME.0)
                    .long(SUITE_NAME.0)
                    .short(SUITE_NAME.1)
                    .help("Suite name used when the events do not describe the suite")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new(FROM_ENV.0)
                    .long(FROM_ENV.0)
                    .short(FROM_ENV.1)
                    .help("Pick reporters from CI, ARTIFACTS, JUNIT_OUTPUT, PROW_JOB_ID and REMOTE_TEST_OUT_ADDR")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new(TIMEOUT_MS)
                    .long(TIMEOUT_MS)
                    .help("Request timeout for the collector in milliseconds")
                    .value_parser(value_parser!(u64).range(1..))
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new(INTERVAL_MS)
                    .long(INTERVAL_MS)
                    .help("Minimum milliseconds between update requests")
                    .value_parser(value_parser!(u64))
                    .action(ArgAction::Set),
            )
    }

    fn execute(&self, app: &ArgMatches, writer: &mut Writer, reader: &mut Reader) -> Result<i32> {
        let from_env = app.get_flag(FROM_ENV.0);
        let addr = app.get_one::<String>(ADDR.0).cloned();
        let junit_dir = app.get_one::<String>(JUNIT_DIR.0).map(PathBuf::from);
        if !from_env && addr.is_none() && junit_dir.is_none() {
            return Err(Error::IllegalArguments(format!(
                "one of --{}, --{} or --{} is required",
                ADDR.0, JUNIT_DIR.0, FROM_ENV.0
            )));
        }

        let mut content = String::new();
        match app.get_one::<String>(EVENTS.0) {
            Some(file) => Reader::new(ReadBuffer::File(File::open(file)?))
                .read_to_string(&mut content)?,
            None => reader.read_to_string(&mut content)?,
        };

        let events = match parse_events(&content).and_then(|events| {
            validate_order(&events)?;
            Ok(events)
        }) {
            Ok(events) => events,
            Err(e) => {
                writer.write_err(format!("Unable to replay events, Error = {e}"))?;
                return Ok(ERROR_STATUS_CODE);
            }
        };

        let mut config = if from_env {
            ReportConfig::from_env()
        } else {
            ReportConfig {
                on_ci: true,
                want_junit: junit_dir.is_some(),
                artifacts: junit_dir,
                remote_addr: addr,
                ..Default::default()
            }
        };
        if let Some(ms) = app.get_one::<u64>(TIMEOUT_MS) {
            config = config.with_request_timeout(Duration::from_millis(*ms));
        }
        if let Some(ms) = app.get_one::<u64>(INTERVAL_MS) {
            config = config.with_update_interval(Duration::from_millis(*ms));
        }

        let name = suite_name(&events, app.get_one::<String>(SUITE_NAME.0));
        let mut reporters = ci_reporters(&name, &config)?;
        if reporters.is_empty() {
            log::warn!("no reporters are configured for this environment");
        }

        for event in &events {
            reporters.handle(event);
        }

        let cases = events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::CaseCompleted(..)))
            .count();
        writeln!(
            writer,
            "Replayed {} events ({cases} cases) for suite {name:?} through {} reporters",
            events.len(),
            reporters.len()
        )?;

        Ok(SUCCESS_STATUS_CODE)
    }
}

fn suite_name(events: &[LifecycleEvent], fallback: Option<&String>) -> String {
    let described = events.iter().find_map(|e| match e {
        LifecycleEvent::SuiteStarted(sum) if !sum.suite_description.is_empty() => {
            Some(sum.suite_description.clone())
        }
        _ => None,
    });

    described
        .or_else(|| fallback.cloned())
        .unwrap_or_else(|| String::from("suite"))
}
