// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use heck::SnakeCase;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::errors::Result;
use crate::events::LifecycleEvent;
use crate::reporters::Reporter;
use crate::status::{CaseResult, Outcome};

const SETUP_CASE_NAME: &str = "[BeforeSuite]";
const TEARDOWN_CASE_NAME: &str = "[AfterSuite]";

/// Collects every result of a suite and writes a JUnit XML file into `dir`
/// once the suite ends.
pub struct JunitReporter {
    dir: PathBuf,
    name: String,
    setup: Option<CaseResult>,
    teardown: Option<CaseResult>,
    cases: Vec<CaseResult>,
    diagnostics: crate::utils::writer::Writer,
    written: Option<PathBuf>,
}

impl JunitReporter {
    /// `name` is used when the harness does not describe the suite itself.
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        JunitReporter {
            dir: dir.into(),
            name: name.into(),
            setup: None,
            teardown: None,
            cases: vec![],
            diagnostics: crate::utils::writer::Writer::default(),
            written: None,
        }
    }

    pub fn with_diagnostics(mut self, writer: crate::utils::writer::Writer) -> Self {
        self.diagnostics = writer;
        self
    }

    pub fn into_diagnostics(self) -> crate::utils::writer::Writer {
        self.diagnostics
    }

    /// Where the report went, once the suite has ended and it was written.
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    pub fn report_path(&self) -> PathBuf {
        let stem = match self.name.to_snake_case() {
            slug if slug.is_empty() => String::from("suite"),
            slug => slug,
        };
        self.dir.join(format!("junit_{stem}.xml"))
    }

    fn write_report(&self, run_time: Duration) -> Result<PathBuf> {
        let path = self.report_path();
        let mut file = BufWriter::new(File::create(&path)?);
        JunitReport::new(
            &self.name,
            self.setup.as_ref(),
            &self.cases,
            self.teardown.as_ref(),
            run_time,
        )
        .serialize(&mut file)?;

        Ok(path)
    }
}

impl Reporter for JunitReporter {
    fn handle(&mut self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::SuiteStarted(sum) => {
                if !sum.suite_description.is_empty() {
                    self.name = sum.suite_description.clone();
                }
            }
            LifecycleEvent::SetupCompleted(sum) => self.setup = Some(CaseResult::from(sum)),
            LifecycleEvent::CaseCompleted(sum) => self.cases.push(CaseResult::from(sum)),
            LifecycleEvent::TeardownCompleted(sum) => self.teardown = Some(CaseResult::from(sum)),
            LifecycleEvent::SuiteEnded(sum) => match self.write_report(sum.run_time) {
                Ok(path) => {
                    log::debug!("wrote JUnit report {}", path.display());
                    self.written = Some(path);
                }
                Err(e) => {
                    let line = format!(
                        "unable to write JUnit report for suite {:?} to {}: {e}",
                        self.name,
                        self.report_path().display()
                    );
                    if let Err(io) = self.diagnostics.write_err(line) {
                        log::error!("unable to write diagnostics: {io}");
                    }
                }
            },
        }
    }
}

pub struct JunitReport<'report> {
    pub name: &'report str,
    pub test_cases: Vec<TestCase<'report>>,
    pub tests: usize,
    pub failures: usize,
    pub errors: usize,
    pub skipped: usize,
    pub duration: Duration,
}

pub struct TestCase<'test> {
    pub name: String,
    pub classname: &'test str,
    pub result: &'test CaseResult,
}

impl<'report> JunitReport<'report> {
    pub fn new(
        name: &'report str,
        setup: Option<&'report CaseResult>,
        cases: &'report [CaseResult],
        teardown: Option<&'report CaseResult>,
        duration: Duration,
    ) -> Self {
        let named = setup
            .map(|r| (SETUP_CASE_NAME.to_string(), r))
            .into_iter()
            .chain(cases.iter().map(|r| (r.full_text(), r)))
            .chain(teardown.map(|r| (TEARDOWN_CASE_NAME.to_string(), r)));

        let mut report = JunitReport {
            name,
            test_cases: vec![],
            tests: 0,
            failures: 0,
            errors: 0,
            skipped: 0,
            duration,
        };

        for (case_name, result) in named {
            report.tests += 1;
            match result.outcome {
                Outcome::Failed | Outcome::TimedOut => report.failures += 1,
                Outcome::Panicked => report.errors += 1,
                Outcome::Skipped | Outcome::Pending => report.skipped += 1,
                Outcome::Passed => {}
            }
            report.test_cases.push(TestCase {
                name: case_name,
                classname: name,
                result,
            });
        }

        report
    }

    pub fn serialize(&self, writer: impl std::io::Write) -> Result<()> {
        let mut writer = Writer::new_with_indent(writer, b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        EventType::TestSuites(self).serialize(&mut writer)
    }
}

fn seconds(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

enum EventType<'report> {
    TestSuites(&'report JunitReport<'report>),
    TestSuite(&'report JunitReport<'report>),
    TestCase(&'report TestCase<'report>),
    Failure(&'report CaseResult),
    Error(&'report CaseResult),
    Skipped,
}

impl<'report> EventType<'report> {
    fn start_tag(&self) -> BytesStart<'static> {
        let mut tag = BytesStart::new(self.to_string());
        self.extend_attributes(&mut tag);
        tag
    }

    fn extend_attributes(&self, tag: &mut BytesStart<'_>) {
        match self {
            EventType::TestSuites(report) => {
                tag.extend_attributes([
                    ("name", report.name),
                    ("tests", report.tests.to_string().as_str()),
                    ("failures", report.failures.to_string().as_str()),
                    ("errors", report.errors.to_string().as_str()),
                    ("time", seconds(report.duration).as_str()),
                ]);
            }
            EventType::TestSuite(report) => {
                tag.extend_attributes([
                    ("name", report.name),
                    ("tests", report.tests.to_string().as_str()),
                    ("failures", report.failures.to_string().as_str()),
                    ("errors", report.errors.to_string().as_str()),
                    ("skipped", report.skipped.to_string().as_str()),
                    ("time", seconds(report.duration).as_str()),
                ]);
            }
            EventType::TestCase(test_case) => {
                tag.extend_attributes([
                    ("name", test_case.name.as_str()),
                    ("classname", test_case.classname),
                    ("time", seconds(test_case.result.run_time).as_str()),
                ]);
            }
            EventType::Failure(result) | EventType::Error(result) => {
                let message = result
                    .failure
                    .as_ref()
                    .map(|f| f.message.as_str())
                    .unwrap_or_default();
                let kind = match result.outcome {
                    Outcome::TimedOut => "TimedOut",
                    Outcome::Panicked => "Panicked",
                    _ => "Failure",
                };
                tag.extend_attributes([("message", message), ("type", kind)]);
            }
            EventType::Skipped => {}
        }
    }

    fn body(result: &CaseResult) -> String {
        let mut body = String::new();
        if let Some(failure) = &result.failure {
            body.push_str(&format!(
                "{}:{}\n{}",
                failure.location.file, failure.location.line, failure.message
            ));
            if !failure.panic.is_empty() {
                body.push_str(&format!("\n\n{}", failure.panic));
            }
        }
        body
    }

    fn serialize(&self, writer: &mut Writer<impl std::io::Write>) -> Result<()> {
        let tag = self.start_tag();
        match *self {
            EventType::TestSuites(report) => {
                writer.write_event(Event::Start(tag))?;
                EventType::TestSuite(report).serialize(writer)?;
                writer.write_event(Event::End(BytesEnd::new(self.to_string())))?;
                writer.write_event(Event::Eof)?;
            }
            EventType::TestSuite(report) => {
                writer.write_event(Event::Start(tag))?;
                for test_case in &report.test_cases {
                    EventType::TestCase(test_case).serialize(writer)?;
                }
                writer.write_event(Event::End(BytesEnd::new(self.to_string())))?;
            }
            EventType::TestCase(test_case) => {
                let child = match test_case.result.outcome {
                    Outcome::Passed => None,
                    Outcome::Failed | Outcome::TimedOut => {
                        Some(EventType::Failure(test_case.result))
                    }
                    Outcome::Panicked => Some(EventType::Error(test_case.result)),
                    Outcome::Skipped | Outcome::Pending => Some(EventType::Skipped),
                };
                match child {
                    None => writer.write_event(Event::Empty(tag))?,
                    Some(child) => {
                        writer.write_event(Event::Start(tag))?;
                        child.serialize(writer)?;
                        writer.write_event(Event::End(BytesEnd::new(self.to_string())))?;
                    }
                }
            }
            EventType::Failure(result) | EventType::Error(result) => {
                writer.write_event(Event::Start(tag))?;
                writer.write_event(Event::Text(BytesText::new(&Self::body(result))))?;
                writer.write_event(Event::End(BytesEnd::new(self.to_string())))?;
            }
            EventType::Skipped => writer.write_event(Event::Empty(tag))?,
        }

        Ok(())
    }
}

impl Display for EventType<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            EventType::TestSuites(..) => "testsuites",
            EventType::TestSuite(..) => "testsuite",
            EventType::TestCase(..) => "testcase",
            EventType::Failure(..) => "failure",
            EventType::Error(..) => "error",
            EventType::Skipped => "skipped",
        };

        f.write_str(text)
    }
}
