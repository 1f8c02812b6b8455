// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod utils;

#[cfg(test)]
mod remote_collector_tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use suite_reporter::harness::{SpecState, SpecSummary, SuiteSummary};
    use suite_reporter::utils::writer::Writer;
    use suite_reporter::SuiteAggregator;

    use crate::utils::Collector;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn case(texts: &[&str], state: SpecState) -> SpecSummary {
        SpecSummary {
            component_texts: texts.iter().map(|t| t.to_string()).collect(),
            state,
            run_time: Duration::from_millis(5),
            ..Default::default()
        }
    }

    #[test]
    fn created_and_accepted_are_acknowledged() {
        let collector = Collector::start(vec![201, 202]);
        let mut agg = SuiteAggregator::remote(&collector.addr(), TIMEOUT, Duration::from_secs(60))
            .unwrap()
            .with_diagnostics(Writer::in_memory());

        agg.on_suite_start("Widgets", "abc123");
        agg.on_case_complete(&case(&["Widgets", "spins"], SpecState::Passed));
        agg.on_suite_end(&SuiteSummary {
            suite_description: "Widgets".to_string(),
            suite_id: "abc123".to_string(),
            number_of_total_specs: 1,
            number_of_passed_specs: 1,
            run_time: Duration::from_millis(7),
            ..Default::default()
        });

        assert!(agg.has_ended());
        assert_eq!(agg.suite().map(|s| s.pending_cases.len()), Some(0));
        assert_eq!(agg.into_diagnostics().err_to_stripped().unwrap(), "");

        let received = collector.finish();
        assert_eq!(
            received[0].body,
            json!({"action": "suite-start", "suite": {"name": "Widgets", "id": "abc123", "runTime": 0}})
        );
        assert_eq!(
            received[1].body,
            json!({
                "action": "suite-end",
                "suite": {
                    "name": "Widgets",
                    "id": "abc123",
                    "runTime": 7_000_000,
                    "moreTestCases": [{
                        "components": [
                            {"text": "Widgets", "location": {"file": "", "line": 0}},
                            {"text": "spins", "location": {"file": "", "line": 0}}
                        ],
                        "state": "passed",
                        "runTime": 5_000_000
                    }],
                    "stats": {"total": 1, "pending": 0, "skipped": 0, "passed": 1, "failed": 0, "flakes": 0}
                }
            })
        );
    }

    #[test]
    fn unreachable_collector_leaves_one_diagnostic_per_attempt() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let mut agg = SuiteAggregator::remote(&addr, TIMEOUT, Duration::from_secs(60))
            .unwrap()
            .with_diagnostics(Writer::in_memory());

        agg.on_suite_start("Widgets", "abc123");
        agg.on_case_complete(&case(&["Widgets", "spins"], SpecState::Failed));

        assert_eq!(agg.suite().map(|s| s.pending_cases.len()), Some(1));

        let diagnostics = agg.into_diagnostics().err_to_stripped().unwrap();
        let lines = diagnostics.lines().collect::<Vec<&str>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0]
            .starts_with("unable to send suite-start for suite \"Widgets\" from Suite (start): "));
        assert!(lines[1].starts_with("unable to send suite-update for suite \"Widgets\" from Spec: "));
    }
}
