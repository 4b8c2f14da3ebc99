pub mod runner_tests {
    use crate::conformance::error::RunnerError;
    use crate::conformance::harness::{TestCase, Verdict};
    use crate::conformance::runner::*;
    use crate::conformance::socket_cases;
    use crate::interface::Errno;

    fn synthetic_cases() -> Vec<TestCase> {
        vec![
            TestCase::new("Suite.Passes", |_ctx| Ok(())),
            TestCase::new("Suite.Fails", |ctx| {
                ctx.expect_fails_with("call", Ok::<i32, i32>(3), Errno::ENXIO);
                Ok(())
            }),
            TestCase::new("Suite.Skips", |ctx| ctx.skip_if(true, "not here")),
            TestCase::new("Other.Passes", |_ctx| Ok(())),
        ]
    }

    fn names(cases: &[TestCase]) -> Vec<&str> {
        cases.iter().map(|c| c.name()).collect()
    }

    #[test]
    pub fn ut_runner_filter_matching() {
        let filter = CaseFilter::parse("SocketTest.*").unwrap();
        assert!(filter.matches("SocketTest.ProtocolUnix"));
        assert!(!filter.matches("OpenModes/SocketOpenTest.Unix/O_RDWR"));

        let filter = CaseFilter::parse("*Unix*-*O_RDWR").unwrap();
        assert!(filter.matches("SocketTest.ProtocolUnix"));
        assert!(filter.matches("OpenModes/SocketOpenTest.Unix/O_RDONLY"));
        assert!(!filter.matches("OpenModes/SocketOpenTest.Unix/O_RDWR"));

        let filter = CaseFilter::parse("-SocketTest.*:*IPv6*").unwrap();
        assert!(!filter.matches("SocketTest.ProtocolInet"));
        assert!(!filter.matches("TCPSocketTest/TCPSocketTest.RecvOnClosedSocket/IPv6_TCP_socket"));
        assert!(filter.matches("TCPSocketTest/TCPSocketTest.RecvOnClosedSocket/IPv4_TCP_socket"));

        let filter = CaseFilter::parse("A?C:exact").unwrap();
        assert!(filter.matches("ABC"));
        assert!(!filter.matches("ABBC"));
        assert!(filter.matches("exact"));
        assert!(!filter.matches("exactly"));

        let filter = CaseFilter::parse("*a*b*").unwrap();
        assert!(filter.matches("xxaxxbxx"));
        assert!(!filter.matches("xxbxxaxx"));
    }

    #[test]
    pub fn ut_runner_filter_rejects_whitespace() {
        match CaseFilter::parse("Socket Test.*") {
            Err(RunnerError::InvalidFilter { filter, .. }) => assert_eq!(filter, "Socket Test.*"),
            other => panic!("expected invalid filter, got {:?}", other),
        }
    }

    #[test]
    pub fn ut_runner_select_cases() {
        let filter = CaseFilter::parse("Suite.*-*Skips").unwrap();
        let selected = select_cases(synthetic_cases(), Some(&filter)).unwrap();
        assert_eq!(names(&selected), vec!["Suite.Passes", "Suite.Fails"]);

        let all = select_cases(synthetic_cases(), None).unwrap();
        assert_eq!(all.len(), 4);

        let filter = CaseFilter::parse("Nothing.*").unwrap();
        match select_cases(synthetic_cases(), Some(&filter)) {
            Err(RunnerError::NoCasesMatched(f)) => assert_eq!(f, "Nothing.*"),
            other => panic!("expected no match, got {:?}", other),
        }
    }

    #[test]
    pub fn ut_runner_select_suite_cases() {
        let filter = CaseFilter::parse("TCPSocketTest/*").unwrap();
        let selected = select_cases(socket_cases::all_cases(), Some(&filter)).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    pub fn ut_runner_summary() {
        let report = run_cases(&synthetic_cases(), &RunOptions::default()).unwrap();
        assert_eq!(
            report.summary,
            Summary {
                total: 4,
                passed: 2,
                failed: 1,
                skipped: 1
            }
        );
        assert!(!report.success());
        assert!(report.cases[1].verdict.is_fail());
    }

    #[test]
    pub fn ut_runner_skips_do_not_fail() {
        let cases = vec![
            TestCase::new("A.Passes", |_ctx| Ok(())),
            TestCase::new("A.Skips", |ctx| ctx.skip_if(true, "divergence")),
        ];
        let report = run_cases(&cases, &RunOptions::default()).unwrap();
        assert!(report.success());
        assert_eq!(report.summary.skipped, 1);
    }

    #[test]
    pub fn ut_runner_fail_fast() {
        let options = RunOptions {
            jobs: 1,
            fail_fast: true,
        };
        let report = run_cases(&synthetic_cases(), &options).unwrap();
        assert_eq!(report.cases.len(), 2);
        assert_eq!(report.cases[1].name, "Suite.Fails");
    }

    #[test]
    pub fn ut_runner_parallel_keeps_order() {
        let options = RunOptions {
            jobs: 3,
            fail_fast: false,
        };
        let cases = synthetic_cases();
        let report = run_cases(&cases, &options).unwrap();
        let reported: Vec<&str> = report.cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(reported, names(&cases));
        assert_eq!(report.summary.failed, 1);
    }

    #[test]
    pub fn ut_runner_zero_jobs() {
        let options = RunOptions {
            jobs: 0,
            fail_fast: false,
        };
        assert!(matches!(
            run_cases(&synthetic_cases(), &options),
            Err(RunnerError::InvalidJobs)
        ));
    }

    #[test]
    pub fn ut_runner_text_report() {
        let report = run_cases(&synthetic_cases(), &RunOptions::default()).unwrap();
        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[ RUN      ] Suite.Passes"));
        assert!(text.contains("[  SKIPPED ] Suite.Skips: not here"));
        assert!(text.contains("call: expected failure with ENXIO, succeeded returning 3"));
        assert!(text.contains("[  FAILED  ] 1 cases, listed below:"));
        assert!(text.contains("runner_tests.rs:"));
    }

    #[test]
    pub fn ut_runner_json_report() {
        let report = run_cases(&synthetic_cases(), &RunOptions::default()).unwrap();
        let mut out = Vec::new();
        report.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["cases"][0]["name"], "Suite.Passes");
        assert_eq!(value["cases"][0]["verdict"], "pass");
        assert_eq!(value["cases"][1]["verdict"], "fail");
        assert_eq!(
            value["cases"][1]["failures"][0]["message"],
            "call: expected failure with ENXIO, succeeded returning 3"
        );
        assert_eq!(value["cases"][2]["verdict"], "skip");
        assert_eq!(value["cases"][2]["reason"], "not here");
        assert!(value["platform"]["name"].is_string());
    }

    #[test]
    pub fn ut_runner_report_from_verdicts() {
        let report = RunReport::new(
            crate::interface::Platform::native(),
            vec![CaseReport {
                name: "X.Y".to_string(),
                verdict: Verdict::Skip {
                    reason: "r".to_string(),
                },
                duration_ms: 0,
            }],
        );
        assert!(report.success());
        assert_eq!(report.summary.total, 1);
    }
}
