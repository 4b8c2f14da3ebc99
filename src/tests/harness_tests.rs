pub mod harness_tests {
    use super::super::*;
    use crate::conformance::harness::*;
    use crate::conformance::kinds;
    use crate::interface::Errno;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    pub fn ut_harness_sanitize_name() {
        assert_eq!(sanitize_name("IPv4 TCP socket"), "IPv4_TCP_socket");
        assert_eq!(
            sanitize_name("non-blocking close-on-exec IPv6 TCP socket"),
            "non_blocking_close_on_exec_IPv6_TCP_socket"
        );
        assert_eq!(sanitize_name("a.b/c:d"), "a_b_c_d");
        // one underscore per byte of a multi-byte character
        assert_eq!(sanitize_name("über"), "__ber");
        assert_eq!(sanitize_name("IPv4→IPv6"), "IPv4___IPv6");
        assert!(sanitize_name("UDS seqpacket socket")
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    pub fn ut_harness_kind_descriptions() {
        assert_eq!(kinds::ipv4_tcp_unbound_socket(0).description, "IPv4 TCP socket");
        assert_eq!(
            kinds::ipv6_tcp_unbound_socket(SOCK_NONBLOCK).description,
            "non-blocking IPv6 TCP socket"
        );
        assert_eq!(
            kinds::ipv4_tcp_unbound_socket(SOCK_NONBLOCK | SOCK_CLOEXEC).description,
            "non-blocking close-on-exec IPv4 TCP socket"
        );
        assert_eq!(kinds::unix_domain_socket(SOCK_DGRAM).description, "UDS datagram socket");
    }

    #[test]
    pub fn ut_harness_kind_creates_independent_descriptors() {
        let kind = kinds::unix_domain_socket(SOCK_STREAM);
        let first = kind.create().unwrap();
        let second = kind.create().unwrap();
        assert!(first.get() >= 0);
        assert_ne!(first.get(), second.get());
    }

    #[test]
    pub fn ut_harness_instantiate_names() {
        let cases = instantiate(
            "Prefix",
            "Suite",
            "Case",
            vec!["first param", "second-param"],
            |_, p: &&str| p.to_string(),
            |_ctx, _p| Ok(()),
        );
        let names: Vec<&str> = cases.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["Prefix/Suite.Case/first_param", "Prefix/Suite.Case/second_param"]
        );

        let indexed = instantiate("P", "S", "C", vec![10, 20, 30], index_name, |_ctx, _p| Ok(()));
        let names: Vec<&str> = indexed.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["P/S.C/0", "P/S.C/1", "P/S.C/2"]);
    }

    #[test]
    pub fn ut_harness_instantiate_passes_param() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let cases = instantiate(
            "P",
            "S",
            "C",
            vec![3, 5],
            index_name,
            move |_ctx, p: &i32| {
                sink.lock().push(*p);
                Ok(())
            },
        );
        for case in &cases {
            assert_eq!(case.run(), Verdict::Pass);
        }
        assert_eq!(*seen.lock(), vec![3, 5]);
    }

    #[test]
    pub fn ut_harness_expectation_continues() {
        let reached_end = Arc::new(AtomicBool::new(false));
        let flag = reached_end.clone();
        let case = TestCase::new("expect", move |ctx| {
            ctx.expect_fails_with("first", Ok::<i32, i32>(0), Errno::ENOTCONN);
            ctx.expect_fails_with("second", Err::<i32, i32>(Errno::EBADF as i32), Errno::ENOTCONN);
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });
        match case.run() {
            Verdict::Fail { failures } => {
                assert_eq!(failures.len(), 2);
                assert_eq!(
                    failures[0].message,
                    "first: expected failure with ENOTCONN, succeeded returning 0"
                );
                assert!(failures[1]
                    .message
                    .starts_with("second: expected failure with ENOTCONN, returned -1 with errno EBADF ("));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(reached_end.load(Ordering::SeqCst));
    }

    #[test]
    pub fn ut_harness_precondition_aborts() {
        let reached_end = Arc::new(AtomicBool::new(false));
        let flag = reached_end.clone();
        let case = TestCase::new("assert", move |ctx| {
            ctx.assert_succeeds("setup", Err::<i32, i32>(Errno::EMFILE as i32))?;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });
        let verdict = case.run();
        assert!(verdict.is_fail());
        assert!(!reached_end.load(Ordering::SeqCst));
    }

    #[test]
    pub fn ut_harness_matching_errno_passes() {
        let case = TestCase::new("match", |ctx| {
            ctx.assert_fails_with("call", Err::<i32, i32>(Errno::ENXIO as i32), Errno::ENXIO)?;
            ctx.expect_fails_with("call", Err::<(), i32>(Errno::ENOTCONN as i32), Errno::ENOTCONN);
            let value = ctx.assert_succeeds("ok", Ok::<i32, i32>(7))?;
            ctx.expect_true(value == 7, "the returned value");
            Ok(())
        });
        assert_eq!(case.run(), Verdict::Pass);
    }

    #[test]
    pub fn ut_harness_failure_location() {
        let mut ctx = CaseContext::new("location");
        let line = line!() + 1;
        ctx.expect_true(false, "a true condition");
        let failure = &ctx.failures()[0];
        assert!(failure.file.ends_with("harness_tests.rs"), "{}", failure.file);
        assert_eq!(failure.line, line);
        assert_eq!(failure.message, "expected a true condition");
    }

    #[test]
    pub fn ut_harness_skip_verdict() {
        let case = TestCase::new("skip", |ctx| {
            ctx.skip_if(false, "not taken")?;
            ctx.skip_if(true, "known divergence")?;
            ctx.expect_true(false, "never reached");
            Ok(())
        });
        assert_eq!(
            case.run(),
            Verdict::Skip {
                reason: "known divergence".to_string()
            }
        );
    }

    #[test]
    pub fn ut_harness_abort_without_failure() {
        let case = TestCase::new("bare abort", |_ctx| Err(CaseAbort::Failed));
        match case.run() {
            Verdict::Fail { failures } => assert_eq!(failures.len(), 1),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    pub fn ut_harness_releases_on_precondition_failure() {
        let (probe, held) = nonblocking_pair();
        let slot = Mutex::new(Some(held));
        let case = TestCase::new("release", move |ctx| {
            let _fd = slot.lock().take();
            ctx.assert_succeeds("setup", Err::<(), i32>(Errno::EACCES as i32))?;
            Ok(())
        });
        assert!(!peer_closed(&probe));
        assert!(case.run().is_fail());
        assert!(peer_closed(&probe));
    }

    #[test]
    pub fn ut_harness_releases_on_panic() {
        let (probe, held) = nonblocking_pair();
        let slot = Mutex::new(Some(held));
        let case = TestCase::new("panic", move |_ctx| {
            let _fd = slot.lock().take();
            panic!("case body blew up");
        });
        match case.run() {
            Verdict::Fail { failures } => {
                assert_eq!(failures[0].message, "panicked: case body blew up");
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(peer_closed(&probe));
    }
}
