//! Case harness: assertions, verdicts, and named, parameterized cases.
//!
//! A case body receives a [`CaseContext`] and returns a [`CaseResult`]. Two
//! levels of assertion are available:
//!
//! - `assert_*` are preconditions. On failure they record the problem and
//!   return `Err(CaseAbort::Failed)`, so `?` ends the case right there.
//! - `expect_*` are expectations. They record the problem and let the case
//!   carry on, which is what paired checks on the same descriptor want.
//!
//! Descriptors held by the body are owned values, so an early return or a
//! panic closes them on the way out.

use serde::Serialize;
use std::any::Any;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe, Location};

use crate::interface;

pub type CaseResult = Result<(), CaseAbort>;

/// Why a case body stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseAbort {
    /// A precondition failed; the failure is already recorded.
    Failed,
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub file: String,
    pub line: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail { failures: Vec<Failure> },
    Skip { reason: String },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Verdict::Fail { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Verdict::Skip { .. })
    }
}

pub struct CaseContext {
    name: String,
    failures: Vec<Failure>,
}

impl CaseContext {
    pub fn new(name: &str) -> CaseContext {
        CaseContext {
            name: name.to_string(),
            failures: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    #[track_caller]
    pub fn record_failure(&mut self, message: String) {
        let location = Location::caller();
        tracing::error!(
            case = %self.name,
            file = location.file(),
            line = location.line(),
            "{}",
            message
        );
        self.failures.push(Failure {
            file: location.file().to_string(),
            line: location.line(),
            message,
        });
    }

    /// Precondition: the call must succeed. Hands back its value.
    #[track_caller]
    pub fn assert_succeeds<T>(&mut self, call: &str, result: Result<T, i32>) -> Result<T, CaseAbort> {
        match result {
            Ok(value) => {
                tracing::debug!(case = %self.name, call, "succeeded as required");
                Ok(value)
            }
            Err(errno) => {
                self.record_failure(format!(
                    "{}: expected success, returned -1 with errno {}",
                    call,
                    interface::describe_errno(errno)
                ));
                Err(CaseAbort::Failed)
            }
        }
    }

    /// Expectation: the call should succeed. `None` when it did not.
    #[track_caller]
    pub fn expect_succeeds<T>(&mut self, call: &str, result: Result<T, i32>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errno) => {
                self.record_failure(format!(
                    "{}: expected success, returned -1 with errno {}",
                    call,
                    interface::describe_errno(errno)
                ));
                None
            }
        }
    }

    /// Precondition: the call must fail with exactly `expected`.
    #[track_caller]
    pub fn assert_fails_with<T: Debug>(
        &mut self,
        call: &str,
        result: Result<T, i32>,
        expected: interface::Errno,
    ) -> CaseResult {
        if self.check_fails_with(call, result, expected) {
            Ok(())
        } else {
            Err(CaseAbort::Failed)
        }
    }

    /// Expectation: the call should fail with exactly `expected`.
    #[track_caller]
    pub fn expect_fails_with<T: Debug>(
        &mut self,
        call: &str,
        result: Result<T, i32>,
        expected: interface::Errno,
    ) -> bool {
        self.check_fails_with(call, result, expected)
    }

    #[track_caller]
    fn check_fails_with<T: Debug>(
        &mut self,
        call: &str,
        result: Result<T, i32>,
        expected: interface::Errno,
    ) -> bool {
        match result {
            Err(errno) if errno == expected as i32 => {
                tracing::debug!(case = %self.name, call, errno = expected.name(), "failed as expected");
                true
            }
            Err(errno) => {
                self.record_failure(format!(
                    "{}: expected failure with {}, returned -1 with errno {}",
                    call,
                    expected.name(),
                    interface::describe_errno(errno)
                ));
                false
            }
            Ok(value) => {
                self.record_failure(format!(
                    "{}: expected failure with {}, succeeded returning {:?}",
                    call,
                    expected.name(),
                    value
                ));
                false
            }
        }
    }

    #[track_caller]
    pub fn assert_true(&mut self, condition: bool, what: &str) -> CaseResult {
        if condition {
            Ok(())
        } else {
            self.record_failure(format!("expected {}", what));
            Err(CaseAbort::Failed)
        }
    }

    #[track_caller]
    pub fn expect_true(&mut self, condition: bool, what: &str) -> bool {
        if !condition {
            self.record_failure(format!("expected {}", what));
        }
        condition
    }

    pub fn skip_if(&self, condition: bool, reason: &str) -> CaseResult {
        if condition {
            Err(CaseAbort::Skipped(reason.to_string()))
        } else {
            Ok(())
        }
    }

    /// Recorded expectation failures turn an otherwise clean run into a Fail.
    pub fn finish(self, outcome: CaseResult) -> Verdict {
        match outcome {
            Err(CaseAbort::Skipped(reason)) => Verdict::Skip { reason },
            Ok(()) if self.failures.is_empty() => Verdict::Pass,
            Ok(()) | Err(CaseAbort::Failed) => {
                let mut failures = self.failures;
                if failures.is_empty() {
                    // a body returned Failed without recording anything
                    failures.push(Failure {
                        file: String::new(),
                        line: 0,
                        message: "case aborted without a recorded failure".to_string(),
                    });
                }
                Verdict::Fail { failures }
            }
        }
    }
}

type CaseBody = Box<dyn Fn(&mut CaseContext) -> CaseResult + Send + Sync>;

/// A named, runnable case.
pub struct TestCase {
    name: String,
    body: CaseBody,
}

impl TestCase {
    pub fn new<F>(name: impl Into<String>, body: F) -> TestCase
    where
        F: Fn(&mut CaseContext) -> CaseResult + Send + Sync + 'static,
    {
        TestCase {
            name: name.into(),
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the body once. A panic is caught and reported as a failure after
    /// the body's owned descriptors have been dropped by unwinding.
    pub fn run(&self) -> Verdict {
        let mut ctx = CaseContext::new(&self.name);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.body)(&mut ctx)));
        match outcome {
            Ok(result) => ctx.finish(result),
            Err(payload) => {
                let message = format!("panicked: {}", panic_message(payload.as_ref()));
                ctx.failures.push(Failure {
                    file: String::new(),
                    line: 0,
                    message,
                });
                ctx.finish(Err(CaseAbort::Failed))
            }
        }
    }
}

impl Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Replaces every byte that is not an ASCII letter or digit with `_`, so
/// parameter descriptions make stable case identifiers. A multi-byte
/// character becomes one `_` per byte.
pub fn sanitize_name(description: &str) -> String {
    description
        .bytes()
        .map(|b| if b.is_ascii_alphanumeric() { b as char } else { '_' })
        .collect()
}

/// Name of a plain case: `Suite.Case`.
pub fn case_name(suite: &str, case: &str) -> String {
    format!("{}.{}", suite, case)
}

/// One case per parameter, named `prefix/Suite.Case/<param name>`. The
/// parameter name comes from `namer` and is sanitized.
pub fn instantiate<P, N, F>(
    prefix: &str,
    suite: &str,
    case: &str,
    params: Vec<P>,
    namer: N,
    body: F,
) -> Vec<TestCase>
where
    P: Send + Sync + 'static,
    N: Fn(usize, &P) -> String,
    F: Fn(&mut CaseContext, &P) -> CaseResult + Clone + Send + Sync + 'static,
{
    params
        .into_iter()
        .enumerate()
        .map(|(idx, param)| {
            let name = format!(
                "{}/{}/{}",
                prefix,
                case_name(suite, case),
                sanitize_name(&namer(idx, &param))
            );
            let body = body.clone();
            TestCase::new(name, move |ctx| body(ctx, &param))
        })
        .collect()
}

/// Default parameter namer: the parameter's position.
pub fn index_name<P>(idx: usize, _param: &P) -> String {
    idx.to_string()
}
