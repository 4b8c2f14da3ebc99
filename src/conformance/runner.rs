//! Selecting, running, and reporting cases.

use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::conformance::error::{Result, RunnerError};
use crate::conformance::harness::{TestCase, Verdict};
use crate::interface;

/// gtest-style case filter: `POS1:POS2-NEG1:NEG2`. `*` matches any run of
/// characters and `?` any single one. An empty positive part selects
/// everything before the negatives are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFilter {
    raw: String,
    positive: Vec<String>,
    negative: Vec<String>,
}

impl CaseFilter {
    pub fn parse(raw: &str) -> Result<CaseFilter> {
        if let Some(c) = raw.chars().find(|c| c.is_whitespace()) {
            return Err(RunnerError::InvalidFilter {
                filter: raw.to_string(),
                reason: format!("unexpected whitespace {:?}", c),
            });
        }
        let (pos, neg) = match raw.split_once('-') {
            Some((pos, neg)) => (pos, neg),
            None => (raw, ""),
        };
        let split = |part: &str| -> Vec<String> {
            part.split(':')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        };
        let mut positive = split(pos);
        if positive.is_empty() {
            positive.push("*".to_string());
        }
        Ok(CaseFilter {
            raw: raw.to_string(),
            positive,
            negative: split(neg),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, name: &str) -> bool {
        self.positive.iter().any(|p| glob_match(p, name))
            && !self.negative.iter().any(|p| glob_match(p, name))
    }
}

fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut p, mut n) = (0, 0);
    // last '*' seen and the name position it is currently absorbing up to
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, n));
            p += 1;
        } else if let Some((sp, sn)) = star {
            p = sp + 1;
            n = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}

/// Keeps the cases the filter selects, in order.
pub fn select_cases(cases: Vec<TestCase>, filter: Option<&CaseFilter>) -> Result<Vec<TestCase>> {
    let Some(filter) = filter else {
        return Ok(cases);
    };
    let selected: Vec<TestCase> = cases
        .into_iter()
        .filter(|case| filter.matches(case.name()))
        .collect();
    if selected.is_empty() {
        return Err(RunnerError::NoCasesMatched(filter.as_str().to_string()));
    }
    Ok(selected)
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub jobs: usize,
    pub fail_fast: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            jobs: 1,
            fail_fast: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub platform: interface::Platform,
    pub summary: Summary,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn new(platform: interface::Platform, cases: Vec<CaseReport>) -> RunReport {
        let mut summary = Summary {
            total: cases.len(),
            ..Summary::default()
        };
        for case in &cases {
            match case.verdict {
                Verdict::Pass => summary.passed += 1,
                Verdict::Fail { .. } => summary.failed += 1,
                Verdict::Skip { .. } => summary.skipped += 1,
            }
        }
        RunReport {
            platform,
            summary,
            cases,
        }
    }

    /// Skipped cases count as neither pass nor fail.
    pub fn success(&self) -> bool {
        self.summary.failed == 0
    }

    pub fn write_json<W: Write>(&self, mut out: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn write_text<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(
            out,
            "[==========] Running {} cases on platform {}",
            self.summary.total,
            self.platform.name()
        )?;
        for case in &self.cases {
            writeln!(out, "[ RUN      ] {}", case.name)?;
            match &case.verdict {
                Verdict::Pass => {
                    writeln!(out, "[       OK ] {} ({} ms)", case.name, case.duration_ms)?
                }
                Verdict::Skip { reason } => {
                    writeln!(out, "[  SKIPPED ] {}: {}", case.name, reason)?
                }
                Verdict::Fail { failures } => {
                    for failure in failures {
                        if failure.line > 0 {
                            writeln!(out, "{}:{}: {}", failure.file, failure.line, failure.message)?;
                        } else {
                            writeln!(out, "{}", failure.message)?;
                        }
                    }
                    writeln!(out, "[  FAILED  ] {} ({} ms)", case.name, case.duration_ms)?;
                }
            }
        }
        writeln!(out, "[==========] {} cases ran.", self.summary.total)?;
        writeln!(out, "[  PASSED  ] {} cases.", self.summary.passed)?;
        if self.summary.skipped > 0 {
            writeln!(out, "[  SKIPPED ] {} cases.", self.summary.skipped)?;
        }
        if self.summary.failed > 0 {
            writeln!(out, "[  FAILED  ] {} cases, listed below:", self.summary.failed)?;
            for case in self.cases.iter().filter(|c| c.verdict.is_fail()) {
                writeln!(out, "[  FAILED  ] {}", case.name)?;
            }
        }
        Ok(())
    }
}

pub fn run_one(case: &TestCase) -> CaseReport {
    tracing::info!(case = case.name(), "run");
    let start = interface::starttimer();
    let verdict = case.run();
    let duration_ms = interface::readtimer(start).as_millis() as u64;
    match &verdict {
        Verdict::Pass => tracing::info!(case = case.name(), duration_ms, "ok"),
        Verdict::Skip { reason } => tracing::warn!(case = case.name(), reason = %reason, "skipped"),
        Verdict::Fail { failures } => {
            tracing::error!(case = case.name(), failures = failures.len(), "failed")
        }
    }
    CaseReport {
        name: case.name().to_string(),
        verdict,
        duration_ms,
    }
}

/// Runs every case and reports them in the order given. With `fail_fast`,
/// no new case starts after a failure, so the report may be shorter.
pub fn run_cases(cases: &[TestCase], options: &RunOptions) -> Result<RunReport> {
    if options.jobs == 0 {
        return Err(RunnerError::InvalidJobs);
    }
    let platform = interface::current_platform().clone();
    tracing::info!(
        platform = platform.name(),
        emulated = platform.is_emulated(),
        cases = cases.len(),
        jobs = options.jobs,
        "starting run"
    );

    let reports = if options.jobs == 1 {
        let mut reports = Vec::with_capacity(cases.len());
        for case in cases {
            let report = run_one(case);
            let failed = report.verdict.is_fail();
            reports.push(report);
            if failed && options.fail_fast {
                break;
            }
        }
        reports
    } else {
        run_parallel(cases, options)
    };

    Ok(RunReport::new(platform, reports))
}

fn run_parallel(cases: &[TestCase], options: &RunOptions) -> Vec<CaseReport> {
    let next = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let slots: Mutex<Vec<Option<CaseReport>>> = Mutex::new(vec![None; cases.len()]);

    std::thread::scope(|scope| {
        for _ in 0..options.jobs.min(cases.len()) {
            scope.spawn(|| loop {
                if stop.load(Ordering::Acquire) {
                    break;
                }
                let idx = next.fetch_add(1, Ordering::AcqRel);
                let Some(case) = cases.get(idx) else {
                    break;
                };
                let report = run_one(case);
                if report.verdict.is_fail() && options.fail_fast {
                    stop.store(true, Ordering::Release);
                }
                slots.lock()[idx] = Some(report);
            });
        }
    });

    slots.into_inner().into_iter().flatten().collect()
}
