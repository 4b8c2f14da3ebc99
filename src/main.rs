use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use sockconform::conformance::error::{Result, RunnerError};
use sockconform::conformance::runner::{self, CaseFilter, RunOptions};
use sockconform::conformance::socket_cases;
use sockconform::interface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Conformance checks for socket creation and early-lifecycle syscalls.
#[derive(Debug, Parser)]
#[command(name = "sockconform", version)]
struct Cli {
    /// Case filter, e.g. `SocketTest.*-*Inet`
    #[arg(long, env = "SOCKCONFORM_FILTER")]
    filter: Option<String>,

    /// Print the selected case names and exit
    #[arg(long)]
    list: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of cases to run at once
    #[arg(long, env = "SOCKCONFORM_JOBS", default_value_t = 1)]
    jobs: usize,

    /// Stop starting new cases after the first failure
    #[arg(long)]
    fail_fast: bool,

    /// Host under test; anything but `native` is treated as emulated
    #[arg(long, env = "SOCKCONFORM_PLATFORM")]
    platform: Option<String>,

    /// Leave generated socket paths on disk
    #[arg(long)]
    keep_paths: bool,

    /// Log as JSON lines on stderr
    #[arg(long)]
    log_json: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: Cli) -> Result<bool> {
    if let Err(fixed) = interface::select_platform(cli.platform.as_deref()) {
        return Err(RunnerError::PlatformConflict {
            fixed: fixed.name().to_string(),
            requested: cli.platform.unwrap_or_default(),
        });
    }

    let filter = cli.filter.as_deref().map(CaseFilter::parse).transpose()?;
    let cases = runner::select_cases(socket_cases::all_cases(), filter.as_ref())?;

    if cli.list {
        for case in &cases {
            println!("{}", case.name());
        }
        return Ok(true);
    }

    let options = RunOptions {
        jobs: cli.jobs,
        fail_fast: cli.fail_fast,
    };
    let report = runner::run_cases(&cases, &options);

    if !cli.keep_paths {
        let removed = interface::remove_unix_paths();
        tracing::debug!(removed, "removed generated socket paths");
    }
    let report = report?;

    let stdout = io::stdout().lock();
    match cli.format {
        OutputFormat::Text => report.write_text(stdout)?,
        OutputFormat::Json => report.write_json(stdout)?,
    }
    if let Some(path) = &cli.output {
        report.write_json(BufWriter::new(File::create(path)?))?;
    }

    Ok(report.success())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    interface::init_logging(cli.verbose, cli.log_json);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("sockconform: {}", e);
            ExitCode::from(2)
        }
    }
}
