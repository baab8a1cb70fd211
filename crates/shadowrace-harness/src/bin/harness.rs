//! CLI entrypoint for the shadowrace scenario harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use shadowrace_harness::runner::{self, Expected};
use shadowrace_harness::structured_log::{self, LogEntry};

/// Scenario tooling for shadowrace.
#[derive(Debug, Parser)]
#[command(name = "shadowrace-harness")]
#[command(about = "Runs replay scenarios and checks their findings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a scenario command and check its findings.
    Run {
        /// Program to execute.
        program: String,
        /// Arguments passed through to the program.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        /// Expected findings, comma-separated: data-race, did-not-panic,
        /// did-not-recover, recovered-multiple, payload-mismatch.
        #[arg(long, value_delimiter = ',')]
        expect: Vec<String>,
        /// Append a JSONL log entry to this file.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Fixed timestamp for deterministic log output.
        #[arg(long)]
        timestamp: Option<String>,
        /// Echo the scenario's captured output.
        #[arg(long)]
        show_output: bool,
    },
    /// List the output markers the runner scans for.
    Markers,
}

fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Run {
            program,
            args,
            expect,
            log,
            timestamp,
            show_output,
        } => run(&program, &args, &expect, log.as_deref(), timestamp, show_output),
        Command::Markers => {
            println!("data-race            {}", runner::DATA_RACE_MARKER);
            println!("did-not-panic        {}", runner::DID_NOT_PANIC_MARKER);
            println!("did-not-recover      {}", runner::DID_NOT_RECOVER_MARKER);
            println!("recovered-multiple   {}", runner::RECOVERED_MULTIPLE_MARKER);
            println!("payload-mismatch     {}", runner::PAYLOAD_MISMATCH_MARKER);
            ExitCode::SUCCESS
        }
    }
}

fn run(
    program: &str,
    args: &[String],
    expect: &[String],
    log: Option<&std::path::Path>,
    timestamp: Option<String>,
    show_output: bool,
) -> ExitCode {
    let expected = match Expected::from_names(expect) {
        Ok(expected) => expected,
        Err(err) => {
            eprintln!("harness: {err}");
            return ExitCode::FAILURE;
        }
    };

    let report = match runner::run_scenario(program, args, expected) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("harness: {err}");
            return ExitCode::FAILURE;
        }
    };

    if show_output {
        print!("{}", report.output);
    }

    if let Some(path) = log {
        let timestamp = timestamp.unwrap_or_else(structured_log::unix_timestamp);
        let entry = LogEntry::from_report(&report, timestamp);
        if let Err(err) = structured_log::append_jsonl(path, &entry) {
            eprintln!("harness: {err}");
            return ExitCode::FAILURE;
        }
    }

    if report.passed {
        println!("PASS {program}");
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "FAIL {program}: expected {:?}, observed {:?}",
            report.expected, report.observed
        );
        ExitCode::FAILURE
    }
}
