//! `dut-expect`: check a DUT log against an ordered expectation list.
//!
//! DUT output is read from a monitor command, a log file or standard
//! input. Exits 0 if every expectation matched, 1 if one failed and 2 on
//! any other error.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, ArgGroup, Parser};
use dut_expect::config::env::vars;
use dut_expect::scenario::builtin;
use dut_expect::{
    EnvConfig, ExpectError, LineReader, LineSource, MatcherConfig, MonitorConfig, MonitorProcess,
    ReaderConfig, Result, Scenario, ScenarioReport, ScenarioRunner,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dut-expect", version)]
#[command(about = "Check that a device log prints an ordered list of expected lines")]
#[command(group(ArgGroup::new("source").required(true).args(["scenario", "builtin"])))]
struct Args {
    /// Scenario file (TOML).
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Built-in scenario name (e.g. `ir-nec`).
    #[arg(short, long, value_name = "NAME")]
    builtin: Option<String>,

    /// Default timeout per expectation, in seconds.
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<f64>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Read DUT output from a log file instead of standard input.
    #[arg(long, value_name = "FILE", conflicts_with = "command")]
    log: Option<PathBuf>,

    /// Keep ANSI colour codes in lines before matching.
    #[arg(long)]
    keep_ansi: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Monitor command whose stdout carries the DUT log.
    #[arg(last = true, value_name = "COMMAND")]
    command: Vec<OsString>,
}

fn init_tracing(verbose: u8, env: &EnvConfig) {
    let directive = match verbose {
        0 => std::env::var("RUST_LOG")
            .ok()
            .or_else(|| env.get(vars::LOG))
            .unwrap_or_else(|| "warn".to_string()),
        1 => "dut_expect=info,dut_lines=info".to_string(),
        2 => "dut_expect=debug,dut_lines=debug".to_string(),
        _ => "dut_expect=trace,dut_lines=trace".to_string(),
    };

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    let scenario = match (&args.scenario, &args.builtin) {
        (Some(path), _) => Scenario::from_file(path)?,
        (None, Some(name)) => builtin::by_name(name).ok_or_else(|| {
            ExpectError::config(format!(
                "unknown built-in scenario '{name}' (available: {})",
                builtin::NAMES.join(", ")
            ))
        })?,
        (None, None) => return Err(ExpectError::config("no scenario given")),
    };

    match args.timeout {
        Some(secs) => {
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| ExpectError::config(format!("invalid --timeout {secs}: {e}")))?;
            Ok(scenario.with_default_timeout(timeout))
        }
        None => Ok(scenario),
    }
}

async fn run_on<S: LineSource>(
    runner: &ScenarioRunner,
    scenario: &Scenario,
    stream: &mut S,
) -> Result<ScenarioReport> {
    runner.run(scenario, stream).await
}

async fn run(args: &Args, env: &EnvConfig) -> Result<ScenarioReport> {
    let scenario = load_scenario(args)?;
    let runner = ScenarioRunner::with_config(MatcherConfig::default().with_env(env)?);
    let reader_config = ReaderConfig::builder().strip_ansi(!args.keep_ansi).build();

    if let Some((program, rest)) = args.command.split_first() {
        let config = MonitorConfig::builder(program)
            .args(rest)
            .reader(reader_config)
            .build();
        let mut monitor = MonitorProcess::spawn(&config)?;
        let report = run_on(&runner, &scenario, &mut monitor).await;
        if let Err(e) = monitor.kill().await {
            tracing::warn!(error = %e, "failed to stop monitor process");
        }
        return report;
    }

    if let Some(path) = &args.log {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| {
                ExpectError::io_context(format!("opening log file {}", path.display()), e)
            })?;
        let mut reader = LineReader::spawn(file, reader_config);
        return run_on(&runner, &scenario, &mut reader).await;
    }

    let mut reader = LineReader::spawn(tokio::io::stdin(), reader_config);
    run_on(&runner, &scenario, &mut reader).await
}

fn print_report(report: &ScenarioReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let env = EnvConfig::default();
    init_tracing(args.verbose, &env);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::from(2);
        }
    };

    let outcome = runtime.block_on(async {
        run(&args, &env)
            .await
            .and_then(|report| print_report(&report, args.json).map(|()| report.is_pass()))
    });

    // A pending stdin read holds a blocking thread until the writer sends
    // more or closes the pipe; exit without waiting for it.
    runtime.shutdown_background();

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_monitor_command() {
        let args = Args::try_parse_from([
            "dut-expect",
            "--builtin",
            "ir-nec",
            "-t",
            "12.5",
            "-vv",
            "--",
            "idf.py",
            "-p",
            "/dev/ttyUSB0",
            "monitor",
        ])
        .unwrap();
        assert_eq!(args.builtin.as_deref(), Some("ir-nec"));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.command.len(), 4);

        let scenario = load_scenario(&args).unwrap();
        assert_eq!(scenario.default_timeout(), Some(Duration::from_millis(12_500)));
    }

    #[test]
    fn scenario_source_is_required() {
        assert!(Args::try_parse_from(["dut-expect", "--json"]).is_err());
        assert!(Args::try_parse_from(["dut-expect", "-b", "ir-nec", "-s", "boot.toml"]).is_err());
    }

    #[test]
    fn log_file_conflicts_with_command() {
        let args = ["dut-expect", "-b", "ir-nec", "--log", "boot.log", "--", "cat"];
        assert!(Args::try_parse_from(args).is_err());
    }

    #[test]
    fn unknown_builtin_lists_names() {
        let args = Args::try_parse_from(["dut-expect", "-b", "wifi"]).unwrap();
        let err = load_scenario(&args).unwrap_err();
        assert!(err.to_string().contains("ir-nec"));
    }

    #[test]
    fn negative_timeout_is_rejected() {
        let args = Args::try_parse_from(["dut-expect", "-b", "ir-nec", "--timeout=-1"]).unwrap();
        assert!(load_scenario(&args).is_err());
    }
}
