//! Taskcheck - conformance checker for the tasks REST API
//!
//! Runs the scenario script against one endpoint and prints a colored
//! report followed by the tally of failed and succeeded scenarios.

mod console;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use taskcheck_application::{CheckerConfig, ScenarioRunner, Tally, run_script};
use taskcheck_infrastructure::ReqwestTransport;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::console::ConsoleReporter;

const DEFAULT_FILTER: &str = "warn";

/// Added on top of any `RUST_LOG` value when `--verbose` is set.
const VERBOSE_DIRECTIVES: [&str; 3] = [
    "taskcheck=debug",
    "taskcheck_application=debug",
    "taskcheck_infrastructure=debug",
];

/// Conformance checker for the tasks REST API
#[derive(Parser, Debug)]
#[command(name = "taskcheck")]
#[command(about = "Checks a tasks REST API against its contract", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the server under test, e.g. http://127.0.0.1:8080/
    #[arg(env = "TASKCHECK_ENDPOINT")]
    endpoint: String,

    /// Log every request and response
    #[arg(short, long)]
    verbose: bool,

    /// Exit with status 1 when any scenario fails
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn into_config(self) -> CheckerConfig {
        CheckerConfig::new(self.endpoint)
            .with_verbose(self.verbose)
            .with_strict(self.strict)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config();
    init_tracing(config.verbose);
    debug!(?config, "configuration loaded");

    let transport = ReqwestTransport::new(&config)?;
    let runner = ScenarioRunner::new(Arc::new(transport), config.endpoint.as_str());

    let mut reporter = ConsoleReporter::new(io::stdout());
    let tally = run_script(&runner, &mut reporter).await;
    reporter.into_inner()?;
    info!(
        failed = tally.failed,
        succeeded = tally.succeeded,
        strict = config.strict,
        "conformance run finished"
    );

    Ok(ExitCode::from(exit_status(&tally, config.strict)))
}

fn init_tracing(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(log_filter(env.as_deref(), verbose))
        .with(fmt::layer().without_time())
        .init();
}

/// `RUST_LOG` (or `warn`) with the verbose directives layered over it.
fn log_filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = EnvFilter::new(env.unwrap_or(DEFAULT_FILTER));
    if !verbose {
        return filter;
    }
    VERBOSE_DIRECTIVES
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(filter, EnvFilter::add_directive)
}

/// Failures only affect the exit status in strict mode.
const fn exit_status(tally: &Tally, strict: bool) -> u8 {
    if strict && !tally.all_passed() { 1 } else { 0 }
}
