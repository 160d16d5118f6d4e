//! ingestcheck - warn when Instana data ingestion approaches the quota
//!
//! Exit status: 0 when usage is below the threshold (or the parameters were
//! rejected and usage was printed), 1 when the threshold is reached, 2 when
//! the usage could not be fetched or decoded.

use ingestcheck::{
    IngestError,
    checker::Checker,
    cli::{Cli, usage_text},
    output::{get_formatter, write_failure},
    timezone::resolve_trace_zone,
};
use ingestcheck_instana::InstanaClient;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status for setup, transport and decode failures
const EXIT_SETUP_FAILURE: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // The --quiet flag overrides RUST_LOG. Logs go to stderr so stdout only
    // carries the report.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("error")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ingestcheck=warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let today = chrono::Local::now().date_naive();
    let config = match cli.run_params(today).validate(today) {
        Ok(config) => config,
        Err(e) => {
            debug!("Rejected parameters: {}", e);
            println!("{}", usage_text());
            return ExitCode::SUCCESS;
        }
    };

    match run(&cli, &config).await {
        Ok(exceeded) => {
            if exceeded {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            debug!("Usage check failed: {:?}", e);
            if let Err(write_err) = write_failure(&mut std::io::stderr(), &e) {
                debug!("Could not write error report: {}", write_err);
            }
            ExitCode::from(EXIT_SETUP_FAILURE)
        }
    }
}

/// Fetch, aggregate and print the report; returns whether the threshold was reached
async fn run(cli: &Cli, config: &ingestcheck::config::RunConfig) -> Result<bool, IngestError> {
    let trace_zone = resolve_trace_zone(cli.timezone.as_deref(), cli.utc)?;
    info!("Rendering day timestamps in {}", trace_zone.name());

    let show_progress = !cli.json && is_terminal::is_terminal(std::io::stderr());
    let client = InstanaClient::new(&config.endpoint, config.token.clone())?;
    let report = Checker::new(trace_zone)
        .with_progress(show_progress)
        .run(config, &client)
        .await?;

    let formatter = get_formatter(cli.json, config.verbose);
    print!("{}", formatter.format_report(&report));

    Ok(report.threshold_exceeded())
}
