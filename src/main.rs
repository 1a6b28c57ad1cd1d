// src/main.rs
use clap::error::ErrorKind;
use clap::Parser;

use check_rabbitmq_aliveness::check::{self, CheckResult, Status};
use check_rabbitmq_aliveness::config::Cli;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            std::process::exit(Status::Ok.exit_code());
        }
        // A usage error must never read as CRITICAL to the scheduler.
        Err(err) => {
            let _ = err.print();
            exit_with(CheckResult::unknown("invalid command line arguments"));
        }
    };

    init_tracing(cli.verbose);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => exit_with(CheckResult::unknown(err.to_string())),
    };

    let result = check::run(config).await;
    exit_with(result);
}

/// Print the single plugin line and terminate with the matching exit code.
fn exit_with(result: CheckResult) -> ! {
    println!("{result}");
    std::process::exit(result.status.exit_code());
}

/// Diagnostics go to stderr so the plugin line owns stdout. `-v` raises the
/// default level; RUST_LOG still wins when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
