use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use status_core::error::AppError;
use statusboard_lib::cli::Cli;
use statusboard_lib::logging::{init_subscriber, Verbosity};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet), cli.no_color);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let err = AppError::new("CLI_RUNTIME_FAILED", "Failed to start async runtime")
                .with_details(e.to_string());
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(statusboard_lib::run(cli));
    // Blocking requests still in flight (interactive quit) are abandoned.
    runtime.shutdown_timeout(Duration::from_millis(200));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = %err.code, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
