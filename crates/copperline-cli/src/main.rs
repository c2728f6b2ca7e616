use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use copperline_cli::{Args, config, error_adapter::ErrorAdapter};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    // Parse configuration first
    let args = Args::parse();

    // The logger has to exist before run() emits anything, and the config
    // file may carry the default log level, so peek at the config now.
    // A config error here is ignored; run() reports it properly.
    let config_level = config::load_config(args.config.as_ref())
        .ok()
        .and_then(|c| c.log_level);
    let level = args
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "warn".to_string());

    // Initialize the logger with the resolved log level
    let log_level = LevelFilter::from_str(&level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Copperline");
    debug!(args:?; "Parsed arguments");

    // Run the application
    if let Err(err) = copperline_cli::run(&args) {
        // Wrap error in ErrorAdapter for rich miette formatting
        let adapted_error = ErrorAdapter(&err);

        // Use miette to display the diagnostic error
        let reporter = miette::GraphicalReportHandler::new();
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, &adapted_error)
            .expect("Writing to String buffer is infallible");

        error!("Failed\n{writer}");
        process::exit(1);
    }

    info!("Completed successfully");
}
