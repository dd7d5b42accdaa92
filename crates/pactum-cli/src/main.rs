//! Pactum CLI entry point

use clap::Parser;
use pactum_cli::{Cli, Config, ExitCode, OutputFormat, OutputFormatter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Create default config on first run
    if let Err(e) = Config::create_default_if_missing() {
        eprintln!("Warning: Could not create default config: {e}");
    }

    // Load config from custom path or default
    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from_error(&anyhow::Error::from(e)).to_exit_code();
        }
    };

    // CLI flags take precedence over the config file
    let config = config.with_overrides(&cli.overrides());

    // --verbose / --debug beat RUST_LOG, which beats the config file
    let filter = if cli.debug || cli.verbose {
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.logging.level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so stdout stays clean for message JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let formatter = OutputFormatter::from_config(&config.output);

    match cli.execute_with_config(config).await {
        Ok(code) => code.to_exit_code(),
        Err(e) => {
            let code = ExitCode::from_error(&e);
            let message = format!("{e:#}");
            match formatter.format() {
                OutputFormat::Json => println!("{}", formatter.format_error_with_code(&message, code)),
                OutputFormat::Table => eprintln!("{}", formatter.format_error_with_code(&message, code)),
                OutputFormat::Quiet => {}
            }
            code.to_exit_code()
        }
    }
}
