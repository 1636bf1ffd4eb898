//! House Price Predictor - Main Entry Point
//!
//! Loads the model once, then either runs the interactive form or a
//! single prediction.

use anyhow::Result;
use clap::Parser;
use house_price_predictor::{
    cli::{Cli, Commands},
    config::{AppConfig, LoggingConfig},
    form::{Adapter, FormState},
    models::ModelGateway,
    repl::Session,
    schema::Schema,
};
use std::io;
use std::process::ExitCode;
use tracing::info;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("house_price_predictor={}", logging.level)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    init_logging(&config.logging)?;
    info!(
        model = %config.model.path,
        schema = %config.model.schema,
        output_scale = ?config.model.output_scale,
        "Configuration loaded"
    );

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Fields => print!("{}", Schema::for_kind(config.model.schema).describe()),
        Commands::Interactive => {
            // Load the model once; failure here is fatal
            let gateway = ModelGateway::load(&config.model)?;
            let adapter = Adapter::new(gateway, gateway.output_scale());
            let form = FormState::new(gateway.schema());

            let mut session = Session::new(adapter, form, &config.panel);
            session.run(io::stdin().lock(), io::stdout().lock())?;
            session.metrics().print_summary();
        }
        Commands::Predict(cmd) => {
            let gateway = ModelGateway::load(&config.model)?;
            let adapter = Adapter::new(gateway, gateway.output_scale());
            let form = FormState::new(gateway.schema());

            if !cmd.run(&adapter, form, io::stdout().lock())? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
