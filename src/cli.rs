//! Command-line surface
//!
//! ```bash
//! # Interactive form (default)
//! house-price --config config/config.toml
//!
//! # One-shot prediction
//! house-price predict --set median_income=7.5 --set latitude=37.8 --json
//!
//! # List the fields the active schema expects
//! house-price fields
//! ```

use crate::form::{Adapter, FormState};
use crate::models::inference::Predictor;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// House price predictor backed by a pre-trained regression model
#[derive(Parser, Debug)]
#[command(name = "house-price")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: config/config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute (default: interactive)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive form
    Interactive,

    /// Run a single prediction and exit
    Predict(PredictCommand),

    /// Print the active schema's fields and bounds
    Fields,
}

/// Run a single prediction from command-line inputs
#[derive(Args, Debug, Clone, Default)]
pub struct PredictCommand {
    /// Field assignment `KEY=VALUE`; repeatable. Unset fields use defaults.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,

    /// Emit the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictCommand {
    /// Apply the assignments to `form`, predict once and write the outcome.
    ///
    /// Returns whether the prediction succeeded.
    pub fn run<P, W>(&self, adapter: &Adapter<'_, P>, mut form: FormState, mut out: W) -> Result<bool>
    where
        P: Predictor + ?Sized,
        W: Write,
    {
        for (key, value) in &self.assignments {
            form.set_str(key, value)
                .with_context(|| format!("Invalid --set {}={}", key, value))?;
        }

        let outcome = adapter.predict(&form);

        if self.json {
            serde_json::to_writer_pretty(&mut out, &outcome)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", outcome.message())?;
        }

        Ok(outcome.is_success())
    }
}

/// Parse `KEY=VALUE`
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
