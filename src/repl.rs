//! Interactive terminal session: the form, the predict trigger and the panels.

use crate::config::PanelConfig;
use crate::form::{Adapter, FormState};
use crate::metrics::SessionMetrics;
use crate::models::inference::Predictor;
use crate::panels::{MetricsPanel, SyntheticSample};
use anyhow::Result;
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::debug;

const HELP: &str = "\
Commands:
  show                   list fields and current values
  set <field> <value>    change a field (out-of-range values are clamped)
  reset                  restore defaults
  predict                estimate the house price
  metrics                show the example metrics panel
  rmse <v> | r2 <v>      adjust the example metrics
  corr                   correlation matrix over a synthetic sample
  scatter [<x> <y>]      scatter plot over a synthetic sample
  help                   this text
  quit                   leave
";

/// One parsed line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Set { field: String, value: String },
    Reset,
    Predict,
    Metrics,
    Rmse(String),
    R2(String),
    Corr,
    Scatter(Option<(String, String)>),
    Help,
    Quit,
    Empty,
}

impl Command {
    /// Parse a line. The error is a usage hint.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(Command::Empty);
        };
        let args: Vec<&str> = parts.collect();

        let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("show", []) => Command::Show,
            ("set", [field, value]) => Command::Set {
                field: field.to_string(),
                value: value.to_string(),
            },
            ("set", [pair]) if pair.contains('=') => {
                let (field, value) = pair.split_once('=').unwrap_or((*pair, ""));
                Command::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                }
            }
            ("set", _) => return Err("usage: set <field> <value>".to_string()),
            ("reset", []) => Command::Reset,
            ("predict", []) => Command::Predict,
            ("metrics", []) => Command::Metrics,
            ("rmse", [v]) => Command::Rmse(v.to_string()),
            ("r2", [v]) => Command::R2(v.to_string()),
            ("corr", []) => Command::Corr,
            ("scatter", []) => Command::Scatter(None),
            ("scatter", [x, y]) => Command::Scatter(Some((x.to_string(), y.to_string()))),
            ("help", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(format!("unknown command '{}', type 'help'", line.trim())),
        };

        Ok(command)
    }
}

/// Result of executing one command
#[derive(Debug, PartialEq)]
pub enum Step {
    Continue(String),
    Quit,
}

/// Form session bound to one predictor
pub struct Session<'a, P: Predictor + ?Sized> {
    adapter: Adapter<'a, P>,
    form: FormState,
    panel: MetricsPanel,
    sample_rows: usize,
    seed: u64,
    metrics: SessionMetrics,
}

impl<'a, P: Predictor + ?Sized> Session<'a, P> {
    pub fn new(adapter: Adapter<'a, P>, form: FormState, panel: &PanelConfig) -> Self {
        Self {
            adapter,
            form,
            panel: MetricsPanel::from_config(panel),
            sample_rows: panel.sample_rows.max(2),
            seed: panel.seed,
            metrics: SessionMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// Execute one command and return what to print
    pub fn execute(&mut self, command: Command) -> Step {
        debug!(command = ?command, "Executing command");

        let output = match command {
            Command::Empty => String::new(),
            Command::Show => self.form.render(),
            Command::Set { field, value } => match self.form.set_str(&field, &value) {
                Ok(effective) => {
                    let shown = self
                        .form
                        .schema()
                        .field(&field)
                        .map(|f| f.display_value(effective))
                        .unwrap_or_else(|| effective.to_string());
                    format!("{} = {}\n", field, shown)
                }
                Err(e) => format!("{}\n", e),
            },
            Command::Reset => {
                self.form.reset();
                "Inputs reset to defaults\n".to_string()
            }
            Command::Predict => {
                let start = Instant::now();
                let outcome = self.adapter.predict(&self.form);
                self.metrics.record(&outcome, start.elapsed());
                format!("{}\n", outcome.message())
            }
            Command::Metrics => self.panel.render(),
            Command::Rmse(raw) => match raw.parse::<f64>() {
                Ok(v) => format!("RMSE = {:.3}\n", self.panel.set_rmse(v)),
                Err(_) => format!("'{}' is not a number\n", raw),
            },
            Command::R2(raw) => match raw.parse::<f64>() {
                Ok(v) => format!("R² = {:.3}\n", self.panel.set_r2(v)),
                Err(_) => format!("'{}' is not a number\n", raw),
            },
            Command::Corr => self.sample().render_correlation(),
            Command::Scatter(axes) => {
                let (x, y) = match axes {
                    Some((x, y)) => (x, y),
                    None => {
                        let (x, y) = self.form.schema().scatter_axes();
                        (x.to_string(), y.to_string())
                    }
                };
                match self.sample().scatter_plot(&x, &y) {
                    Ok(plot) => plot,
                    Err(e) => format!("{}\n", e),
                }
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Step::Quit,
        };

        Step::Continue(output)
    }

    fn sample(&self) -> SyntheticSample {
        SyntheticSample::generate(&self.form, self.sample_rows, self.seed)
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        writeln!(output, "House price predictor ({} schema). Type 'help' for commands.", self.form.schema().kind)?;
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let step = match Command::parse(&line) {
                Ok(command) => self.execute(command),
                Err(hint) => Step::Continue(format!("{}\n", hint)),
            };

            match step {
                Step::Continue(text) => write!(output, "{}", text)?,
                Step::Quit => break,
            }

            write!(output, "> ")?;
            output.flush()?;
        }

        writeln!(output)?;
        Ok(())
    }
}
