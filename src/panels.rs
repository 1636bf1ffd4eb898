//! Illustrative read-only panels.
//!
//! None of these touch the live model. The metrics panel shows example
//! constants; the correlation and scatter panels work on a small
//! synthetic sample whose first row is the current form input.

use crate::config::PanelConfig;
use crate::error::FormError;
use crate::form::FormState;
use crate::schema::Schema;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SCATTER_WIDTH: usize = 48;
const SCATTER_HEIGHT: usize = 14;

/// Example model-quality figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsPanel {
    rmse: f64,
    r2: f64,
}

impl MetricsPanel {
    pub const RMSE_MAX: f64 = 5.0;

    pub fn new(rmse: f64, r2: f64) -> Self {
        let mut panel = Self { rmse: 0.0, r2: 0.0 };
        panel.set_rmse(rmse);
        panel.set_r2(r2);
        panel
    }

    pub fn from_config(config: &PanelConfig) -> Self {
        Self::new(config.rmse, config.r2)
    }

    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    pub fn r2(&self) -> f64 {
        self.r2
    }

    /// Clamped to `[0, RMSE_MAX]`; NaN is ignored.
    pub fn set_rmse(&mut self, value: f64) -> f64 {
        if !value.is_nan() {
            self.rmse = value.clamp(0.0, Self::RMSE_MAX);
        }
        self.rmse
    }

    /// Clamped to `[0, 1]`; NaN is ignored.
    pub fn set_r2(&mut self, value: f64) -> f64 {
        if !value.is_nan() {
            self.r2 = value.clamp(0.0, 1.0);
        }
        self.r2
    }

    pub fn render(&self) -> String {
        format!(
            "Example model metrics (illustrative)\n  RMSE: {:.3}\n  R²:   {:.3}\n",
            self.rmse, self.r2
        )
    }
}

impl Default for MetricsPanel {
    fn default() -> Self {
        Self::from_config(&PanelConfig::default())
    }
}

/// Tiny in-memory dataset over the schema fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSample {
    schema: Schema,
    rows: Vec<Vec<f64>>,
}

impl SyntheticSample {
    /// Row 0 is `form`; the other `rows - 1` rows are uniform within field bounds.
    pub fn generate(form: &FormState, rows: usize, seed: u64) -> Self {
        let schema = *form.schema();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = Vec::with_capacity(rows.max(1));
        data.push(form.values().to_vec());

        for _ in 1..rows {
            let row = schema
                .fields()
                .iter()
                .map(|f| f.clamp(rng.gen_range(f.min..=f.max)))
                .collect();
            data.push(row);
        }

        Self { schema, rows: data }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[index]).collect()
    }

    /// Pearson coefficients for every field pair. `None` where a column is constant.
    pub fn correlation_matrix(&self) -> Vec<Vec<Option<f64>>> {
        let columns: Vec<Vec<f64>> = (0..self.schema.field_count())
            .map(|i| self.column(i))
            .collect();

        columns
            .iter()
            .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
            .collect()
    }

    pub fn render_correlation(&self) -> String {
        let matrix = self.correlation_matrix();
        let keys = self.schema.keys();
        let width = keys.iter().map(|k| k.len()).max().unwrap_or(0);

        let mut out = format!("Correlation matrix ({} synthetic rows)\n", self.len());
        out.push_str(&format!("  {:width$}", "", width = width));
        for i in 0..keys.len() {
            out.push_str(&format!(" {:>6}", format!("[{}]", i)));
        }
        out.push('\n');

        for (i, row) in matrix.iter().enumerate() {
            out.push_str(&format!("  {:<width$}", keys[i], width = width));
            for cell in row {
                match cell {
                    Some(r) => out.push_str(&format!(" {:>6.2}", r)),
                    None => out.push_str(&format!(" {:>6}", "n/a")),
                }
            }
            out.push_str(&format!("  [{}]\n", i));
        }
        out
    }

    /// ASCII scatter of `y` against `x`. The current input is drawn as `@`.
    pub fn scatter_plot(&self, x: &str, y: &str) -> Result<String, FormError> {
        let xi = self.lookup(x)?;
        let yi = self.lookup(y)?;
        let fx = &self.schema.fields()[xi];
        let fy = &self.schema.fields()[yi];

        let mut grid = vec![vec![' '; SCATTER_WIDTH]; SCATTER_HEIGHT];
        for (n, row) in self.rows.iter().enumerate().rev() {
            let col = cell(row[xi], fx.min, fx.max, SCATTER_WIDTH);
            let line = SCATTER_HEIGHT - 1 - cell(row[yi], fy.min, fy.max, SCATTER_HEIGHT);
            grid[line][col] = if n == 0 { '@' } else { '*' };
        }

        let mut out = format!("{} vs {}  (@ = current input)\n", fy.label, fx.label);
        out.push_str(&format!("  {:>10} ┤\n", fy.display_bound(fy.max)));
        for line in grid {
            out.push_str(&format!("  {:>10} │{}\n", "", line.into_iter().collect::<String>()));
        }
        out.push_str(&format!("  {:>10} └{}\n", fy.display_bound(fy.min), "─".repeat(SCATTER_WIDTH)));
        out.push_str(&format!(
            "  {:>10}  {:<w$}{}\n",
            "",
            fx.display_bound(fx.min),
            fx.display_bound(fx.max),
            w = SCATTER_WIDTH.saturating_sub(fx.display_bound(fx.max).len()),
        ));
        Ok(out)
    }

    fn lookup(&self, key: &str) -> Result<usize, FormError> {
        self.schema
            .index_of(key)
            .ok_or_else(|| FormError::UnknownField {
                field: key.to_string(),
                expected: self.schema.keys().join(", "),
            })
    }
}

/// Map `value` within `[min, max]` to a cell index in `0..cells`.
fn cell(value: f64, min: f64, max: f64, cells: usize) -> usize {
    let span = max - min;
    if span <= 0.0 {
        return 0;
    }
    let t = ((value - min) / span).clamp(0.0, 1.0);
    ((t * (cells - 1) as f64).round() as usize).min(cells - 1)
}

fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }

    Some((cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_panel_clamps() {
        let mut panel = MetricsPanel::new(0.5, 0.8);
        assert_eq!(panel.set_rmse(-1.0), 0.0);
        assert_eq!(panel.set_rmse(10.0), MetricsPanel::RMSE_MAX);
        assert_eq!(panel.set_r2(1.5), 1.0);
        assert_eq!(panel.set_r2(f64::NAN), 1.0);
        assert!(panel.render().contains("RMSE: 5.000"));
    }

    #[test]
    fn test_sample_first_row_is_current_input() {
        let mut form = FormState::new(Schema::census());
        form.set("median_income", 12.5).unwrap();

        let sample = SyntheticSample::generate(&form, 25, 42);
        assert_eq!(sample.len(), 25);
        assert_eq!(sample.rows()[0], form.values());
    }

    #[test]
    fn test_sample_rows_within_bounds_and_deterministic() {
        let form = FormState::new(Schema::sklearn());
        let a = SyntheticSample::generate(&form, 30, 9);
        let b = SyntheticSample::generate(&form, 30, 9);
        assert_eq!(a, b);

        for row in a.rows() {
            for (value, field) in row.iter().zip(Schema::sklearn().fields()) {
                assert!(*value >= field.min && *value <= field.max);
            }
        }
    }

    #[test]
    fn test_correlation_diagonal_and_symmetry() {
        let form = FormState::new(Schema::census());
        let matrix = SyntheticSample::generate(&form, 25, 1).correlation_matrix();

        assert_eq!(matrix.len(), 8);
        for i in 0..8 {
            let diag = matrix[i][i].unwrap();
            assert!((diag - 1.0).abs() < 1e-9);
            for j in 0..8 {
                assert_eq!(matrix[i][j].is_some(), matrix[j][i].is_some());
                if let (Some(a), Some(b)) = (matrix[i][j], matrix[j][i]) {
                    assert!((a - b).abs() < 1e-12);
                    assert!((-1.0..=1.0).contains(&a));
                }
            }
        }
    }

    #[test]
    fn test_single_row_correlation_is_undefined() {
        let form = FormState::new(Schema::census());
        let sample = SyntheticSample::generate(&form, 1, 1);
        assert!(sample.correlation_matrix()[0][1].is_none());
        assert!(sample.render_correlation().contains("n/a"));
    }

    #[test]
    fn test_pearson_known_values() {
        let up = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        let down = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((up - 1.0).abs() < 1e-9);
        assert!((down + 1.0).abs() < 1e-9);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[3.0, 2.0, 1.0]), None);
    }

    #[test]
    fn test_scatter_marks_current_input() {
        let mut form = FormState::new(Schema::census());
        form.set("median_income", 20.0).unwrap();
        form.set("total_rooms", 10000.0).unwrap();

        let sample = SyntheticSample::generate(&form, 10, 3);
        let plot = sample.scatter_plot("median_income", "total_rooms").unwrap();

        // Top-right corner of the grid
        let first_grid_line = plot.lines().nth(2).unwrap();
        assert!(first_grid_line.ends_with('@'));
        assert!(plot.contains("Total Rooms vs Median Income (10k USD)"));
    }

    #[test]
    fn test_scatter_unknown_axis() {
        let form = FormState::new(Schema::census());
        let sample = SyntheticSample::generate(&form, 5, 3);
        assert!(matches!(
            sample.scatter_plot("MedInc", "total_rooms"),
            Err(FormError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell(0.0, 0.0, 10.0, 11), 0);
        assert_eq!(cell(10.0, 0.0, 10.0, 11), 10);
        assert_eq!(cell(5.0, 0.0, 10.0, 11), 5);
        assert_eq!(cell(50.0, 0.0, 10.0, 11), 10);
    }
}
