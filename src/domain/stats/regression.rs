//! Ordinary least squares, y = alpha + beta * x.
//!
//! Solved through the normal equations over the sums Sx, Sy, Sxy, Sxx:
//! beta  = (n*Sxy - Sx*Sy) / (n*Sxx - Sx^2)
//! alpha = (Sy - beta*Sx) / n

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    pub alpha: f64,
    pub beta: f64,
    pub r_squared: f64,
    pub residuals: Vec<f64>,
}

impl RegressionResult {
    /// Returned for empty or mismatched inputs and for a zero-variance `x`.
    pub fn degenerate() -> Self {
        RegressionResult {
            alpha: 0.0,
            beta: 0.0,
            r_squared: 0.0,
            residuals: Vec::new(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.residuals.is_empty()
    }

    /// Sum of squared residuals.
    pub fn ssr(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }
}

pub fn linear_regression(x: &[f64], y: &[f64]) -> RegressionResult {
    if x.len() != y.len() || x.is_empty() {
        return RegressionResult::degenerate();
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (&xi, &yi) in x.iter().zip(y) {
        sum_x += xi;
        sum_y += yi;
        sum_xy += xi * yi;
        sum_xx += xi * xi;
    }

    let n = x.len() as f64;
    let denominator = n * sum_xx - sum_x * sum_x;

    // Cancellation can leave a few ulps of noise where the true variance is 0.
    if denominator.abs() <= f64::EPSILON * (n * sum_xx).abs() {
        return RegressionResult::degenerate();
    }

    let beta = (n * sum_xy - sum_x * sum_y) / denominator;
    let alpha = (sum_y - beta * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_total: f64 = y.iter().map(|yi| (yi - mean_y) * (yi - mean_y)).sum();

    let residuals: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| yi - (alpha + beta * xi))
        .collect();
    let ss_residual: f64 = residuals.iter().map(|r| r * r).sum();

    let r_squared = if ss_total > 0.0 {
        1.0 - ss_residual / ss_total
    } else {
        0.0
    };

    RegressionResult {
        alpha,
        beta,
        r_squared,
        residuals,
    }
}
