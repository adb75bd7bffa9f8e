//! Numeric summary for statistical profiling.
//!
//! Every value is retained until the summary is taken, so quantiles are
//! exact. Memory grows with the number of numeric values in the column.

use serde::{Deserialize, Serialize};

/// Summary of the numeric values seen in a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    /// Sample variance.
    pub var: f64,
    /// Mean absolute deviation around the mean.
    pub mad: f64,
    /// Standard error of the mean.
    pub sem: f64,
    /// Adjusted skewness; needs three values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skew: Option<f64>,
    /// Excess kurtosis; needs four values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kurt: Option<f64>,
    pub median: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
}

impl NumericStatistics {
    /// Calculate the interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Welford accumulator that also keeps the values for exact quantiles.
#[derive(Debug, Default)]
pub struct StreamingStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    values: Vec<f64>,
}

impl StreamingStats {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..Self::default()
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.values.push(value);
    }

    fn var(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Snapshot of the accumulated values; `None` when nothing was added.
    pub fn summary(&self) -> Option<NumericStatistics> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let percentile = |p: f64| -> f64 {
            let rank = p * (sorted.len() - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        };

        let (mut abs, mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0, 0.0);
        for v in &self.values {
            let d = v - self.mean;
            abs += d.abs();
            m2 += d * d;
            m3 += d * d * d;
            m4 += d * d * d * d;
        }

        // Adjusted Fisher-Pearson skewness and sample excess kurtosis.
        let skew = (self.count >= 3).then(|| {
            if m2 == 0.0 {
                return 0.0;
            }
            let g1 = (m3 / n) / (m2 / n).powf(1.5);
            g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
        });
        let kurt = (self.count >= 4).then(|| {
            if m2 == 0.0 {
                return 0.0;
            }
            let lead = n * (n + 1.0) * (n - 1.0) * m4 / ((n - 2.0) * (n - 3.0) * m2 * m2);
            lead - 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
        });

        let var = self.var();
        let std = var.sqrt();
        Some(NumericStatistics {
            count: self.count,
            min: self.min,
            max: self.max,
            mean: self.mean,
            std,
            var,
            mad: abs / n,
            sem: if self.count < 2 { 0.0 } else { std / n.sqrt() },
            skew,
            kurt,
            median: percentile(0.5),
            q1: percentile(0.25),
            q3: percentile(0.75),
        })
    }
}

/// Parses a value for statistical profiling. NaN and infinities are
/// rejected alongside non-numeric text.
pub fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
