// Least-squares trend line over a series
use super::series::Series;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionLine {
    pub intercept: f64,
    pub slope: f64,
}

impl RegressionLine {
    pub const FLAT_ZERO: Self = Self {
        intercept: 0.0,
        slope: 0.0,
    };

    pub fn predict(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionPoint {
    pub index: usize,
    pub value: f64,
}

/// Fits `value = intercept + slope * index` by ordinary least squares.
///
/// An empty input gives a zero line. When the denominator vanishes (a single
/// sample) the slope is 0 and the intercept is the mean, so one sample fits
/// a flat line at its own value.
pub fn fit_values(values: &[f64]) -> RegressionLine {
    let n = values.len();
    if n == 0 {
        return RegressionLine::FLAT_ZERO;
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let n = n as f64;
    let denominator = n * sum_xx - sum_x * sum_x;
    let slope = if denominator.abs() > f64::EPSILON {
        (n * sum_xy - sum_x * sum_y) / denominator
    } else {
        0.0
    };
    let intercept = (sum_y - slope * sum_x) / n;

    RegressionLine { intercept, slope }
}

pub fn fit(series: &Series) -> RegressionLine {
    let values: Vec<f64> = series.values().collect();
    fit_values(&values)
}

/// Evaluates the line at every index of `series`.
pub fn project(series: &Series, line: &RegressionLine) -> Vec<RegressionPoint> {
    (0..series.len())
        .map(|index| RegressionPoint {
            index,
            value: line.predict(index),
        })
        .collect()
}
