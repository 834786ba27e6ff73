//! Rolling linear regression.
//!
//! For each window of `period` values, fits y = a + b*x by least squares with
//! x = 0..period-1 and returns the fitted value at the newest point,
//! a + b*(period-1). A NaN anywhere in the window yields NaN.
//! Lookback: period - 1.

/// Rolling least-squares endpoint of an arbitrary series.
pub fn linreg_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }
    if period == 1 {
        return values.to_vec();
    }

    let p = period as f64;
    let sum_x = p * (p - 1.0) / 2.0;
    let sum_xx = (p - 1.0) * p * (2.0 * p - 1.0) / 6.0;
    let divisor = p * sum_xx - sum_x * sum_x;

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }

        let sum_y: f64 = window.iter().sum();
        let sum_xy: f64 = window
            .iter()
            .enumerate()
            .map(|(x, &y)| x as f64 * y)
            .sum();

        let slope = (p * sum_xy - sum_x * sum_y) / divisor;
        let intercept = (sum_y - slope * sum_x) / p;
        result[i] = intercept + slope * (p - 1.0);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn linreg_on_a_line_returns_the_line() {
        let values: Vec<f64> = (0..10).map(|i| 3.0 + 2.0 * i as f64).collect();
        let result = linreg_of_series(&values, 4);
        assert!(result[2].is_nan());
        for i in 3..10 {
            assert_approx(result[i], values[i], 1e-9);
        }
    }

    #[test]
    fn linreg_known_window() {
        // y = [1, 3, 2]: slope = 0.5, intercept = 1.5, endpoint = 2.5
        let result = linreg_of_series(&[1.0, 3.0, 2.0], 3);
        assert_approx(result[2], 2.5, DEFAULT_EPSILON);
    }

    #[test]
    fn linreg_constant_series() {
        let result = linreg_of_series(&[7.0; 6], 5);
        assert_approx(result[5], 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn linreg_nan_window() {
        let result = linreg_of_series(&[f64::NAN, 1.0, 2.0, 3.0], 3);
        assert!(result[2].is_nan());
        assert_approx(result[3], 3.0, 1e-9);
    }

    #[test]
    fn linreg_degenerate_periods() {
        assert!(linreg_of_series(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
        assert_eq!(linreg_of_series(&[1.0, 2.0], 1), vec![1.0, 2.0]);
    }
}
