#![allow(dead_code)]

/// Closed-form decay rate in 1/s with current constants.
pub const REFERENCE_RATE: f64 = 7.604234857331056e-4;

pub fn assert_relative_close(actual: f64, expected: f64, tolerance: f64) {
    let error = ((actual - expected) / expected).abs();
    assert!(
        error <= tolerance,
        "|{actual} - {expected}| / |{expected}| = {error} exceeds tolerance {tolerance}"
    );
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sample_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() as f64 - 1.0)
}
