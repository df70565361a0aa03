// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Misc utility functions.

use std::time::Duration;

pub const INV_ROOT2: f64 = 0.7071067811865475;

/// Greatest common divisor, `gcd(0, b) == b`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Arithmetic mean. Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of squared deviations from `center`.
pub fn sum_of_squares(values: &[f64], center: f64) -> f64 {
    values.iter().map(|u| (u - center).powi(2)).sum()
}

/// Format a duration into a pretty String.
/// e.g. 1500 µs is 1.50 ms
pub fn format_elapsed_time(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 60.0 {
        format!("{}m {:.2}s", (secs / 60.0).floor(), secs % 60.0)
    } else if secs >= 1.0 {
        format!("{:.2} s", secs)
    } else if secs >= 1e-3 {
        format!("{:.2} ms", secs * 1e3)
    } else {
        format!("{:.2} µs", secs * 1e6)
    }
}
