// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Methods to turn raw generator states into the unit interval.

/// Largest f64 strictly below 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Maps a state in 0..modulus to the half open range [0, 1) as state / modulus.
/// For moduli above 2**53 the division can round up to 1.0,
/// those results are pulled back below one.
pub fn normalize(state: u64, modulus: u64) -> f64 {
    debug_assert!(state < modulus);
    let u = state as f64 / modulus as f64;
    if u < 1.0 {
        u
    } else {
        BELOW_ONE
    }
}
