// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! User interaction strings are stored here.

pub const FAIL_STR: &str = "FAILED!!";
pub const PASS_STR: &str = "PASSED";
pub const WARN_STR: &str = "WARNING:";

pub const TEST_NAMES: [&str; 4] = ["Independence", "Uniformity", "Mean", "Variance"];

pub const INSUFFICIENT_DATA: &str = "insufficient data";
pub const ZERO_VARIANCE: &str = "zero variance: all values are identical";

pub fn pass_fail(passed: bool) -> &'static str {
    if passed {
        PASS_STR
    } else {
        FAIL_STR
    }
}
