// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Validation battery over a generated sequence.

use log::debug;
use serde::Serialize;

use crate::rngs::Sequence;
use crate::stats::{self, TestKind, TestOutcome};
use crate::strings;

/// Outcomes of all four tests. `all_passed` is their conjunction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub independence: TestOutcome,
    pub uniformity: TestOutcome,
    pub mean: TestOutcome,
    pub variance: TestOutcome,
    pub all_passed: bool,
}

impl ValidationReport {
    /// Outcomes in the fixed order independence, uniformity, mean, variance.
    pub fn outcomes(&self) -> [&TestOutcome; 4] {
        [
            &self.independence,
            &self.uniformity,
            &self.mean,
            &self.variance,
        ]
    }

    pub fn outcome(&self, kind: TestKind) -> &TestOutcome {
        match kind {
            TestKind::Independence => &self.independence,
            TestKind::Uniformity => &self.uniformity,
            TestKind::Mean => &self.mean,
            TestKind::Variance => &self.variance,
        }
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes().iter().filter(|o| o.passed).count()
    }

    /// Per test lines followed by the overall verdict.
    pub fn format(&self) -> String {
        let lines: Vec<String> = self.outcomes().iter().map(|o| o.format()).collect();
        format!(
            "{}\nOverall result: {}          ( {} / 4 passed)",
            lines.join("\n"),
            strings::pass_fail(self.all_passed),
            self.passed_count()
        )
    }
}

/// Run the battery on the normalized values of `sequence`.
pub fn validate(sequence: &Sequence) -> ValidationReport {
    validate_values(&sequence.normalized_values())
}

/// Run the battery on raw values in [0, 1).
/// The tests never short circuit each other.
pub fn validate_values(values: &[f64]) -> ValidationReport {
    let independence = stats::independence_test(values);
    let uniformity = stats::uniformity_test(values);
    let mean = stats::mean_test(values);
    let variance = stats::variance_test(values);
    for outcome in [&independence, &uniformity, &mean, &variance] {
        debug!("{}", outcome.format());
    }
    let all_passed = independence.passed && uniformity.passed && mean.passed && variance.passed;
    ValidationReport {
        independence,
        uniformity,
        mean,
        variance,
        all_passed,
    }
}
