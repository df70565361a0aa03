// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Statistical tests of normalized values against Uniform(0, 1).
//! Every test is a pure function of the values and never fails hard:
//! degenerate input yields a failed `TestOutcome`.

use std::collections::BTreeMap;

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::{strings, utils};

/// Two sided 95% critical value of the standard normal.
pub const Z_CRITICAL: f64 = 1.96;
/// Significance level of the uniformity test.
pub const KS_ALPHA: f64 = 0.05;

const KS_MAX_TERMS: usize = 100;
const KS_TERM_EPSILON: f64 = 1e-8;
const UNIFORM_MEAN: f64 = 0.5;
const UNIFORM_VARIANCE: f64 = 1.0 / 12.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Independence,
    Uniformity,
    Mean,
    Variance,
}

impl TestKind {
    pub const ALL: [TestKind; 4] = [
        TestKind::Independence,
        TestKind::Uniformity,
        TestKind::Mean,
        TestKind::Variance,
    ];

    pub fn name(&self) -> &'static str {
        strings::TEST_NAMES[*self as usize]
    }

    /// Run the test this kind stands for.
    pub fn run(&self, values: &[f64]) -> TestOutcome {
        match self {
            TestKind::Independence => independence_test(values),
            TestKind::Uniformity => uniformity_test(values),
            TestKind::Mean => mean_test(values),
            TestKind::Variance => variance_test(values),
        }
    }
}

/// Verdict of a single test together with the statistics behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    pub test: TestKind,
    pub passed: bool,
    pub statistics: BTreeMap<&'static str, f64>,
    pub message: String,
}

impl TestOutcome {
    pub fn statistic(&self, name: &str) -> Option<f64> {
        self.statistics.get(name).copied()
    }

    /// Line for terminal output.
    pub fn format(&self) -> String {
        format!(
            "{:<13}: {:<60} - {}",
            self.test.name(),
            self.message,
            strings::pass_fail(self.passed)
        )
    }

    fn insufficient(test: TestKind) -> Self {
        TestOutcome {
            test,
            passed: false,
            statistics: BTreeMap::new(),
            message: strings::INSUFFICIENT_DATA.to_owned(),
        }
    }
}

/// Lag-1 autocorrelation.
/// Passes when |r| <= 1.96 / sqrt(n).
pub fn independence_test(values: &[f64]) -> TestOutcome {
    let test = TestKind::Independence;
    let n = values.len();
    if n < 2 {
        return TestOutcome::insufficient(test);
    }
    let threshold = Z_CRITICAL / (n as f64).sqrt();
    let mean = utils::mean(values);
    let denominator = utils::sum_of_squares(values, mean);
    // The computed mean of identical values can be off by an ulp,
    // so compare the values themselves rather than trust the denominator.
    if denominator == 0.0 || values.iter().all(|&u| u == values[0]) {
        return TestOutcome {
            test,
            passed: false,
            statistics: BTreeMap::from([("threshold", threshold)]),
            message: strings::ZERO_VARIANCE.to_owned(),
        };
    }
    let numerator: f64 = values
        .windows(2)
        .map(|w| (w[0] - mean) * (w[1] - mean))
        .sum();
    let r = (numerator / denominator).clamp(-1.0, 1.0);
    TestOutcome {
        test,
        passed: r.abs() <= threshold,
        statistics: BTreeMap::from([("r", r), ("threshold", threshold)]),
        message: format!("r = {r:.4}, |r| must be <= {threshold:.4}"),
    }
}

/// Kolmogorov distribution tail: 2 * sum (-1)^(j-1) exp(-2 j^2 lambda^2), clamped to [0, 1].
pub fn kolmogorov_p_value(lambda: f64) -> f64 {
    let mut p = 0.0;
    let mut sign = 1.0;
    for j in 1..=KS_MAX_TERMS {
        let j = j as f64;
        let term = 2.0 * sign * (-2.0 * j * j * lambda * lambda).exp();
        p += term;
        if term.abs() < KS_TERM_EPSILON {
            break;
        }
        sign = -sign;
    }
    p.clamp(0.0, 1.0)
}

/// One sample Kolmogorov-Smirnov test against Uniform(0, 1).
/// Passes when p >= 0.05.
pub fn uniformity_test(values: &[f64]) -> TestOutcome {
    let test = TestKind::Uniformity;
    let n = values.len();
    if n < 2 {
        return TestOutcome::insufficient(test);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let nf = n as f64;
    let mut d_plus = f64::NEG_INFINITY;
    let mut d_minus = f64::NEG_INFINITY;
    for (i, &u) in sorted.iter().enumerate() {
        // One indexed rank is i + 1.
        d_plus = d_plus.max((i + 1) as f64 / nf - u);
        d_minus = d_minus.max(u - i as f64 / nf);
    }
    let d = d_plus.max(d_minus).clamp(0.0, 1.0);
    let root_n = nf.sqrt();
    let lambda = (root_n + 0.12 + 0.11 / root_n) * d;
    let p = kolmogorov_p_value(lambda);
    TestOutcome {
        test,
        passed: p >= KS_ALPHA,
        statistics: BTreeMap::from([
            ("d_plus", d_plus),
            ("d_minus", d_minus),
            ("d", d),
            ("lambda", lambda),
            ("p_value", p),
        ]),
        message: format!("D = {d:.4}, p = {p:.4}, p must be >= {KS_ALPHA}"),
    }
}

/// z-test of the sample mean against 1/2 with variance 1 / (12 n).
/// Passes when |z| <= 1.96.
pub fn mean_test(values: &[f64]) -> TestOutcome {
    let test = TestKind::Mean;
    let n = values.len();
    if n < 2 {
        return TestOutcome::insufficient(test);
    }
    let mean = utils::mean(values);
    let variance_of_mean = UNIFORM_VARIANCE / n as f64;
    let z = (mean - UNIFORM_MEAN) / variance_of_mean.sqrt();
    let p = statrs::function::erf::erfc(z.abs() * utils::INV_ROOT2);
    TestOutcome {
        test,
        passed: z.abs() <= Z_CRITICAL,
        statistics: BTreeMap::from([("mean", mean), ("z", z), ("p_value", p)]),
        message: format!("mean = {mean:.4}, z = {z:.4}, |z| must be <= {Z_CRITICAL}"),
    }
}

/// Chi squared bounds for the normal approximation with n - 1 degrees of freedom.
/// `None` below two values.
pub fn chi_squared_bounds(n: usize) -> Option<(f64, f64)> {
    if n < 2 {
        return None;
    }
    let df = (n - 1) as f64;
    let spread = Z_CRITICAL / (2.0 * df).sqrt();
    Some(((df * (1.0 - spread)).max(0.0), df * (1.0 + spread)))
}

/// Two sided p value from the exact chi squared distribution, informational only.
fn chi_squared_p_value(df: f64, chi_squared: f64) -> Option<f64> {
    let dist = ChiSquared::new(df).ok()?;
    let cdf = dist.cdf(chi_squared);
    Some((2.0 * cdf.min(1.0 - cdf)).clamp(0.0, 1.0))
}

/// Sample variance against 1/12.
/// Passes when the chi squared statistic lies within the approximate 95% bounds.
pub fn variance_test(values: &[f64]) -> TestOutcome {
    let test = TestKind::Variance;
    let n = values.len();
    let Some((lower, upper)) = chi_squared_bounds(n) else {
        return TestOutcome::insufficient(test);
    };
    let df = (n - 1) as f64;
    let mean = utils::mean(values);
    let sample_variance = utils::sum_of_squares(values, mean) / df;
    let chi_squared = df * sample_variance / UNIFORM_VARIANCE;
    let mut statistics = BTreeMap::from([
        ("sample_variance", sample_variance),
        ("chi_squared", chi_squared),
        ("lower", lower),
        ("upper", upper),
    ]);
    if let Some(p) = chi_squared_p_value(df, chi_squared) {
        statistics.insert("p_value", p);
    }
    TestOutcome {
        test,
        passed: lower <= chi_squared && chi_squared <= upper,
        statistics,
        message: format!(
            "s2 = {sample_variance:.4}, chi2 = {chi_squared:.4}, bounds [{lower:.4}, {upper:.4}]"
        ),
    }
}
