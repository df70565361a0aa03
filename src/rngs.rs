// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Linear congruential generator and sequence expansion.

use log::{debug, warn};
use serde::Serialize;

use crate::conditioning::normalize;
use crate::error::{LcgError, Result};
use crate::params::{GeneratorParams, PeriodWarning, Severity};

/// Stepping LCG: state = (multiplier * state + increment) mod modulus.
/// Products are taken in u128 so no u64 parameters can overflow.
#[derive(Debug, Copy, Clone)]
pub struct Lcg {
    state: u64,
    modulus: u64,
    multiplier: u64,
    increment: u64,
}

impl Lcg {
    pub fn new(params: &GeneratorParams) -> Self {
        Lcg {
            state: params.seed(),
            modulus: params.modulus(),
            multiplier: params.multiplier(),
            increment: params.increment(),
        }
    }

    /// Advance one step and return the new state.
    pub fn next_state(&mut self) -> u64 {
        let next = (self.multiplier as u128 * self.state as u128 + self.increment as u128)
            % self.modulus as u128;
        self.state = next as u64;
        self.state
    }

    /// Advance one step and return the normalized state.
    pub fn next_point(&mut self) -> GeneratedPoint {
        let state = self.next_state();
        GeneratedPoint {
            state,
            normalized: normalize(state, self.modulus),
        }
    }

    /// Advance the generator state by the specified amount of steps.
    pub fn advance(&mut self, delta: usize) {
        for _ in 0..delta {
            let _ = self.next_state();
        }
    }

    /// Reset to the given seed. The seed is reduced into 0..modulus.
    pub fn reseed(&mut self, seed: u64) {
        self.state = seed % self.modulus;
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

/// One recurrence step.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GeneratedPoint {
    pub state: u64,
    pub normalized: f64,
}

/// Points in generation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequence {
    points: Vec<GeneratedPoint>,
}

impl Sequence {
    pub fn points(&self) -> &[GeneratedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn states(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.state).collect()
    }

    pub fn normalized_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.normalized).collect()
    }

    /// (index, normalized) pairs with the index starting at 1, for plotting.
    pub fn chart_points(&self) -> Vec<(usize, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i + 1, p.normalized))
            .collect()
    }
}

impl From<Vec<GeneratedPoint>> for Sequence {
    fn from(points: Vec<GeneratedPoint>) -> Self {
        Sequence { points }
    }
}

/// Result of a successful `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated {
    pub sequence: Sequence,
    /// Violated full period conditions, only ever set in advisory mode.
    pub warning: Option<PeriodWarning>,
}

/// Expand `params` into `params.count()` points.
pub fn generate(params: &GeneratorParams, severity: Severity) -> Result<Generated> {
    let warning = params.period_warning();
    if let Some(w) = &warning {
        match severity {
            Severity::Strict => return Err(LcgError::PeriodConstraintViolation(w.clone())),
            Severity::Advisory => warn!("period not guaranteed to be full: {w}"),
        }
    }
    debug!(
        "generating {} values: m={} a={} c={} seed={}",
        params.count(),
        params.modulus(),
        params.multiplier(),
        params.increment(),
        params.seed()
    );
    let mut rng = Lcg::new(params);
    let points: Vec<GeneratedPoint> = (0..params.count()).map(|_| rng.next_point()).collect();
    Ok(Generated {
        sequence: Sequence::from(points),
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PeriodCondition;

    fn params(m: i64, a: i64, c: i64, seed: i64, n: i64) -> GeneratorParams {
        GeneratorParams::new(m, a, c, seed, n).unwrap()
    }

    #[test]
    fn test_known_sequence() {
        let generated = generate(&params(16, 5, 1, 1, 4), Severity::Strict).unwrap();
        assert_eq!(generated.warning, None);
        assert_eq!(generated.sequence.states(), vec![6, 15, 12, 13]);
        assert_eq!(
            generated.sequence.normalized_values(),
            vec![0.375, 0.9375, 0.75, 0.8125]
        );
    }

    #[test]
    fn test_seed_is_not_emitted() {
        let generated = generate(&params(16, 5, 1, 1, 1), Severity::Strict).unwrap();
        assert_eq!(generated.sequence.states(), vec![6]);
    }

    #[test]
    fn test_full_period_visits_every_state() {
        let generated = generate(&params(16, 5, 1, 1, 16), Severity::Strict).unwrap();
        let mut states = generated.sequence.states();
        states.sort_unstable();
        assert_eq!(states, (0..16).collect::<Vec<u64>>());
    }

    #[test]
    fn test_strict_rejects_violation() {
        let err = generate(&params(16, 7, 1, 1, 4), Severity::Strict).unwrap_err();
        match err {
            LcgError::PeriodConstraintViolation(w) => {
                assert_eq!(w.violations, vec![PeriodCondition::MultiplierNotOneModFour]);
                assert_eq!(w.suggestion.multiplier, 5);
                assert_eq!(w.suggestion.next_multiplier, 9);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_advisory_returns_sequence_and_warning() {
        let generated = generate(&params(16, 7, 2, 1, 4), Severity::Advisory).unwrap();
        assert_eq!(generated.sequence.len(), 4);
        let warning = generated.warning.unwrap();
        assert!(warning.violations.contains(&PeriodCondition::IncrementEven));
        assert!(warning.violations.contains(&PeriodCondition::MultiplierNotOneModFour));
    }

    #[test]
    fn test_large_parameters_do_not_overflow() {
        let m = i64::MAX;
        let generated = generate(&params(m, m - 1, m - 2, m - 3, 8), Severity::Advisory).unwrap();
        for point in generated.sequence.points() {
            assert!(point.state < m as u64);
            assert!(point.normalized < 1.0);
        }
    }

    #[test]
    fn test_advance_and_reseed() {
        let p = params(16, 5, 1, 1, 4);
        let mut rng = Lcg::new(&p);
        rng.advance(2);
        assert_eq!(rng.state(), 15);
        assert_eq!(rng.next_state(), 12);
        rng.reseed(17);
        assert_eq!(rng.state(), 1);
        assert_eq!(rng.next_state(), 6);
    }

    #[test]
    fn test_chart_points_are_one_indexed() {
        let generated = generate(&params(16, 5, 1, 1, 2), Severity::Strict).unwrap();
        assert_eq!(generated.sequence.chart_points(), vec![(1, 0.375), (2, 0.9375)]);
    }
}
