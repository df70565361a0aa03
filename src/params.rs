// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Generator parameters, full period (Hull-Dobell) checks
//! and the advisory helpers applied before generation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{LcgError, Result};
use crate::utils;

/// Requests above this count should be confirmed by the caller.
pub const LARGE_COUNT_THRESHOLD: usize = 100;

const DEFAULT_MODULUS: u64 = 100;
const DEFAULT_MULTIPLIER: u64 = 19;
const DEFAULT_INCREMENT: u64 = 33;
const DEFAULT_SEED: u64 = 37;
const DEFAULT_COUNT: usize = 10;

/// Validated parameters of a linear congruential recurrence.
/// Fields are private so a constructed value always satisfies
/// modulus > 1, seed < modulus and count >= 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorParams {
    modulus: u64,
    multiplier: u64,
    increment: u64,
    seed: u64,
    count: usize,
}

impl GeneratorParams {
    /// Takes signed integers so that negative input is rejected instead of wrapped.
    pub fn new(modulus: i64, multiplier: i64, increment: i64, seed: i64, count: i64) -> Result<Self> {
        let modulus = non_negative("modulus", modulus)?;
        if modulus <= 1 {
            return Err(LcgError::invalid(
                "modulus",
                format!("must be greater than 1, got {modulus}"),
            ));
        }
        let multiplier = non_negative("multiplier", multiplier)?;
        let increment = non_negative("increment", increment)?;
        if seed < 0 || seed as u64 >= modulus {
            return Err(LcgError::invalid(
                "seed",
                format!("must satisfy 0 <= seed < {modulus}, got {seed}"),
            ));
        }
        if count <= 0 {
            return Err(LcgError::invalid(
                "count",
                format!("must be at least 1, got {count}"),
            ));
        }
        let count = usize::try_from(count)
            .map_err(|_| LcgError::invalid("count", format!("{count} does not fit in memory")))?;
        Ok(GeneratorParams {
            modulus,
            multiplier,
            increment,
            seed: seed as u64,
            count,
        })
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    pub fn increment(&self) -> u64 {
        self.increment
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Check the Hull-Dobell conditions.
    /// Returns `None` when the recurrence is guaranteed a full period.
    pub fn period_warning(&self) -> Option<PeriodWarning> {
        let mut violations = vec![];
        if self.increment % 2 == 0 {
            violations.push(PeriodCondition::IncrementEven);
        }
        if utils::gcd(self.increment, self.modulus) != 1 {
            violations.push(PeriodCondition::IncrementNotCoprime);
        }
        if self.multiplier % 4 != 1 {
            violations.push(PeriodCondition::MultiplierNotOneModFour);
        }
        if violations.is_empty() {
            None
        } else {
            Some(PeriodWarning {
                violations,
                suggestion: PeriodSuggestion::for_params(self),
            })
        }
    }
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            modulus: DEFAULT_MODULUS,
            multiplier: DEFAULT_MULTIPLIER,
            increment: DEFAULT_INCREMENT,
            seed: DEFAULT_SEED,
            count: DEFAULT_COUNT,
        }
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| LcgError::invalid(name, format!("must be non-negative, got {value}")))
}

/// How violated full period conditions are treated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Violations abort generation.
    Strict,
    /// Violations are reported next to the generated sequence.
    Advisory,
}

impl FromStr for Severity {
    type Err = LcgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Severity::Strict),
            "advisory" => Ok(Severity::Advisory),
            other => Err(LcgError::invalid(
                "severity",
                format!("expected `strict` or `advisory`, got `{other}`"),
            )),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodCondition {
    IncrementEven,
    IncrementNotCoprime,
    MultiplierNotOneModFour,
}

impl fmt::Display for PeriodCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PeriodCondition::IncrementEven => "increment must be odd",
            PeriodCondition::IncrementNotCoprime => "increment must be coprime with the modulus",
            PeriodCondition::MultiplierNotOneModFour => "multiplier must be 1 mod 4",
        };
        f.write_str(text)
    }
}

/// Corrected values that satisfy the violated conditions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSuggestion {
    /// 1 + 4 * floor((multiplier - 1) / 4), at least 1.
    pub multiplier: u64,
    /// The following candidate, `multiplier + 4`.
    pub next_multiplier: u64,
    /// Smallest odd increment >= the requested one that is coprime with the modulus.
    pub increment: u64,
}

impl PeriodSuggestion {
    fn for_params(params: &GeneratorParams) -> Self {
        let multiplier = if params.multiplier == 0 {
            1
        } else {
            1 + 4 * ((params.multiplier - 1) / 4)
        };
        PeriodSuggestion {
            multiplier,
            next_multiplier: multiplier.saturating_add(4),
            increment: coprime_increment(params.increment, params.modulus),
        }
    }
}

fn coprime_increment(increment: u64, modulus: u64) -> u64 {
    let mut candidate = increment | 1;
    // 1 is always coprime, so wrap around instead of overflowing.
    while utils::gcd(candidate, modulus) != 1 {
        candidate = match candidate.checked_add(2) {
            Some(next) => next,
            None => return 1,
        };
    }
    candidate
}

/// Non fatal report of violated full period conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodWarning {
    pub violations: Vec<PeriodCondition>,
    pub suggestion: PeriodSuggestion,
}

impl fmt::Display for PeriodWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conditions: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(
            f,
            "{} (try multiplier {} or {}, increment {})",
            conditions.join("; "),
            self.suggestion.multiplier,
            self.suggestion.next_multiplier,
            self.suggestion.increment
        )
    }
}

/// Parse a user supplied integer. Accepts an optional leading '-' and digits only.
pub fn parse_integer(name: &'static str, text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LcgError::invalid(
            name,
            format!("`{text}` is not an integer"),
        ));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| LcgError::invalid(name, format!("`{text}` is out of range")))
}

/// Whether a request for `count` values should be confirmed first.
pub fn needs_confirmation(count: usize, threshold: usize) -> bool {
    count > threshold
}

/// Smallest power of two able to hold `count` distinct states.
/// Fails when that power does not fit in an `i64` modulus.
pub fn suggest_modulus(count: usize) -> Result<u64> {
    u64::try_from(count.max(2))
        .ok()
        .and_then(u64::checked_next_power_of_two)
        .filter(|&m| m <= i64::MAX as u64)
        .ok_or_else(|| {
            LcgError::invalid("count", format!("no power of two modulus can hold {count} values"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_params() {
        let params = GeneratorParams::new(16, 5, 1, 1, 4).unwrap();
        assert_eq!(params.modulus(), 16);
        assert_eq!(params.count(), 4);
        assert_eq!(params.period_warning(), None);
    }

    #[test]
    fn test_rejects_small_modulus() {
        for m in [-3, 0, 1] {
            let err = GeneratorParams::new(m, 5, 1, 0, 4).unwrap_err();
            assert!(matches!(err, LcgError::InvalidParameter { name: "modulus", .. }));
        }
    }

    #[test]
    fn test_rejects_seed_out_of_range() {
        let err = GeneratorParams::new(16, 5, 1, 16, 4).unwrap_err();
        assert!(matches!(err, LcgError::InvalidParameter { name: "seed", .. }));
        let err = GeneratorParams::new(16, 5, 1, -1, 4).unwrap_err();
        assert!(matches!(err, LcgError::InvalidParameter { name: "seed", .. }));
    }

    #[test]
    fn test_rejects_non_positive_count() {
        for n in [0, -5] {
            let err = GeneratorParams::new(16, 5, 1, 0, n).unwrap_err();
            assert!(matches!(err, LcgError::InvalidParameter { name: "count", .. }));
        }
    }

    #[test]
    fn test_rejects_negative_coefficients() {
        let err = GeneratorParams::new(16, -5, 1, 0, 4).unwrap_err();
        assert!(matches!(err, LcgError::InvalidParameter { name: "multiplier", .. }));
        let err = GeneratorParams::new(16, 5, -1, 0, 4).unwrap_err();
        assert!(matches!(err, LcgError::InvalidParameter { name: "increment", .. }));
    }

    #[test]
    fn test_default_matches_reset_values() {
        let params = GeneratorParams::default();
        assert_eq!(params, GeneratorParams::new(100, 19, 33, 37, 10).unwrap());
    }

    #[test]
    fn test_period_warning_lists_every_violation() {
        let params = GeneratorParams::new(16, 7, 4, 0, 4).unwrap();
        let warning = params.period_warning().unwrap();
        assert_eq!(
            warning.violations,
            vec![
                PeriodCondition::IncrementEven,
                PeriodCondition::IncrementNotCoprime,
                PeriodCondition::MultiplierNotOneModFour,
            ]
        );
        assert_eq!(warning.suggestion.multiplier, 5);
        assert_eq!(warning.suggestion.next_multiplier, 9);
        assert_eq!(warning.suggestion.increment, 5);
    }

    #[test]
    fn test_coprime_but_odd_check_is_separate() {
        // 15 is odd but shares a factor with 30.
        let params = GeneratorParams::new(30, 13, 15, 0, 4).unwrap();
        let warning = params.period_warning().unwrap();
        assert_eq!(warning.violations, vec![PeriodCondition::IncrementNotCoprime]);
        assert_eq!(warning.suggestion.increment, 17);
    }

    #[test]
    fn test_zero_multiplier_suggestion() {
        let params = GeneratorParams::new(16, 0, 1, 0, 4).unwrap();
        let warning = params.period_warning().unwrap();
        assert_eq!(warning.suggestion.multiplier, 1);
        assert_eq!(warning.suggestion.next_multiplier, 5);
    }

    #[test]
    fn test_default_params_violate_multiplier_rule() {
        let warning = GeneratorParams::default().period_warning().unwrap();
        assert_eq!(warning.violations, vec![PeriodCondition::MultiplierNotOneModFour]);
        assert_eq!(warning.suggestion.multiplier, 17);
        assert_eq!(warning.suggestion.next_multiplier, 21);
        assert!(warning.to_string().contains("multiplier must be 1 mod 4"));
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("strict".parse::<Severity>().unwrap(), Severity::Strict);
        assert_eq!(" Advisory ".parse::<Severity>().unwrap(), Severity::Advisory);
        assert!("lenient".parse::<Severity>().is_err());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("m", " 42 ").unwrap(), 42);
        assert_eq!(parse_integer("m", "-7").unwrap(), -7);
        for bad in ["", "-", "4.2", "1e3", "+3", "abc", "12a"] {
            assert!(parse_integer("m", bad).is_err(), "accepted {bad:?}");
        }
        assert!(parse_integer("m", "99999999999999999999").is_err());
    }

    #[test]
    fn test_needs_confirmation() {
        assert!(!needs_confirmation(100, LARGE_COUNT_THRESHOLD));
        assert!(needs_confirmation(101, LARGE_COUNT_THRESHOLD));
    }

    #[test]
    fn test_suggest_modulus() {
        assert_eq!(suggest_modulus(0).unwrap(), 2);
        assert_eq!(suggest_modulus(1).unwrap(), 2);
        assert_eq!(suggest_modulus(10).unwrap(), 16);
        assert_eq!(suggest_modulus(64).unwrap(), 64);
        assert_eq!(suggest_modulus(65).unwrap(), 128);
        assert_eq!(suggest_modulus(1 << 62).unwrap(), 1 << 62);
    }

    #[test]
    fn test_suggest_modulus_overflow() {
        for count in [usize::MAX, (1usize << 62) + 1, i64::MAX as usize] {
            let err = suggest_modulus(count).unwrap_err();
            assert!(matches!(err, LcgError::InvalidParameter { name: "count", .. }));
        }
    }
}
