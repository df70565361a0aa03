// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Linear congruential sequence generation and
//! statistical validation of its output against Uniform(0, 1).

pub mod conditioning;
pub mod error;
pub mod params;
pub mod rng_testing;
pub mod rngs;
pub mod session;
pub mod stats;
pub mod strings;
pub mod utils;

pub use error::{LcgError, Result};
pub use params::{GeneratorParams, PeriodCondition, PeriodSuggestion, PeriodWarning, Severity};
pub use rng_testing::{validate, validate_values, ValidationReport};
pub use rngs::{generate, GeneratedPoint, Generated, Lcg, Sequence};
pub use session::{Run, Session};
pub use stats::{TestKind, TestOutcome};
