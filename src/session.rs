// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Caller side state: current parameters and the most recent run.

use serde::Serialize;

use crate::error::Result;
use crate::params::{GeneratorParams, Severity};
use crate::rng_testing::{validate, ValidationReport};
use crate::rngs::{generate, Generated};

/// A generated sequence together with its validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub params: GeneratorParams,
    pub severity: Severity,
    pub generated: Generated,
    pub report: ValidationReport,
}

/// Owns the parameters and a single slot cache of the last run.
#[derive(Debug, Clone)]
pub struct Session {
    params: GeneratorParams,
    severity: Severity,
    last: Option<Run>,
}

impl Session {
    pub fn new(params: GeneratorParams, severity: Severity) -> Self {
        Session {
            params,
            severity,
            last: None,
        }
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    pub fn set_params(&mut self, params: GeneratorParams) {
        self.params = params;
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
    }

    /// Generate and validate with the current parameters.
    /// On error the previous run stays cached.
    pub fn run(&mut self) -> Result<&Run> {
        let generated = generate(&self.params, self.severity)?;
        let report = validate(&generated.sequence);
        Ok(self.last.insert(Run {
            params: self.params,
            severity: self.severity,
            generated,
            report,
        }))
    }

    /// Validate the cached sequence again. `None` when nothing was generated yet.
    pub fn revalidate(&mut self) -> Option<&ValidationReport> {
        let run = self.last.as_mut()?;
        run.report = validate(&run.generated.sequence);
        Some(&run.report)
    }

    pub fn last(&self) -> Option<&Run> {
        self.last.as_ref()
    }

    /// Restore default parameters and drop the cached run.
    pub fn reset(&mut self) {
        self.params = GeneratorParams::default();
        self.last = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(GeneratorParams::default(), Severity::Advisory)
    }
}
