//! Validation error aggregate

use crate::diagnostic::{Diagnostic, ViolationCode};

/// Every violation found while constructing one record
///
/// A record either validates fully or is rejected with the complete list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{record} failed validation with {} violation(s): {}", .violations.len(), summarize(.violations))]
pub struct ValidationError {
    record: String,
    violations: Vec<Diagnostic>,
}

impl ValidationError {
    pub fn new(record: impl Into<String>, violations: Vec<Diagnostic>) -> Self {
        Self {
            record: record.into(),
            violations,
        }
    }

    /// Name of the record type that was being constructed
    pub fn record(&self) -> &str {
        &self.record
    }

    pub fn violations(&self) -> &[Diagnostic] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Diagnostic> {
        self.violations
    }

    /// Check whether any violation carries the given code
    pub fn has_code(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    /// Codes reported for one field path
    pub fn codes_at(&self, path: &str) -> Vec<ViolationCode> {
        self.violations
            .iter()
            .filter(|v| v.path.as_str() == path)
            .map(|v| v.code)
            .collect()
    }

    /// Every violation message, joined with `; `
    pub fn detail(&self) -> String {
        summarize(&self.violations)
    }
}

fn summarize(violations: &[Diagnostic]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
