//! Violation codes and diagnostics
//!
//! IMPORTANT: Violation codes are versioned and stable.
//! NEVER rename or remove codes - API clients match on them.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Violation code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    // Structural violations
    /// A required field is absent from the input
    FieldMissing,

    /// A field value has the wrong JSON type or cannot be parsed
    FieldTypeMismatch,

    /// A field value fails a pattern, range, length or enum constraint
    FieldConstraintViolation,

    /// A field is not declared by a closed record
    FieldUnknown,

    // Advisory checks (never reject a record on their own)
    /// The minimum expected salary exceeds the maximum
    SalaryRangeInverted,

    /// A history entry ends before it starts
    DateRangeInverted,
}

impl ViolationCode {
    /// Get the violation code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FieldMissing => "FIELD_MISSING",
            Self::FieldTypeMismatch => "FIELD_TYPE_MISMATCH",
            Self::FieldConstraintViolation => "FIELD_CONSTRAINT_VIOLATION",
            Self::FieldUnknown => "FIELD_UNKNOWN",
            Self::SalaryRangeInverted => "SALARY_RANGE_INVERTED",
            Self::DateRangeInverted => "DATE_RANGE_INVERTED",
        }
    }

    /// Whether this code comes from structural validation (as opposed to an advisory check)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::FieldMissing
                | Self::FieldTypeMismatch
                | Self::FieldConstraintViolation
                | Self::FieldUnknown
        )
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but does not reject the document
    Warn,

    /// Error - the document is rejected
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Path of a field inside a document, e.g. `education_experience[1].start_date`
///
/// The empty path denotes the document itself and displays as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The document root
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path of a named field below this one
    pub fn child(&self, field: &str) -> Self {
        if self.0.is_empty() {
            Self(field.to_string())
        } else {
            Self(format!("{}.{}", self.0, field))
        }
    }

    /// Path of a list element below this one
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        if self.0.is_empty() {
            "$"
        } else {
            &self.0
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable violation code
    pub code: ViolationCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Offending field
    pub path: FieldPath,

    /// Document the field belongs to (file name or request id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    /// Expected value or rule
    pub expected: Option<String>,

    /// Actual value
    pub actual: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(
        code: ViolationCode,
        severity: Severity,
        path: FieldPath,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            path,
            document: None,
            expected: None,
            actual: None,
        }
    }

    /// Set the owning document
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Set the expected value only
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Override the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Name of the JSON type of a value, as used in type mismatch messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accumulates every violation found while reading a document
///
/// Readers never stop at the first problem; they record it here and move on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Violations {
    diagnostics: Vec<Diagnostic>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record a required field that is absent
    pub fn missing(&mut self, path: FieldPath) {
        let message = format!("Field '{}' is required", path);
        self.push(Diagnostic::new(
            ViolationCode::FieldMissing,
            Severity::Error,
            path,
            message,
        ));
    }

    /// Record a value of the wrong type
    pub fn type_mismatch(&mut self, path: FieldPath, expected: &str, actual: &Value) {
        let actual_type = json_type_name(actual);
        let message = format!("Field '{}' must be {}, got {}", path, expected, actual_type);
        self.push(
            Diagnostic::new(ViolationCode::FieldTypeMismatch, Severity::Error, path, message)
                .with_comparison(expected, actual_type),
        );
    }

    /// Record a value that has the right type but breaks a declared rule
    pub fn constraint(&mut self, path: FieldPath, rule: impl Into<String>, actual: &Value) {
        let rule = rule.into();
        let message = format!("Field '{}' {}", path, rule);
        self.push(
            Diagnostic::new(
                ViolationCode::FieldConstraintViolation,
                Severity::Error,
                path,
                message,
            )
            .with_comparison(rule, actual.to_string()),
        );
    }

    /// Record a field a closed record does not declare
    pub fn unknown(&mut self, path: FieldPath, record: &str) {
        let message = format!("Field '{}' is not declared by {}", path, record);
        self.push(Diagnostic::new(
            ViolationCode::FieldUnknown,
            Severity::Error,
            path,
            message,
        ));
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
