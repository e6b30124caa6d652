//! resumeschema core
//!
//! Stable violation codes, the field reader that validates untyped JSON,
//! shared constraint rules, reports and configuration.
//! Never rename violation codes - they are part of the public API.

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod record;
pub mod report;
pub mod rules;

pub use config::{Config, ConfigError, NullPolicy, SeverityThreshold, UpdateConfig};
pub use diagnostic::{Diagnostic, FieldPath, Severity, ViolationCode, Violations};
pub use error::ValidationError;
pub use record::{ExtraFields, FieldReader, FieldValue, Labeled, Patch, Record, DATE_FORMAT};
pub use report::{Report, ReportSummary, ReportVersion};
pub use rules::{Check, IntRange, Pattern};
