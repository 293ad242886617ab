//! Schema validation errors.

use std::fmt;

use trellis_foundation::Error;

/// Validation failure for a schema document.
///
/// Validation never stops at the first problem; every violation found in
/// the document is collected and reported together, one line each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    violations: Vec<String>,
}

impl SchemaError {
    /// Creates an error from collected violations.
    ///
    /// Callers are expected to pass a non-empty list; an empty list still
    /// renders, as zero violations.
    #[must_use]
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }

    /// Creates an error carrying a single violation.
    #[must_use]
    pub fn single(violation: impl Into<String>) -> Self {
        Self {
            violations: vec![violation.into()],
        }
    }

    /// The individual violations, in report order.
    #[must_use]
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Number of violations in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True if the report carries no violations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} schema violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::schema(err.to_string())
    }
}
