//! Structured error types shared across the tropical moduli crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`TropError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, counts, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the tropical moduli engine.
///
/// Every variant corresponds to a caller-facing failure class. None of these
/// are retried internally: they signal violated preconditions or malformed
/// input, never transient conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum TropError {
    /// An identifier issued by one graph was used against another.
    #[error("foreign reference: {0}")]
    ForeignReference(ErrorInfo),
    /// A removal precondition was violated (incident edges or legs remain).
    #[error("dangling edge: {0}")]
    DanglingEdge(ErrorInfo),
    /// A leg marking label is already present in the graph.
    #[error("invalid label: {0}")]
    InvalidLabel(ErrorInfo),
    /// Genus bookkeeping or another structural invariant is inconsistent.
    #[error("invariant violation: {0}")]
    InvariantViolation(ErrorInfo),
    /// Persisted data references unknown entities or breaks the genus rule.
    #[error("malformed data: {0}")]
    MalformedData(ErrorInfo),
    /// Serialization or schema failure.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl TropError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            TropError::ForeignReference(info)
            | TropError::DanglingEdge(info)
            | TropError::InvalidLabel(info)
            | TropError::InvariantViolation(info)
            | TropError::MalformedData(info)
            | TropError::Serde(info) => info,
        }
    }
}
