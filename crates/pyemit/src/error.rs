//! Errors with declaration-processing context.
//!
//! Structural invariants panic at construction; everything that can go
//! wrong across module boundaries (missing name records, missing
//! programs) flows back as an [`EmitError`], and each processing layer
//! wraps it with the declaration or module it was working on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An emission failure, carrying the chain of contexts it bubbled
/// through, innermost last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitError {
    message: String,
    context: Vec<String>,
}

impl EmitError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), context: Vec::new() }
    }

    /// Wraps the error with one more layer of "what was being processed".
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in self.context.iter().rev() {
            write!(f, "in {ctx}: ")?;
        }
        f.write_str(&self.message)
    }
}

impl std::error::Error for EmitError {}
