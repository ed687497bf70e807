//! The error type used throughout the crate.
//!
//! Failures are reported through return values only; nothing in the
//! query path panics. Errors carry a coarse [`ErrorKind`] plus a static
//! message, which keeps the type `Copy` and allocation-free.

use core::fmt;

/// The kind of error produced by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A catch-all for failures without a more specific kind.
    Generic,
    /// A value fell outside the supported range, e.g. a query year
    /// beyond the zone database's declared window.
    Range,
    /// An internal invariant did not hold.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => f.write_str("GenericError"),
            Self::Range => f.write_str("RangeError"),
            Self::Assert => f.write_str("AssertError"),
        }
    }
}

/// The error returned by every fallible resolver operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneError {
    kind: ErrorKind,
    message: &'static str,
}

impl TimezoneError {
    const fn new(kind: ErrorKind) -> Self {
        Self { kind, message: "" }
    }

    /// Create a generic error.
    #[must_use]
    pub const fn general(message: &'static str) -> Self {
        Self::new(ErrorKind::Generic).with_message(message)
    }

    /// Create a range error.
    #[must_use]
    pub const fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Create an assertion error for a violated internal invariant.
    #[must_use]
    pub const fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Attach a message to this error.
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = message;
        self
    }

    /// The kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The message attached to this error, possibly empty.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for TimezoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl core::error::Error for TimezoneError {}
