//! Decoding errors

use std::fmt;
use thiserror::Error;

/// Kind of a decoding failure
///
/// Every kind aborts the message being decoded: there is no recovery or
/// resynchronization inside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// Tag octets violate the encoding rules (e.g. tag number overflow)
    #[error("malformed tag")]
    MalformedTag,
    /// Length octets are invalid, indefinite, or too large
    #[error("malformed length")]
    MalformedLength,
    /// No transition exists for the observed tag in the current state
    #[error("unexpected tag")]
    UnexpectedTag,
    /// A zero-length value where the field requires content
    #[error("empty value not allowed")]
    EmptyValueNotAllowed,
    /// The value bytes were not materialized when the action needed them
    #[error("missing value bytes")]
    MissingValueBytes,
    /// Children of a constructed value under- or overrun its declared length
    #[error("nesting budget violation")]
    NestingBudgetViolation,
    /// Field-specific validation failed
    #[error("semantic validation failed")]
    SemanticValidationFailed,
    /// Too many nested constructed values
    #[error("nesting depth exceeded")]
    NestingDepthExceeded,
    /// A constructed value ended before all its required fields were seen
    #[error("incomplete structure")]
    IncompleteStructure,
    /// A declared length exceeds the configured limits
    #[error("length limit exceeded")]
    LengthLimitExceeded,
    /// Input ended in the middle of a message
    #[error("incomplete input")]
    Incomplete,
    /// The container already completed or failed
    #[error("container already finished")]
    ContainerFinished,
}

/// A decoding error: the kind, where it happened, and optional context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    offset: Option<usize>,
    context: Option<String>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(offset) = self.offset {
            write!(f, " at offset {}", offset)?;
        }
        if let Some(ref context) = self.context {
            write!(f, ": {}", context)?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind) -> Self {
        DecodeError {
            kind,
            offset: None,
            context: None,
        }
    }

    /// Attach a human-readable context (field name, offending tag, ...)
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Prefix the context with the description of the field being decoded
    pub fn in_field(mut self, field: &str) -> Self {
        self.context = Some(match self.context.take() {
            Some(context) => format!("{}: {}", field, context),
            None => field.to_owned(),
        });
        self
    }

    /// Set the absolute input offset of the TLV being decoded
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        DecodeError::new(kind)
    }
}
