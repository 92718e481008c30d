//! Reader errors.
//!
//! Every failure aborts the whole parse. Positions are reported as the
//! 1-based line number plus the unparsed remainder of that line.

use std::error::Error;
use std::io;

use crate::BuildError;

/// Malformed character sequences.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("unexpected character '{}'", .0.escape_debug())]
    UnexpectedChar(char),

    /// The line ended where a name was expected.
    #[error("unexpected end of line")]
    UnexpectedEnd,

    #[error("unterminated string")]
    UnterminatedString,

    #[error("attribute list is not closed")]
    UnclosedAttributes,

    #[error("attribute '{attribute}' has no value")]
    MissingValue { attribute: String },

    /// An unquoted value that is not a boolean, null or number.
    #[error("attribute value '{0}' must be a number, a boolean, a string or null")]
    InvalidValue(String),

    #[error("illegal escaped character: \\{0}")]
    IllegalEscape(char),

    #[error("invalid unicode escape '{0}'")]
    InvalidUnicodeEscape(String),
}

impl SyntaxError {
    /// Returns a stable identifier for this error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnexpectedChar(_) => "SYNTAX_UNEXPECTED_CHAR",
            Self::UnexpectedEnd => "SYNTAX_UNEXPECTED_END",
            Self::UnterminatedString => "SYNTAX_UNTERMINATED_STRING",
            Self::UnclosedAttributes => "SYNTAX_UNCLOSED_ATTRIBUTES",
            Self::MissingValue { .. } => "SYNTAX_MISSING_VALUE",
            Self::InvalidValue(_) => "SYNTAX_INVALID_VALUE",
            Self::IllegalEscape(_) => "SYNTAX_ILLEGAL_ESCAPE",
            Self::InvalidUnicodeEscape(_) => "SYNTAX_INVALID_UNICODE_ESCAPE",
        }
    }
}

/// Errors returned by [`TreeReader`](crate::TreeReader) and
/// [`TreeParser`](crate::TreeParser).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("error parsing behavior tree on line {line} near: {near} ({kind})")]
    Syntax {
        line: usize,
        near: String,
        kind: SyntaxError,
    },

    /// The [`ReadHandler`](crate::ReadHandler) refused an event.
    #[error("error parsing behavior tree on line {line} near: {near}")]
    Rejected {
        line: usize,
        near: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// The statements were well formed but do not describe a valid tree.
    #[error("error building behavior tree on line {line}: {error}")]
    Build {
        line: usize,
        #[source]
        error: BuildError,
    },

    #[error("failed to read behavior tree source: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Line the error was detected on, if it came from the source text.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } | Self::Rejected { line, .. } | Self::Build { line, .. } => {
                Some(*line)
            }
            Self::Io(_) => None,
        }
    }

    /// Returns a stable identifier for this error variant.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax { kind, .. } => kind.error_code(),
            Self::Rejected { .. } => "PARSE_REJECTED",
            Self::Build { error, .. } => error.error_code(),
            Self::Io(_) => "PARSE_IO",
        }
    }
}
