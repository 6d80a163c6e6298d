//! JMESPath error types
//!
//! One error channel for both tiers: parse errors abort compilation,
//! evaluation errors are recorded on the context and surfaced after the
//! walk finishes. Every error carries the line and column of the last
//! consumed character.

use std::error::Error;
use std::fmt;

/// Failure categories for JMESPath parsing and evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An identifier (or other expression head) was expected
    ExpectedIdentifier,
    /// A bracket specifier was expected after the current expression
    ExpectedIndex,
    /// `]` was expected
    ExpectedRightBracket,
    /// `}` was expected
    ExpectedRightBrace,
    /// `:` was expected after a multi-select-hash key
    ExpectedColon,
    /// `.` was expected after `*`
    ExpectedDot,
    /// A comparison operator was expected in a filter
    ExpectedComparator,
    /// A multi-select-hash key was expected
    ExpectedKey,
    /// Malformed integer in an index or slice component
    InvalidNumber,
    /// The called function is not registered
    FunctionNameNotFound,
    /// A built-in was called with the wrong arity or argument type
    InvalidArgument,
    /// The expression ended while a construct was still open
    UnexpectedEndOfInput,
    /// Internal inconsistency; should not be reachable from any input
    UnidentifiedError,
}

impl ErrorKind {
    /// Human-readable description used by `Display`
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::ExpectedIdentifier => "expected identifier",
            ErrorKind::ExpectedIndex => "expected index",
            ErrorKind::ExpectedRightBracket => "expected right bracket ']'",
            ErrorKind::ExpectedRightBrace => "expected right brace '}'",
            ErrorKind::ExpectedColon => "expected colon ':'",
            ErrorKind::ExpectedDot => "expected dot '.'",
            ErrorKind::ExpectedComparator => "expected comparator",
            ErrorKind::ExpectedKey => "expected key",
            ErrorKind::InvalidNumber => "invalid number",
            ErrorKind::FunctionNameNotFound => "function name not found",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::UnexpectedEndOfInput => "unexpected end of input",
            ErrorKind::UnidentifiedError => "unidentified error",
        }
    }
}

/// JMESPath error: a failure kind plus the cursor position it was
/// detected at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JmesPathError {
    pub kind: ErrorKind,
    pub line: usize,
    pub column: usize,
}

impl JmesPathError {
    #[must_use]
    pub fn new(kind: ErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

impl fmt::Display for JmesPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {} column {}",
            self.kind.message(),
            self.line,
            self.column
        )
    }
}

impl Error for JmesPathError {}

/// Result type for JMESPath operations
pub type JmesPathResult<T> = Result<T, JmesPathError>;
