//! Error types for decoding and encoding.
//!
//! Two kinds of failure matter to callers:
//!
//! - **Parse errors**: the input text is not valid for the stated format. They
//!   carry the format, the underlying cause and, when the parser reports one,
//!   a [`Position`]. They are returned unmodified; malformed input is never
//!   repaired.
//! - **Encode errors**: the value breaks a precondition of the target encoder,
//!   for example a non-string mapping key reaching the JSON or TOML encoder
//!   without going through [`normalize_keys`](crate::normalize_keys) first.
//!   These point at a defect in the calling code rather than at user input.
//!
//! ## Examples
//!
//! ```rust
//! use serde_datafmt::{json, Error, Format};
//!
//! let err = json("{\"a\": }").unwrap_err();
//! assert!(err.is_parse());
//! assert_eq!(err.format(), Some(Format::Json));
//! assert!(err.position().is_some());
//! ```

use crate::Format;
use std::fmt;
use thiserror::Error;

/// Where in the input a parse failure was detected.
///
/// `line` and `column` are 1-based, `offset` is the 0-based byte offset into
/// the input text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    /// Builds a position from a 1-based line and column, computing the byte
    /// offset against `text`.
    ///
    /// The column is interpreted as a byte column, which is what the JSON
    /// parser reports.
    #[must_use]
    pub fn from_line_column(text: &str, line: usize, column: usize) -> Self {
        let line_start: usize = text
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        let offset = (line_start + column.saturating_sub(1)).min(text.len());
        Position {
            line,
            column,
            offset,
        }
    }

    /// Builds a position from a 0-based byte offset into `text`.
    #[must_use]
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        Position {
            line,
            column: offset - line_start + 1,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (byte offset {})",
            self.line, self.column, self.offset
        )
    }
}

fn at(position: &Option<Position>) -> String {
    position
        .map(|p| format!(" at {}", p))
        .unwrap_or_default()
}

/// Every error this crate can return.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed input text for the stated format.
    #[error("failed to parse {format}{}: {msg}", at(.position))]
    Parse {
        format: Format,
        position: Option<Position>,
        msg: String,
    },

    /// The value violates a precondition of the target encoder.
    #[error("cannot encode {format}: {msg}")]
    Encode { format: Format, msg: String },

    /// The positional CSV calling convention was used incorrectly.
    #[error("invalid arguments: {0}")]
    Arguments(String),

    /// Free-form message raised through serde.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a parse error without position information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::{Error, Format};
    ///
    /// let err = Error::parse(Format::Yaml, "expected a mapping");
    /// assert_eq!(err.to_string(), "failed to parse YAML: expected a mapping");
    /// ```
    pub fn parse<T: fmt::Display>(format: Format, msg: T) -> Self {
        Error::Parse {
            format,
            position: None,
            msg: msg.to_string(),
        }
    }

    /// Creates a parse error located at `position`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::{Error, Format, Position};
    ///
    /// let pos = Position::from_offset("{\n  x", 4);
    /// let err = Error::parse_at(Format::Json, pos, "expected value");
    /// assert!(err.to_string().contains("line 2, column 3"));
    /// ```
    pub fn parse_at<T: fmt::Display>(format: Format, position: Position, msg: T) -> Self {
        Error::Parse {
            format,
            position: Some(position),
            msg: msg.to_string(),
        }
    }

    /// Creates an encode-invariant error.
    pub fn encode<T: fmt::Display>(format: Format, msg: T) -> Self {
        Error::Encode {
            format,
            msg: msg.to_string(),
        }
    }

    /// Creates an error for a malformed positional argument list.
    pub fn arguments<T: fmt::Display>(msg: T) -> Self {
        Error::Arguments(msg.to_string())
    }

    /// Returns `true` for malformed-input errors.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Returns `true` for encoder precondition violations.
    #[must_use]
    pub const fn is_encode(&self) -> bool {
        matches!(self, Error::Encode { .. })
    }

    /// The format the failing operation was working on, if any.
    #[must_use]
    pub const fn format(&self) -> Option<Format> {
        match self {
            Error::Parse { format, .. } | Error::Encode { format, .. } => Some(*format),
            Error::Arguments(_) | Error::Message(_) => None,
        }
    }

    /// Where a parse error was detected, when the parser reported it.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Error::Parse { position, .. } => *position,
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_line_column() {
        let text = "{\n  \"a\": ,\n}";
        let pos = Position::from_line_column(text, 2, 8);
        assert_eq!(pos.offset, 9);
        assert_eq!(&text[pos.offset..pos.offset + 1], ",");
    }

    #[test]
    fn test_position_from_offset() {
        let text = "a = 1\nb = \n";
        let pos = Position::from_offset(text, 10);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 5);
    }

    #[test]
    fn test_offset_is_clamped() {
        let pos = Position::from_offset("abc", 99);
        assert_eq!(pos.offset, 3);
        assert_eq!(pos.line, 1);
    }

    #[test]
    fn test_error_kinds() {
        let parse = Error::parse(Format::Toml, "bad");
        assert!(parse.is_parse());
        assert!(!parse.is_encode());
        assert_eq!(parse.format(), Some(Format::Toml));

        let encode = Error::encode(Format::Json, "non-string key");
        assert!(encode.is_encode());
        assert_eq!(encode.to_string(), "cannot encode JSON: non-string key");

        let args = Error::arguments("too many");
        assert_eq!(args.format(), None);
    }
}
