//! Configuration for the CSV path and for JSON output.
//!
//! - [`CsvOptions`]: delimiter and header resolution for CSV decoding
//! - [`Delimiter`]: a validated single-byte field separator
//! - [`HeaderSource`]: where table-mode CSV decoding takes its labels from
//! - [`JsonOptions`]: compact or indented JSON output
//!
//! ## Examples
//!
//! ```rust
//! use serde_datafmt::{CsvOptions, Delimiter, HeaderSource};
//!
//! // Semicolon-separated data whose first line is the header
//! let options = CsvOptions::new().with_delimiter(Delimiter::SEMICOLON);
//! assert_eq!(options.header, HeaderSource::FromData);
//!
//! // No header line at all: label the columns A, B, C, ...
//! let options = CsvOptions::new().with_auto_index();
//! assert_eq!(options.header, HeaderSource::AutoIndex);
//! ```

use crate::{Error, Result};
use std::fmt;

/// Field separator for CSV input and output.
///
/// Any single ASCII character other than a quote or a line terminator is
/// accepted; the CSV reader and writer work on bytes.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::Delimiter;
///
/// assert_eq!(Delimiter::default(), Delimiter::COMMA);
/// assert_eq!(Delimiter::new(';').unwrap(), Delimiter::SEMICOLON);
/// assert!(Delimiter::new('"').is_err());
/// assert!(Delimiter::try_from(";;").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Delimiter(u8);

impl Delimiter {
    pub const COMMA: Delimiter = Delimiter(b',');
    pub const SEMICOLON: Delimiter = Delimiter(b';');
    pub const TAB: Delimiter = Delimiter(b'\t');
    pub const PIPE: Delimiter = Delimiter(b'|');

    /// Validates `ch` as a delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arguments`] for non-ASCII characters, `"`, `\r` and
    /// `\n`.
    pub fn new(ch: char) -> Result<Self> {
        if !ch.is_ascii() || matches!(ch, '"' | '\r' | '\n') {
            return Err(Error::arguments(format!(
                "'{}' cannot be used as a CSV delimiter",
                ch.escape_default()
            )));
        }
        Ok(Delimiter(ch as u8))
    }

    /// The delimiter as a character.
    #[must_use]
    pub const fn as_char(&self) -> char {
        self.0 as char
    }

    /// The delimiter as the byte the `csv` crate expects.
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::COMMA
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Delimiter {
    type Error = Error;

    fn try_from(ch: char) -> Result<Self> {
        Delimiter::new(ch)
    }
}

impl TryFrom<&str> for Delimiter {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Delimiter::new(ch),
            _ => Err(Error::arguments(format!(
                "a CSV delimiter must be exactly one character, got '{}'",
                s
            ))),
        }
    }
}

/// Where table-mode CSV decoding gets its column labels.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum HeaderSource {
    /// The first record of the data is the header.
    #[default]
    FromData,
    /// A separate header line, parsed with the same delimiter as the data.
    /// Every record of the data is a data row.
    Explicit(String),
    /// Generated labels `A`, `B`, ..., `Z`, `AA`, `BB`, ...; every record of
    /// the data is a data row.
    AutoIndex,
}

/// Options for CSV decoding.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{CsvOptions, Delimiter, HeaderSource};
///
/// let options = CsvOptions::new()
///     .with_delimiter(Delimiter::PIPE)
///     .with_header("first|second");
/// assert_eq!(options.header, HeaderSource::Explicit("first|second".to_string()));
///
/// // An empty header line means "generate the labels"
/// let options = CsvOptions::new().with_header("");
/// assert_eq!(options.header, HeaderSource::AutoIndex);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CsvOptions {
    pub delimiter: Delimiter,
    pub header: HeaderSource,
}

impl CsvOptions {
    /// Comma-delimited, header taken from the first line of the data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Supplies the header line separately from the data.
    ///
    /// An empty line selects [`HeaderSource::AutoIndex`], matching the
    /// positional calling convention where `""` as the header argument asks
    /// for generated labels.
    #[must_use]
    pub fn with_header(mut self, line: impl Into<String>) -> Self {
        let line = line.into();
        self.header = if line.is_empty() {
            HeaderSource::AutoIndex
        } else {
            HeaderSource::Explicit(line)
        };
        self
    }

    /// Labels the columns with generated auto-index labels.
    #[must_use]
    pub fn with_auto_index(mut self) -> Self {
        self.header = HeaderSource::AutoIndex;
        self
    }

    /// Interprets the positional `[delimiter] [header] data` convention used
    /// by template functions, returning the options and the data argument.
    ///
    /// - one argument: the data
    /// - two arguments: a one-character first argument is the delimiter,
    ///   anything else (including `""`) is the header
    /// - three arguments: delimiter, header, data
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arguments`] for any other arity or an unusable
    /// delimiter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::{CsvOptions, Delimiter, HeaderSource};
    ///
    /// let (options, data) = CsvOptions::from_args(&[";", "a;b", "1;2"]).unwrap();
    /// assert_eq!(options.delimiter, Delimiter::SEMICOLON);
    /// assert_eq!(options.header, HeaderSource::Explicit("a;b".to_string()));
    /// assert_eq!(data, "1;2");
    ///
    /// let (options, _) = CsvOptions::from_args(&["", "1,2"]).unwrap();
    /// assert_eq!(options.header, HeaderSource::AutoIndex);
    /// ```
    pub fn from_args<'a>(args: &[&'a str]) -> Result<(CsvOptions, &'a str)> {
        match *args {
            [data] => Ok((CsvOptions::new(), data)),
            [first, data] if first.chars().count() == 1 => Ok((
                CsvOptions::new().with_delimiter(Delimiter::try_from(first)?),
                data,
            )),
            [header, data] => Ok((CsvOptions::new().with_header(header), data)),
            [delimiter, header, data] => Ok((
                CsvOptions::new()
                    .with_delimiter(Delimiter::try_from(delimiter)?)
                    .with_header(header),
                data,
            )),
            _ => Err(Error::arguments(format!(
                "expected [delimiter] [header] data, got {} arguments",
                args.len()
            ))),
        }
    }
}

/// Options for JSON output.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::JsonOptions;
///
/// assert_eq!(JsonOptions::compact().indent, None);
/// assert_eq!(JsonOptions::pretty("\t").indent.as_deref(), Some("\t"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct JsonOptions {
    /// Indentation added per nesting level; `None` writes compact JSON.
    pub indent: Option<String>,
}

impl JsonOptions {
    /// Compact output with minimal separators.
    #[must_use]
    pub fn compact() -> Self {
        Self::default()
    }

    /// Indented output using `indent` once per nesting level.
    #[must_use]
    pub fn pretty(indent: impl Into<String>) -> Self {
        JsonOptions {
            indent: Some(indent.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args_single() {
        let (options, data) = CsvOptions::from_args(&["a,b"]).unwrap();
        assert_eq!(options, CsvOptions::default());
        assert_eq!(data, "a,b");
    }

    #[test]
    fn test_from_args_delimiter_or_header() {
        let (options, _) = CsvOptions::from_args(&[";", "x"]).unwrap();
        assert_eq!(options.delimiter, Delimiter::SEMICOLON);
        assert_eq!(options.header, HeaderSource::FromData);

        let (options, _) = CsvOptions::from_args(&["first,second", "x"]).unwrap();
        assert_eq!(options.delimiter, Delimiter::COMMA);
        assert_eq!(
            options.header,
            HeaderSource::Explicit("first,second".to_string())
        );
    }

    #[test]
    fn test_from_args_arity() {
        assert!(CsvOptions::from_args(&[]).is_err());
        assert!(CsvOptions::from_args(&["a", "b", "c", "d"]).is_err());
        assert!(CsvOptions::from_args(&[";;", "h", "d"]).is_err());
    }

    #[test]
    fn test_delimiter_validation() {
        assert_eq!(Delimiter::new('\t').unwrap(), Delimiter::TAB);
        assert!(Delimiter::new('\n').is_err());
        assert!(Delimiter::new('é').is_err());
        assert_eq!(Delimiter::PIPE.to_string(), "|");
    }
}
