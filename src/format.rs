//! The set of supported text formats.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A structured text format this crate can decode and encode.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::Format;
///
/// assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
/// assert_eq!(Format::Toml.to_string(), "TOML");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Toml,
    Csv,
}

impl Format {
    /// Upper-case display name, as used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
            Format::Csv => "CSV",
        }
    }

    /// Whether the encoder for this format only accepts string mapping keys.
    #[must_use]
    pub const fn requires_string_keys(&self) -> bool {
        matches!(self, Format::Json | Format::Toml)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            "csv" => Ok(Format::Csv),
            other => Err(Error::arguments(format!("unknown format '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_names() {
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!(" yaml ".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("toml".parse::<Format>().unwrap(), Format::Toml);
        assert_eq!("csv".parse::<Format>().unwrap(), Format::Csv);
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_string_key_formats() {
        assert!(Format::Json.requires_string_keys());
        assert!(Format::Toml.requires_string_keys());
        assert!(!Format::Yaml.requires_string_keys());
    }
}
