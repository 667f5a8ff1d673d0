//! YAML decoding and encoding.
//!
//! Decoding walks the event stream of `yaml-rust2`, which reports each
//! scalar's style and tag. Plain scalars resolve with YAML 1.1 conventions:
//!
//! - `~`, `null` and the empty scalar are null.
//! - `true`/`false`, `yes`/`no`, `on`/`off` and `y`/`n` (in lower, title or
//!   upper case) are booleans.
//! - Decimal, `0x`, `0o` and `0b` integers, floats, `.inf` and `.nan` become
//!   [`Number::Float`]. Underscores between digits are ignored.
//! - A complete RFC 3339 date-time with an offset becomes a
//!   [`Value::Timestamp`], except in key position.
//!
//! Quoted and block scalars are always strings. The core tags `!!str`,
//! `!!int`, `!!float`, `!!bool`, `!!null` and `!!timestamp` force their type.
//! Anchors, aliases and `<<` merge keys are expanded.
//!
//! The encoder writes block style with sorted keys and quotes strings only
//! when a plain scalar would read back as something else:
//!
//! ```rust
//! use serde_datafmt::{yaml, value};
//!
//! let v = value!({"name": "web", "ports": [80, 443], "enabled": "true"});
//! assert_eq!(
//!     yaml::to_string(&v).unwrap(),
//!     "enabled: \"true\"\nname: web\nports:\n- 80\n- 443\n"
//! );
//! ```

use crate::de::{expect_mapping, expect_sequence};
use crate::value::{format_timestamp, parse_timestamp};
use crate::{Error, Format, Key, Mapping, Number, Position, Result, Timestamp, Value};
use chrono::DateTime;
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle};

// Longest key libyaml accepts in implicit `key: value` form.
const MAX_SIMPLE_KEY_LEN: usize = 1024;
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

const NULL_WORDS: &[&str] = &["~", "null", "Null", "NULL"];
const TRUE_WORDS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON",
];
const FALSE_WORDS: &[&str] = &[
    "n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF",
];

const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// Decodes any YAML document. An empty document is [`Value::Null`].
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input, a scalar that does not fit
/// its core tag, or a stream holding more than one document.
pub fn decode_value(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let mut events = EventLog::default();
    Parser::new(text.chars())
        .load(&mut events, true)
        .map_err(|e| scan_error(text, &e))?;
    Builder {
        text,
        events: events.0.into_iter(),
        anchors: HashMap::new(),
    }
    .stream()
}

/// Decodes a YAML document whose root is a mapping. An empty document is an
/// empty mapping.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input or a root of another kind.
pub fn decode(text: &str) -> Result<Value> {
    match decode_value(text)? {
        Value::Null if text.trim().is_empty() => Ok(Value::Mapping(Mapping::new())),
        value => expect_mapping(Format::Yaml, value),
    }
}

/// Decodes a YAML document whose root is a sequence. An empty document is an
/// empty sequence.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input or a root of another kind.
pub fn decode_array(text: &str) -> Result<Value> {
    match decode_value(text)? {
        Value::Null if text.trim().is_empty() => Ok(Value::Sequence(Vec::new())),
        value => expect_sequence(Format::Yaml, value),
    }
}

#[derive(Default)]
struct EventLog(Vec<(Event, Marker)>);

impl MarkedEventReceiver for EventLog {
    fn on_event(&mut self, event: Event, mark: Marker) {
        self.0.push((event, mark));
    }
}

/// Folds a recorded event stream into a [`Value`].
struct Builder<'a> {
    text: &'a str,
    events: std::vec::IntoIter<(Event, Marker)>,
    anchors: HashMap<usize, Value>,
}

impl Builder<'_> {
    fn stream(mut self) -> Result<Value> {
        let mut root = None;
        while let Some((event, mark)) = self.events.next() {
            if !starts_node(&event) {
                continue;
            }
            if root.is_some() {
                return Err(self.error(
                    mark,
                    "expected a single document, found a stream of several",
                ));
            }
            root = Some(self.node(event, mark, false)?);
        }
        Ok(root.unwrap_or(Value::Null))
    }

    fn next(&mut self, after: Marker) -> Result<(Event, Marker)> {
        match self.events.next() {
            Some(next) => Ok(next),
            None => Err(self.error(after, "unexpected end of event stream")),
        }
    }

    fn node(&mut self, event: Event, mark: Marker, key: bool) -> Result<Value> {
        match event {
            Event::Scalar(text, style, anchor, tag) => {
                let value = self.scalar(text, style, tag.as_ref(), key, mark)?;
                Ok(self.anchor(anchor, value))
            }
            Event::SequenceStart(anchor, _) => {
                let mut items = Vec::new();
                loop {
                    let (event, mark) = self.next(mark)?;
                    if matches!(event, Event::SequenceEnd) {
                        break;
                    }
                    items.push(self.node(event, mark, false)?);
                }
                Ok(self.anchor(anchor, Value::Sequence(items)))
            }
            Event::MappingStart(anchor, _) => {
                let map = self.mapping(mark)?;
                Ok(self.anchor(anchor, Value::Mapping(map)))
            }
            Event::Alias(id) => match self.anchors.get(&id) {
                Some(value) => Ok(value.clone()),
                None => Err(self.error(mark, "alias refers to an unknown anchor")),
            },
            other => Err(self.error(mark, format!("unexpected event {:?}", other))),
        }
    }

    // Explicit entries win over merged ones; earlier merge sources win over
    // later ones.
    fn mapping(&mut self, start: Marker) -> Result<Mapping> {
        let mut map = Mapping::new();
        let mut merged = Vec::new();
        loop {
            let (event, mark) = self.next(start)?;
            if matches!(event, Event::MappingEnd) {
                break;
            }
            let is_merge = is_merge_key(&event);
            let key = self.node(event, mark, true)?;
            let (event, value_mark) = self.next(mark)?;
            let value = self.node(event, value_mark, false)?;
            if is_merge {
                match value {
                    Value::Mapping(source) => merged.push(source),
                    Value::Sequence(sources) => {
                        for source in sources {
                            match source {
                                Value::Mapping(source) => merged.push(source),
                                _ => {
                                    return Err(
                                        self.error(value_mark, "merge sources must be mappings")
                                    )
                                }
                            }
                        }
                    }
                    _ => {
                        return Err(self.error(
                            value_mark,
                            "merge value must be a mapping or a sequence of mappings",
                        ))
                    }
                }
            } else {
                map.insert(Key::from_value(key), value);
            }
        }
        for source in merged {
            for (key, value) in source {
                if map.get_key(&key).is_none() {
                    map.insert(key, value);
                }
            }
        }
        Ok(map)
    }

    fn scalar(
        &self,
        text: String,
        style: TScalarStyle,
        tag: Option<&Tag>,
        key: bool,
        mark: Marker,
    ) -> Result<Value> {
        if let Some(kind) = tag.and_then(core_tag) {
            return self.tagged(kind, text, mark);
        }
        if matches!(style, TScalarStyle::Plain) {
            Ok(resolve_plain(text, key))
        } else {
            Ok(Value::String(text))
        }
    }

    fn tagged(&self, kind: &str, text: String, mark: Marker) -> Result<Value> {
        let value = match kind {
            "str" | "binary" => return Ok(Value::String(text)),
            "null" => return Ok(Value::Null),
            "bool" => bool_word(&text).map(Value::Bool),
            "int" | "float" => number(&text).map(Value::from),
            "timestamp" => tagged_timestamp(&text).map(Value::Timestamp),
            _ => return Ok(resolve_plain(text, false)),
        };
        value.ok_or_else(|| self.error(mark, format!("invalid !!{} value {:?}", kind, text)))
    }

    fn anchor(&mut self, id: usize, value: Value) -> Value {
        if id > 0 {
            self.anchors.insert(id, value.clone());
        }
        value
    }

    fn error(&self, mark: Marker, msg: impl std::fmt::Display) -> Error {
        Error::parse_at(Format::Yaml, position(self.text, &mark), msg)
    }
}

fn starts_node(event: &Event) -> bool {
    matches!(
        event,
        Event::Scalar(..) | Event::SequenceStart(..) | Event::MappingStart(..) | Event::Alias(_)
    )
}

fn is_merge_key(event: &Event) -> bool {
    matches!(event, Event::Scalar(text, TScalarStyle::Plain, _, None) if text == "<<")
}

/// The suffix of a tag in the `tag:yaml.org,2002:` namespace.
fn core_tag(tag: &Tag) -> Option<&str> {
    match tag.handle.as_str() {
        "!!" | CORE_TAG_PREFIX => Some(tag.suffix.as_str()),
        "" => tag.suffix.strip_prefix(CORE_TAG_PREFIX),
        _ => None,
    }
}

fn resolve_plain(text: String, key: bool) -> Value {
    if text.is_empty() || NULL_WORDS.contains(&text.as_str()) {
        return Value::Null;
    }
    if let Some(b) = bool_word(&text) {
        return Value::Bool(b);
    }
    if let Some(n) = number(&text) {
        return Value::Number(Number::Float(n));
    }
    if !key {
        if let Some(ts) = parse_timestamp(&text) {
            return Value::Timestamp(ts);
        }
    }
    Value::String(text)
}

fn bool_word(s: &str) -> Option<bool> {
    if TRUE_WORDS.contains(&s) {
        Some(true)
    } else if FALSE_WORDS.contains(&s) {
        Some(false)
    } else {
        None
    }
}

fn number(s: &str) -> Option<f64> {
    let (negative, body) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = match body {
        ".inf" | ".Inf" | ".INF" => f64::INFINITY,
        ".nan" | ".NaN" | ".NAN" if body.len() == s.len() => return Some(f64::NAN),
        _ if starts_numeric(body) => {
            let digits: String = body.chars().filter(|&c| c != '_').collect();
            let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
                .into_iter()
                .find_map(|(prefix, radix)| digits.strip_prefix(prefix).map(|d| (d, radix)));
            match radix {
                Some((d, radix)) => {
                    if d.is_empty() || !d.bytes().all(|b| b.is_ascii_alphanumeric()) {
                        return None;
                    }
                    i64::from_str_radix(d, radix).ok()? as f64
                }
                None => {
                    if !digits.bytes().all(|b| b.is_ascii_digit() || b"._eE+-".contains(&b)) {
                        return None;
                    }
                    digits.parse().ok()?
                }
            }
        }
        _ => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn starts_numeric(s: &str) -> bool {
    let digit = |c: char| c.is_ascii_digit();
    s.starts_with(digit) || s.strip_prefix('.').map_or(false, |rest| rest.starts_with(digit))
}

// `!!timestamp` also accepts a bare date, read as midnight UTC.
fn tagged_timestamp(s: &str) -> Option<Timestamp> {
    parse_timestamp(s).or_else(|| {
        let is_date = s.len() == 10
            && s.bytes()
                .enumerate()
                .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
        if is_date {
            DateTime::parse_from_rfc3339(&format!("{}T00:00:00Z", s)).ok()
        } else {
            None
        }
    })
}

// yaml-rust2 markers count characters, not bytes.
fn position(text: &str, mark: &Marker) -> Position {
    let offset = text
        .char_indices()
        .nth(mark.index())
        .map_or(text.len(), |(i, _)| i);
    Position::from_offset(text, offset)
}

fn scan_error(text: &str, err: &ScanError) -> Error {
    Error::parse_at(Format::Yaml, position(text, err.marker()), err.info())
}

/// Encodes `value` as a block-style YAML document ending in a newline.
///
/// Keys of any kind are accepted; scalar keys are written plainly and
/// collection or multi-line keys with the explicit `? key` / `: value` form.
///
/// # Errors
///
/// Never fails for values built by this crate; the `Result` keeps the
/// signature uniform with the other encoders.
pub fn to_string(value: &Value) -> Result<String> {
    let mut output = String::with_capacity(256);
    write_node(&mut output, value, 0, Context::Document);
    Ok(output)
}

/// Where a node starts relative to the text already written.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    /// At the start of the stream.
    Document,
    /// Right after `key:`; nothing follows the colon yet.
    MappingValue,
    /// Right after `- `, `? ` or `: `; the node starts at the indent column.
    Compact,
}

fn push_indent(output: &mut String, indent: usize) {
    output.extend(std::iter::repeat(' ').take(indent));
}

// `indent` is the column of the enclosing mapping entry for MappingValue and
// the column the node itself starts at for Compact.
fn write_node(output: &mut String, value: &Value, indent: usize, context: Context) {
    match value {
        Value::Mapping(map) if !map.is_empty() => match context {
            Context::Document => write_mapping(output, map, 0, false),
            Context::MappingValue => {
                output.push('\n');
                write_mapping(output, map, indent + 2, false);
            }
            Context::Compact => write_mapping(output, map, indent, true),
        },
        Value::Sequence(seq) if !seq.is_empty() => match context {
            Context::Document => write_sequence(output, seq, 0, false),
            // block sequences under a key are not indented further
            Context::MappingValue => {
                output.push('\n');
                write_sequence(output, seq, indent, false);
            }
            Context::Compact => write_sequence(output, seq, indent, true),
        },
        Value::String(s) if is_literal_candidate(s) => {
            if context == Context::MappingValue {
                output.push(' ');
            }
            let content_indent = match context {
                Context::Document => 2,
                Context::MappingValue => indent + 2,
                Context::Compact => indent,
            };
            write_literal(output, s, content_indent);
        }
        scalar => {
            if context == Context::MappingValue {
                output.push(' ');
            }
            write_scalar(output, scalar);
            output.push('\n');
        }
    }
}

fn write_mapping(output: &mut String, map: &Mapping, indent: usize, first_inline: bool) {
    for (i, (key, value)) in map.sorted_entries().into_iter().enumerate() {
        if i > 0 || !first_inline {
            push_indent(output, indent);
        }
        match simple_key(key) {
            Some(text) => {
                output.push_str(&text);
                output.push(':');
                write_node(output, value, indent, Context::MappingValue);
            }
            None => {
                let key_value = key.clone().into_value();
                output.push_str("? ");
                write_node(output, &key_value, indent + 2, Context::Compact);
                push_indent(output, indent);
                output.push_str(": ");
                write_node(output, value, indent + 2, Context::Compact);
            }
        }
    }
}

fn write_sequence(output: &mut String, seq: &[Value], indent: usize, first_inline: bool) {
    for (i, item) in seq.iter().enumerate() {
        if i > 0 || !first_inline {
            push_indent(output, indent);
        }
        output.push_str("- ");
        write_node(output, item, indent + 2, Context::Compact);
    }
}

/// The one-line rendering of a key, or `None` if it needs the `? key` form.
fn simple_key(key: &Key) -> Option<String> {
    let text = match key {
        Key::Composite(_) => return None,
        Key::String(s) if is_literal_candidate(s) => return None,
        Key::String(s) => {
            let mut out = String::with_capacity(s.len());
            write_string(&mut out, s);
            out
        }
        Key::Null => "null".to_string(),
        Key::Bool(b) => b.to_string(),
        Key::Number(n) => format_number(*n),
    };
    (text.len() <= MAX_SIMPLE_KEY_LEN).then_some(text)
}

fn write_scalar(output: &mut String, value: &Value) {
    match value {
        Value::Null => output.push_str("null"),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => output.push_str(&format_number(*n)),
        Value::String(s) => write_string(output, s),
        Value::Timestamp(ts) => {
            output.push_str("!!timestamp ");
            output.push_str(&format_timestamp(ts));
        }
        Value::Sequence(_) => output.push_str("[]"),
        Value::Mapping(_) => output.push_str("{}"),
    }
}

fn format_number(n: Number) -> String {
    match n {
        Number::Integer(i) => i.to_string(),
        Number::Float(f) if f.is_nan() => ".nan".to_string(),
        Number::Float(f) if f.is_infinite() => {
            if f > 0.0 {
                ".inf".to_string()
            } else {
                "-.inf".to_string()
            }
        }
        Number::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            (f as i64).to_string()
        }
        // Debug switches to exponent notation for very large and small values
        Number::Float(f) => format!("{:?}", f),
    }
}

fn write_string(output: &mut String, s: &str) {
    if !needs_quotes(s) {
        output.push_str(s);
        return;
    }
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\0' => output.push_str("\\0"),
            '\u{85}' => output.push_str("\\N"),
            '\u{2028}' => output.push_str("\\L"),
            '\u{2029}' => output.push_str("\\P"),
            c if is_unprintable(c) => {
                output.push_str(&format!("\\u{:04X}", u32::from(c)));
            }
            c => output.push(c),
        }
    }
    output.push('"');
}

fn is_unprintable(c: char) -> bool {
    (c.is_control() && c != '\n' && c != '\t') || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    NULL_WORDS.contains(&s)
        || s == "<<"
        || bool_word(s).is_some()
        || looks_numeric(s)
        || "-?:,[]{}#&*!|>'\"%@`".contains(first)
        || s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || s.ends_with(':')
        || s.contains(": ")
        || s.contains(" #")
        || s.chars().any(|c| c == '\n' || c == '\t' || is_unprintable(c))
}

// Anything a resolver could read as a number, a special float, a base-60
// integer, a date or a timestamp.
fn looks_numeric(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    if matches!(
        lower.as_str(),
        ".inf" | "+.inf" | "-.inf" | ".nan"
    ) || s.parse::<f64>().is_ok()
    {
        return true;
    }
    starts_numeric(s.trim_start_matches(['+', '-']))
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._:+- ".contains(c))
}

/// Multi-line strings that can be written as a literal block scalar.
fn is_literal_candidate(s: &str) -> bool {
    s.contains('\n')
        && !s.starts_with([' ', '\t', '\n'])
        && !s.chars().any(|c| c == '\r' || is_unprintable(c))
}

fn write_literal(output: &mut String, s: &str, indent: usize) {
    let (indicator, body) = match s.strip_suffix('\n') {
        None => ("|-", s),
        Some(rest) if rest.ends_with('\n') => ("|+", rest),
        Some(rest) => ("|", rest),
    };
    output.push_str(indicator);
    output.push('\n');
    for line in body.split('\n') {
        if !line.is_empty() {
            push_indent(output, indent);
            output.push_str(line);
        }
        output.push('\n');
    }
}
