//! CSV decoding, encoding and the table model.
//!
//! CSV has two decoding modes:
//!
//! - **Matrix**: every record, header line included, as rows of string cells.
//! - **Table**: a [`CsvTable`] pairing a header of column labels with the data
//!   rows, addressable by row and by label.
//!
//! Rows may be ragged. Nothing is padded or truncated while decoding; the
//! table accessors simply find no cell where a row is too short.
//!
//! ```rust
//! use serde_datafmt::csv::{decode_table, to_csv};
//! use serde_datafmt::{CsvOptions, Delimiter};
//!
//! let table = decode_table("name,qty\nbolt,4\nnut,9\n", &CsvOptions::new()).unwrap();
//! assert_eq!(table.labels(), ["name", "qty"]);
//! assert_eq!(table.cell(1, "qty"), Some("9"));
//!
//! let text = to_csv(&table.rows, Delimiter::SEMICOLON).unwrap();
//! assert_eq!(text, "bolt;4\r\nnut;9\r\n");
//! ```

use crate::{CsvOptions, Delimiter, Error, Format, HeaderSource, Mapping, Position, Result, Value};
use ::csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

/// Label for zero-based column `n`: the letter at `n % 26` of `A..Z`
/// repeated `n / 26 + 1` times.
///
/// This yields `A..Z`, then `AA, BB, .., ZZ`, then `AAA, ..`; it is not
/// spreadsheet-style base-26 naming.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::auto_index;
///
/// assert_eq!(auto_index(0), "A");
/// assert_eq!(auto_index(25), "Z");
/// assert_eq!(auto_index(26), "AA");
/// assert_eq!(auto_index(27), "BB");
/// assert_eq!(auto_index(52), "AAA");
/// ```
#[must_use]
pub fn auto_index(n: usize) -> String {
    let letter = char::from(b'A' + (n % 26) as u8);
    std::iter::repeat(letter).take(n / 26 + 1).collect()
}

fn read_records(text: &str, delimiter: Delimiter) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => rows.push(record.iter().map(str::to_string).collect()),
            Ok(false) => break,
            Err(e) => return Err(parse_error(text, &e)),
        }
    }
    Ok(rows)
}

fn parse_error(text: &str, err: &::csv::Error) -> Error {
    match err.position() {
        Some(pos) => {
            let offset = usize::try_from(pos.byte()).unwrap_or(text.len());
            Error::parse_at(Format::Csv, Position::from_offset(text, offset), err)
        }
        None => Error::parse(Format::Csv, err),
    }
}

/// Decodes every record of `text` as a row of cells.
///
/// Input with no records at all (empty, or only line terminators) decodes as
/// a single row with no cells, never as zero rows. Blank lines between
/// records are skipped.
///
/// The reader is lenient about quoting. A `"` inside an unquoted field is
/// kept as a literal character (`a"b,c` reads as `a"b` and `c`), and a
/// quoted field left open runs to the end of the input. Rows may have
/// different numbers of cells.
///
/// # Errors
///
/// Returns [`Error::Parse`] for invalid UTF-8 in a field.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{csv, Delimiter};
///
/// assert_eq!(csv::decode_matrix("", Delimiter::COMMA).unwrap(), vec![Vec::<String>::new()]);
/// assert_eq!(csv::decode_matrix("foo", Delimiter::COMMA).unwrap(), vec![vec!["foo"]]);
/// ```
pub fn decode_matrix(text: &str, delimiter: Delimiter) -> Result<Vec<Vec<String>>> {
    let rows = read_records(text, delimiter)?;
    if rows.is_empty() {
        return Ok(vec![Vec::new()]);
    }
    Ok(rows)
}

/// Decodes `text` as a table, resolving the header as `options` says.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the data or an explicit header line is
/// malformed.
pub fn decode_table(text: &str, options: &CsvOptions) -> Result<CsvTable> {
    let mut rows = read_records(text, options.delimiter)?;
    let header = match &options.header {
        HeaderSource::Explicit(line) => read_records(line, options.delimiter)?
            .into_iter()
            .next()
            .unwrap_or_default(),
        HeaderSource::FromData if rows.is_empty() => Vec::new(),
        HeaderSource::FromData => rows.remove(0),
        HeaderSource::AutoIndex => {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(auto_index).collect()
        }
    };
    tracing::trace!(source = ?options.header, labels = header.len(), rows = rows.len(), "resolved CSV header");
    Ok(CsvTable { header, rows })
}

/// A header of column labels plus data rows.
///
/// Cell `j` of a row belongs to the label at position `j` of the header.
/// Cells past the end of the header have no label; labels past the end of a
/// row have no cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    #[must_use]
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        CsvTable { header, rows }
    }

    /// The column labels in header order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.header
    }

    /// Number of labelled columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cells of data row `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.header.iter().position(|h| h == label)
    }

    /// The cells under `label`, from the rows long enough to have one.
    #[must_use]
    pub fn column(&self, label: &str) -> Option<Vec<&str>> {
        let j = self.position(label)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(j).map(String::as_str))
                .collect(),
        )
    }

    /// The cell of data row `row` under `label`.
    #[must_use]
    pub fn cell(&self, row: usize, label: &str) -> Option<&str> {
        let j = self.position(label)?;
        self.rows.get(row)?.get(j).map(String::as_str)
    }

    /// One mapping per data row, from label to cell.
    #[must_use]
    pub fn to_rows(&self) -> Value {
        self.rows
            .iter()
            .map(|row| {
                let map: Mapping = self
                    .header
                    .iter()
                    .zip(row)
                    .map(|(label, cell)| (label.as_str(), Value::from(cell.as_str())))
                    .collect();
                Value::Mapping(map)
            })
            .collect()
    }

    /// One sequence of cells per label, in row order.
    #[must_use]
    pub fn to_columns(&self) -> Value {
        let mut columns = Mapping::with_capacity(self.header.len());
        for (j, label) in self.header.iter().enumerate() {
            let cells = self
                .rows
                .iter()
                .filter_map(|row| row.get(j))
                .map(|cell| Value::from(cell.as_str()))
                .collect();
            columns.insert(label.as_str(), Value::Sequence(cells));
        }
        Value::Mapping(columns)
    }
}

/// Writes `rows` as CSV, terminating every row (the last one included) with
/// CRLF. Fields are quoted only when they have to be, and a row with no cells
/// is a bare line terminator.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the writer fails.
pub fn to_csv(rows: &[Vec<String>], delimiter: Delimiter) -> Result<String> {
    let mut output = String::new();
    let mut runs = rows.split(|row| row.is_empty()).peekable();
    while let Some(run) = runs.next() {
        write_records(&mut output, run, delimiter)?;
        if runs.peek().is_some() {
            output.push_str("\r\n");
        }
    }
    Ok(output)
}

// The csv writer quotes an empty record as `""`, so rows with no cells never
// reach it.
fn write_records(output: &mut String, rows: &[Vec<String>], delimiter: Delimiter) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| Error::encode(Format::Csv, e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::encode(Format::Csv, e))?;
    output.push_str(&String::from_utf8(bytes).map_err(|e| Error::encode(Format::Csv, e))?);
    Ok(())
}

/// Converts a sequence of sequences of scalars into a matrix of cells.
///
/// Scalars use their lexical form; null becomes an empty cell.
///
/// # Errors
///
/// Returns [`Error::Encode`] if `value` is not a sequence of sequences or a
/// cell is itself a collection.
pub fn matrix_from_value(value: &Value) -> Result<Vec<Vec<String>>> {
    let rows = as_rows(value)?;
    let mut matrix = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = as_rows(row)?
            .iter()
            .map(|cell| {
                cell.to_scalar_string().ok_or_else(|| {
                    Error::encode(Format::Csv, format!("a cell cannot hold a {}", cell.kind()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        matrix.push(cells);
    }
    Ok(matrix)
}

fn as_rows(value: &Value) -> Result<&[Value]> {
    value.as_sequence().ok_or_else(|| {
        Error::encode(
            Format::Csv,
            format!("expected a sequence of rows, found {}", value.kind()),
        )
    })
}
