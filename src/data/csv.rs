// Delimited text rendering and parsing
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{DataError, Row, RowSet, Value};

/// Writes rows as delimited text.
///
/// The first line holds the column names. A cell that contains the
/// delimiter (or a quote or line break) is quoted, null renders empty.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedWriter {
    delimiter: char,
}

impl DelimitedWriter {
    /// Create a new writer for the given single-byte delimiter
    pub fn new(delimiter: char) -> Self {
        DelimitedWriter { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Render the header and the given rows into a string
    pub fn render<'a, I>(&self, columns: &[String], rows: I) -> Result<String, DataError>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let mut buffer = Vec::new();
        self.write(&mut buffer, columns, rows)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Render the header and rows into a file
    pub fn write_file<'a, P, I>(&self, path: P, columns: &[String], rows: I) -> Result<(), DataError>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = &'a Row>,
    {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, columns, rows)?;
        writer.flush()?;
        Ok(())
    }

    fn write<'a, W, I>(&self, out: W, columns: &[String], rows: I) -> Result<(), DataError>
    where
        W: Write,
        I: IntoIterator<Item = &'a Row>,
    {
        let delimiter = delimiter_byte(self.delimiter)?;

        let mut csv_writer = ::csv::WriterBuilder::new()
            .delimiter(delimiter)
            .quote_style(::csv::QuoteStyle::Necessary)
            .from_writer(out);

        csv_writer.write_record(columns)?;

        for row in rows {
            let record: Vec<String> = row.values.iter().map(Value::to_string).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for DelimitedWriter {
    fn default() -> Self {
        DelimitedWriter::new(',')
    }
}

/// Parse delimited text with a header line back into a row set.
///
/// Every cell comes back as a string; empty cells read as null.
pub fn read_delimited(text: &str, delimiter: char) -> Result<RowSet, DataError> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut rowset = RowSet::new(columns);

    for record in csv_reader.records() {
        let record = record?;
        let values = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Value::Null
                } else {
                    Value::String(field.to_string())
                }
            })
            .collect();
        rowset.add_row(Row::new(values))?;
    }

    Ok(rowset)
}

fn delimiter_byte(delimiter: char) -> Result<u8, DataError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(DataError::Malformed(format!(
            "delimiter '{}' is not a single-byte character",
            delimiter
        )))
    }
}
