//! [`Frame`], the tabular form every service in this workspace converts to and from: named
//! columns over rows of optional string cells.
use std::io::{Read, Write};
use std::path::Path;

mod error;

pub use error::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Named columns over rows of optional text cells. Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Frame {
    /// A frame with columns and no rows.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Fails if any row's width differs from the number of columns.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != columns.len())
        {
            return Err(Error::RowWidth {
                row,
                expected: columns.len(),
                found,
            });
        }

        Ok(Self { columns, rows })
    }

    /// Pads short rows with absent cells and drops cells past the last column.
    pub fn from_ragged(columns: Vec<String>, mut rows: Vec<Vec<Option<String>>>) -> Self {
        for row in rows.iter_mut() {
            row.resize(columns.len(), None);
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }

    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_deref()))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }

        self.rows.push(row);
        Ok(())
    }

    /// Replaces every empty string cell with an absent value.
    pub fn normalize_empty(&mut self) {
        for cell in self.rows.iter_mut().flatten() {
            if cell.as_deref() == Some("") {
                *cell = None;
            }
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Option<String>>>) {
        (self.columns, self.rows)
    }

    /// Reads CSV with a header row. Empty fields become absent cells; short records are padded.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .map(String::from)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| (!field.is_empty()).then(|| String::from(field)))
                .collect();
            rows.push(row);
        }

        Ok(Self::from_ragged(columns, rows))
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_csv_reader(bytes)
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    /// Writes a header row then every row, with absent cells as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        writer.write_record(&self.columns)?;
        for row in self.rows.iter() {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}
