//! Source readers
//!
//! Adapts every supported statement source into a [`RawMatrix`]: a plain
//! rectangular-ish grid of string cells. Downstream stages never care
//! whether the bytes came from a workbook or a delimited export.

use std::io::{Cursor, Read};

use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};

/// An immutable grid of text cells, one per source. Rows may have
/// differing lengths; fully empty rows are dropped at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMatrix {
    rows: Vec<Vec<String>>,
}

impl RawMatrix {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Read delimited text, honoring quoting and skipping fully empty
    /// lines. The header position is unknown at this point, so every
    /// record is treated as data.
    pub fn from_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            rows.push(cells);
        }

        debug!("Read {} delimited rows", rows.len());
        Ok(Self { rows })
    }

    /// Read the first worksheet of an xlsx workbook.
    pub fn from_workbook(bytes: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::UnsupportedFormat("workbook has no worksheets".into()))??;

        let mut rows = Vec::new();
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(render_cell).collect();
            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            rows.push(cells);
        }

        debug!("Read {} workbook rows", rows.len());
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `count` rows, cloned, for manual-mapping fallbacks.
    pub fn preview(&self, count: usize) -> Vec<Vec<String>> {
        self.rows.iter().take(count).cloned().collect()
    }
}

/// Render a workbook cell as text. Dates stay numeric (their serial
/// value); the date normalizer recognizes the serial range.
fn render_cell(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => render_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => render_float(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

fn render_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
