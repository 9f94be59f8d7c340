use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

use crate::error::{IndexError, Result};

/// One cell of the raw statistics sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Parse a raw field. Blank fields are empty and numbers accept `.` or
    /// `,` as decimal separator. Anything else is kept as text, untouched.
    pub fn parse(raw: &str) -> Cell {
        let cleaned = clean_str(raw);
        if cleaned.is_empty() {
            return Cell::Empty;
        }
        if let Some(v) = parse_number(&cleaned) {
            return Cell::Number(v);
        }
        Cell::Text(raw.to_string())
    }

    /// The text exactly as it appeared in the sheet.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The cell coerced to a string without surrounding whitespace or quotes;
    /// `None` when blank.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let t = clean_str(s);
                (!t.is_empty()).then_some(t)
            }
            Cell::Number(v) => Some(v.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }
}

/// The income sheet as handed over by the reader: header strings plus rows of
/// cells, in sheet order. Rows may be shorter than the header.
#[derive(Debug, Clone, Default)]
pub struct RawIncomeTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

static EMPTY: Cell = Cell::Empty;

impl RawIncomeTable {
    /// Build a table from plain strings, parsing every field with [`Cell::parse`].
    pub fn from_text<H, R, S>(headers: H, rows: R) -> Self
    where
        H: IntoIterator<Item = S>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|h| clean_str(h.as_ref()))
                .collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(|c| Cell::parse(c.as_ref())).collect())
                .collect(),
        }
    }

    /// Cell at (`row`, `col`); out-of-range positions read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

/// Read a delimited export of the income sheet. Records before `header_row`
/// are skipped, the record at `header_row` supplies the column names.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_income_csv<P: AsRef<Path>>(
    path: P,
    header_row: usize,
    delimiter: u8,
) -> Result<RawIncomeTable> {
    let file = File::open(&path).map_err(|e| IndexError::io(path.as_ref(), e))?;
    parse_income_csv(file, header_row, delimiter)
}

pub fn parse_income_csv<R: Read>(
    reader: R,
    header_row: usize,
    delimiter: u8,
) -> Result<RawIncomeTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut table = RawIncomeTable::default();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        if idx < header_row {
            continue;
        }
        if idx == header_row {
            table.headers = record.iter().map(clean_str).collect();
            continue;
        }
        table.rows.push(record.iter().map(Cell::parse).collect());
    }

    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed income sheet"
    );
    Ok(table)
}

/// Trim whitespace, a leading BOM and outer quotes.
fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_number(s: &str) -> Option<f64> {
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }
    if s.contains(',') && !s.contains('.') {
        return s.replace(',', ".").parse::<f64>().ok();
    }
    None
}
