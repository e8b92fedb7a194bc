//! Columnar input as delivered by a bulk load

use serde::{Deserialize, Serialize};

/// Cell spellings treated as "no value"
const MISSING_TOKENS: [&str; 6] = ["", "NA", "NaN", "nan", "null", "None"];

/// Bulk tracking input: named columns, rows of text cells.
///
/// Rows are padded or truncated to the column count on insert so that every
/// row can be indexed by column position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { columns: columns.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Build a table from string slices (handy for fixtures)
    pub fn from_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Self::new(columns.iter().copied());
        for row in rows {
            table.push_row(row.iter().map(|c| c.to_string()).collect());
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact, case-sensitive column lookup
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Trimmed cell text, or `None` when the cell holds a missing token
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        let value = self.rows.get(row)?.get(column)?.trim();
        if is_missing(value) {
            None
        } else {
            Some(value)
        }
    }
}

pub fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value.trim())
}

/// Float cell; NaN and infinities count as unparseable.
pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer cell. Integral float spellings ("5.0") are accepted because
/// columnar exports widen integer columns that contain gaps.
pub fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    let float = parse_float(value)?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

/// One row of a `RawTable`, read through a column mapping.
///
/// Every value is optional: a row only becomes a `NormalizedRecord` once the
/// ingestor has checked the keys it needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrackingRecord {
    pub entity_name: String,
    pub team_label: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub speed: Option<f64>,
    pub direction: Option<f64>,
    pub frame_phase_id: Option<i64>,
    pub play_id: Option<i64>,
    pub game_id: Option<i64>,
    pub source_row: usize,
}
