//! Column listing with inferred value kinds

use gridiron_core::ingest::{is_missing, parse_float};
use gridiron_core::RawTable;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    /// Every cell is missing
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
            ColumnKind::Empty => "empty",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub present: usize,
    pub missing: usize,
    pub kind: ColumnKind,
}

/// Summarize every column in table order.
///
/// The kind is the narrowest one all present values fit: integer, then
/// float, then text. Integral float spellings ("5.0") count as float.
pub fn describe_columns(table: &RawTable) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut present = 0;
            let mut missing = 0;
            let mut all_int = true;
            let mut all_float = true;

            for row in table.rows() {
                let value = row.get(index).map(String::as_str).unwrap_or("");
                if is_missing(value) {
                    missing += 1;
                    continue;
                }
                present += 1;
                all_int &= value.trim().parse::<i64>().is_ok();
                all_float &= parse_float(value).is_some();
            }

            let kind = match (present, all_int, all_float) {
                (0, _, _) => ColumnKind::Empty,
                (_, true, _) => ColumnKind::Integer,
                (_, _, true) => ColumnKind::Float,
                _ => ColumnKind::Text,
            };
            ColumnSummary { name: name.clone(), present, missing, kind }
        })
        .collect()
}
