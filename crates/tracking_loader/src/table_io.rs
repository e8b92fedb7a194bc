//! Tracking table files → `RawTable`
//!
//! CSV (header row + records), JSON (array of row objects) and Parquet are
//! read into text cells; typing happens later in the engine's normalizer.

use anyhow::{bail, Context, Result};
use gridiron_core::RawTable;
use parquet::basic::{Compression, ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{ByteArray, ByteArrayType};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet::record::Field;
use parquet::schema::types::Type;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

/// Prefix pandas gives its serialized index columns
const PANDAS_INDEX_PREFIX: &str = "__index_level_";

/// On-disk table format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Csv,
    Json,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("json") => Ok(TableFormat::Json),
            Some("parquet") => Ok(TableFormat::Parquet),
            _ => bail!("Unsupported table format (expected .csv, .json or .parquet): {}", path.display()),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Json => "json",
            TableFormat::Parquet => "parquet",
        }
    }
}

/// Read a CSV file with a header row.
///
/// Short records are padded with empty cells; a UTF-8 BOM on the first header
/// is stripped.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();

    let mut table = RawTable::new(headers);
    for (line, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Malformed CSV record {} in {}", line + 1, path.display()))?;
        table.push_row(record.iter().map(str::to_string).collect());
    }

    log::info!("Read {} rows × {} columns from {}", table.len(), table.columns().len(), path.display());
    Ok(table)
}

/// Read a JSON array of row objects.
///
/// Columns are the union of keys in first-seen order. Strings and numbers
/// become cells as written, `null` becomes a missing cell.
pub fn read_json_table(path: &Path) -> Result<RawTable> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON: {}", path.display()))?;

    let Value::Array(rows) = value else {
        bail!("Expected a JSON array of row objects in {}", path.display());
    };

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let Value::Object(object) = row else {
            bail!("Row {} of {} is not a JSON object", i, path.display());
        };
        for key in object.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        objects.push(object);
    }

    let mut table = RawTable::new(columns.iter().cloned());
    for object in &objects {
        let row = columns.iter().map(|c| object.get(c).map(cell_text).unwrap_or_default()).collect();
        table.push_row(row);
    }

    log::info!("Read {} rows × {} columns from {}", table.len(), table.columns().len(), path.display());
    Ok(table)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Read a Parquet file row by row.
///
/// Columns follow the file schema, minus pandas index columns. Nulls become
/// missing cells; numbers are written back as text.
pub fn read_parquet_table(path: &Path) -> Result<RawTable> {
    let file = File::open(path).with_context(|| format!("Failed to open Parquet file: {}", path.display()))?;
    let reader = SerializedFileReader::new(file)
        .with_context(|| format!("Failed to read Parquet metadata: {}", path.display()))?;

    let columns: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|field| field.name().to_string())
        .filter(|name| !name.starts_with(PANDAS_INDEX_PREFIX))
        .collect();

    let mut table = RawTable::new(columns.iter().cloned());
    let rows = reader.get_row_iter(None).with_context(|| format!("Failed to iterate rows: {}", path.display()))?;
    for (line, row) in rows.enumerate() {
        let row = row.with_context(|| format!("Malformed Parquet row {} in {}", line, path.display()))?;
        let mut cells = vec![String::new(); columns.len()];
        for (name, field) in row.get_column_iter() {
            if let Some(index) = columns.iter().position(|c| c == name) {
                cells[index] = field_text(field);
            }
        }
        table.push_row(cells);
    }

    log::info!("Read {} rows × {} columns from {}", table.len(), table.columns().len(), path.display());
    Ok(table)
}

fn field_text(field: &Field) -> String {
    match field {
        Field::Null => String::new(),
        Field::Str(s) => s.clone(),
        Field::Bool(b) => b.to_string(),
        Field::Byte(v) => v.to_string(),
        Field::Short(v) => v.to_string(),
        Field::Int(v) => v.to_string(),
        Field::Long(v) => v.to_string(),
        Field::UByte(v) => v.to_string(),
        Field::UShort(v) => v.to_string(),
        Field::UInt(v) => v.to_string(),
        Field::ULong(v) => v.to_string(),
        Field::Float(v) => v.to_string(),
        Field::Double(v) => v.to_string(),
        other => other.to_string(),
    }
}

/// Read a table, choosing the format by file extension.
pub fn load_table(path: &Path) -> Result<RawTable> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => read_csv_table(path),
        TableFormat::Json => read_json_table(path),
        TableFormat::Parquet => read_parquet_table(path),
    }
}

/// Write the header and the selected rows of `table` in `format`.
pub fn write_table_rows(table: &RawTable, rows: &[usize], path: &Path, format: TableFormat) -> Result<()> {
    match format {
        TableFormat::Csv => write_csv_rows(table, rows, path),
        TableFormat::Json => write_json_rows(table, rows, path),
        TableFormat::Parquet => write_parquet_rows(table, rows, path),
    }
}

/// Write the header and the selected rows of `table` as CSV.
pub fn write_csv_rows(table: &RawTable, rows: &[usize], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    writer.write_record(table.columns())?;
    for &row in rows {
        if let Some(cells) = table.rows().get(row) {
            writer.write_record(cells)?;
        }
    }
    writer.flush().with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

/// Write the selected rows as a JSON array of objects; missing cells become `null`.
pub fn write_json_rows(table: &RawTable, rows: &[usize], path: &Path) -> Result<()> {
    let objects: Vec<Map<String, Value>> = rows
        .iter()
        .filter(|&&row| row < table.len())
        .map(|&row| {
            table
                .columns()
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    let value = table.cell(row, index).map_or(Value::Null, |cell| Value::String(cell.to_string()));
                    (name.clone(), value)
                })
                .collect()
        })
        .collect();

    let json = serde_json::to_string(&objects).context("Failed to serialize rows")?;
    fs::write(path, json).with_context(|| format!("Failed to write JSON file: {}", path.display()))
}

/// Write the selected rows as Parquet, one optional UTF-8 column per table
/// column and a single row group. Missing cells become nulls.
pub fn write_parquet_rows(table: &RawTable, rows: &[usize], path: &Path) -> Result<()> {
    let rows: Vec<usize> = rows.iter().copied().filter(|&row| row < table.len()).collect();

    let fields = table
        .columns()
        .iter()
        .map(|name| {
            Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
                .with_repetition(Repetition::OPTIONAL)
                .with_converted_type(ConvertedType::UTF8)
                .build()
                .map(Arc::new)
        })
        .collect::<parquet::errors::Result<Vec<_>>>()
        .context("Failed to build Parquet schema")?;
    let schema =
        Type::group_type_builder("schema").with_fields(fields).build().context("Failed to build Parquet schema")?;
    let properties = WriterProperties::builder().set_compression(Compression::SNAPPY).build();

    let file = File::create(path).with_context(|| format!("Failed to create Parquet file: {}", path.display()))?;
    let mut writer = SerializedFileWriter::new(file, Arc::new(schema), Arc::new(properties))
        .with_context(|| format!("Failed to start Parquet file: {}", path.display()))?;

    let mut row_group = writer.next_row_group()?;
    let mut column_index = 0;
    while let Some(mut column) = row_group.next_column()? {
        let mut values = Vec::with_capacity(rows.len());
        let mut definition_levels = Vec::with_capacity(rows.len());
        for &row in &rows {
            match table.cell(row, column_index) {
                Some(cell) => {
                    values.push(ByteArray::from(cell));
                    definition_levels.push(1);
                }
                None => definition_levels.push(0),
            }
        }
        column.typed::<ByteArrayType>().write_batch(&values[..], Some(&definition_levels[..]), None)?;
        column.close()?;
        column_index += 1;
    }
    row_group.close()?;
    writer.close().with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with(suffix: &str, content: &str) -> Result<NamedTempFile> {
        let mut file = Builder::new().suffix(suffix).tempfile()?;
        file.write_all(content.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_csv_with_bom_and_short_rows() -> Result<()> {
        let file = temp_with(".csv", "\u{feff}displayName,club,x\nMahomes,KC,30.5\nfootball,,\nKelce,KC\n")?;
        let table = read_csv_table(file.path())?;

        assert_eq!(table.columns(), ["displayName", "club", "x"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(0, 2), Some("30.5"));
        assert_eq!(table.cell(1, 1), None);
        assert_eq!(table.cell(2, 2), None);
        Ok(())
    }

    #[test]
    fn test_json_union_of_keys() -> Result<()> {
        let file = temp_with(
            ".json",
            r#"[{"playId": 1, "x": 10.5, "club": "KC"}, {"playId": 2, "x": null, "gameId": 2022}]"#,
        )?;
        let table = read_json_table(file.path())?;

        assert_eq!(table.len(), 2);
        assert!(table.has_column("gameId"));
        let x = table.column_index("x").unwrap();
        let game = table.column_index("gameId").unwrap();
        assert_eq!(table.cell(0, x), Some("10.5"));
        assert_eq!(table.cell(1, x), None);
        assert_eq!(table.cell(0, game), None);
        assert_eq!(table.cell(1, game), Some("2022"));
        Ok(())
    }

    #[test]
    fn test_json_columns_keep_first_seen_order() -> Result<()> {
        let file = temp_with(".json", r#"[{"playId": 1, "x": 2, "club": "KC"}, {"gameId": 7, "playId": 2}]"#)?;
        let table = read_json_table(file.path())?;
        assert_eq!(table.columns(), ["playId", "x", "club", "gameId"]);
        Ok(())
    }

    #[test]
    fn test_json_must_be_array_of_objects() -> Result<()> {
        let file = temp_with(".json", r#"{"playId": 1}"#)?;
        assert!(read_json_table(file.path()).is_err());
        let file = temp_with(".json", "[1, 2]")?;
        assert!(read_json_table(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_load_table_dispatches_on_extension() -> Result<()> {
        let file = temp_with(".CSV", "a,b\n1,2\n")?;
        assert_eq!(load_table(file.path())?.len(), 1);
        let file = temp_with(".xlsx", "")?;
        assert!(load_table(file.path()).is_err());
        let file = temp_with(".parquet", "not parquet")?;
        assert!(load_table(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_parquet_round_trip() -> Result<()> {
        let table = RawTable::from_rows(
            &["displayName", "club", "x", "frameId"],
            &[&["Mahomes", "KC", "30.5", "1"], &["football", "", "31", "1"], &["Kelce", "KC", "NA", "2"]],
        );
        let out = Builder::new().suffix(".parquet").tempfile()?;
        write_parquet_rows(&table, &[0, 1, 2], out.path())?;

        let back = load_table(out.path())?;
        assert_eq!(back.columns(), ["displayName", "club", "x", "frameId"]);
        assert_eq!(back.len(), 3);
        assert_eq!(back.cell(0, 0), Some("Mahomes"));
        assert_eq!(back.cell(0, 2), Some("30.5"));
        assert_eq!(back.cell(1, 1), None);
        assert_eq!(back.cell(2, 2), None);
        assert_eq!(back.cell(2, 3), Some("2"));
        Ok(())
    }

    #[test]
    fn test_json_writer_reads_back() -> Result<()> {
        let table = RawTable::from_rows(&["b", "a"], &[&["1", ""], &["2", "y"]]);
        let out = Builder::new().suffix(".json").tempfile()?;
        write_table_rows(&table, &[1, 0], out.path(), TableFormat::Json)?;

        let back = load_table(out.path())?;
        assert_eq!(back.columns(), ["b", "a"]);
        assert_eq!(back.cell(0, 1), Some("y"));
        assert_eq!(back.cell(1, 1), None);
        Ok(())
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path(Path::new("week1.PARQUET")).ok(), Some(TableFormat::Parquet));
        assert_eq!(TableFormat::from_path(Path::new("week1.json")).ok(), Some(TableFormat::Json));
        assert!(TableFormat::from_path(Path::new("week1")).is_err());
        assert_eq!(TableFormat::Parquet.extension(), "parquet");
    }

    #[test]
    fn test_write_selected_rows() -> Result<()> {
        let table = RawTable::from_rows(&["a", "b"], &[&["1", "x"], &["2", "y"], &["3", "z"]]);
        let out = NamedTempFile::new()?;
        write_csv_rows(&table, &[0, 2], out.path())?;

        let text = fs::read_to_string(out.path())?;
        assert_eq!(text, "a,b\n1,x\n3,z\n");
        Ok(())
    }
}
