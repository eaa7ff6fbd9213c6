use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DataError, Result};
use super::model::{Row, Table, Value};
use super::schema;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a campaign table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one campaign interaction per line
/// * `.json`    – `[{ "Age": 56, "Gender": "Female", ... }, ...]`
/// * `.parquet` – flat string / integer / float / dictionary columns
///
/// Required columns are checked up front and typed per the declared schema.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!(
        "Loaded {} rows with {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| DataError::io(path, e))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    read_csv(open(path)?)
}

/// Parse CSV text from any reader. The header row names the columns.
pub fn read_csv<R: std::io::Read>(source: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    schema::validate_headers(&headers)?;

    let mut table = Table::new(headers);

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row = table
            .columns
            .iter()
            .enumerate()
            .map(|(col_idx, name)| schema::parse_cell(record.get(col_idx).unwrap_or(""), name, row_no))
            .collect::<Result<Row>>()?;
        table.rows.push(row);
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Age": 56, "Gender": "Female", "Income": 136912.0, ... },
///   ...
/// ]
/// ```
///
/// Columns are the union of the keys of the first object; keys missing from
/// later objects load as nulls.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Table> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataError::parse(0, "<root>", "expected top-level JSON array"))?;

    let columns: Vec<String> = records
        .first()
        .and_then(|r| r.as_object())
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default();
    schema::validate_headers(&columns)?;

    let mut table = Table::new(columns);

    for (row_no, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::parse(row_no, "<row>", "not a JSON object"))?;

        let row = table
            .columns
            .iter()
            .map(|name| {
                let value = obj.get(name).map(json_to_value).unwrap_or(Value::Null);
                schema::coerce(value, name, row_no)
            })
            .collect::<Result<Row>>()?;
        table.rows.push(row);
    }

    Ok(table)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) if schema::is_na(s.trim()) => Value::Null,
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Text(b.to_string()),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Categorical columns arrive
/// dictionary-encoded and narrow numeric columns keep their width; both are
/// cast to the layouts [`extract_value`] reads before any cell is taken.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    schema::validate_headers(&columns)?;

    let reader = builder.build()?;
    let mut table = Table::new(columns);

    for batch_result in reader {
        let batch = batch_result?;
        let offset = table.len();
        let arrays = batch
            .columns()
            .iter()
            .zip(&table.columns)
            .map(|(col, name)| normalize_column(col, name, offset))
            .collect::<Result<Vec<ArrayRef>>>()?;

        for row in 0..batch.num_rows() {
            let values = arrays
                .iter()
                .zip(&table.columns)
                .map(|(col, name)| {
                    let value = extract_value(col, name, offset + row, row)?;
                    schema::coerce(value, name, offset + row)
                })
                .collect::<Result<Row>>()?;
            table.rows.push(values);
        }
    }

    Ok(table)
}

/// Layout a column of type `data_type` is read as, or `None` if unsupported.
fn readable_type(data_type: &DataType) -> Option<DataType> {
    match data_type {
        DataType::Null => Some(DataType::Null),
        DataType::Boolean => Some(DataType::Boolean),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Some(DataType::Utf8),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => Some(DataType::Int64),
        DataType::Float16 | DataType::Float32 | DataType::Float64 => Some(DataType::Float64),
        DataType::Dictionary(_, values) => readable_type(values),
        _ => None,
    }
}

/// Cast a column to its readable layout. Values that do not fit (a `UInt64`
/// above `i64::MAX`) are an error, never a silent null.
fn normalize_column(col: &ArrayRef, name: &str, offset: usize) -> Result<ArrayRef> {
    let Some(target) = readable_type(col.data_type()) else {
        return Err(DataError::parse(
            offset,
            name,
            format!("unsupported column type {}", col.data_type()),
        ));
    };
    if col.data_type() == &target {
        return Ok(col.clone());
    }
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    Ok(cast_with_options(col, &target, &options)?)
}

/// Extract a single cell from a normalised Arrow column.
fn extract_value(col: &ArrayRef, name: &str, row_no: usize, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Null => Some(Value::Null),
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|s| Value::Text(s.value(row).to_string())),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| Value::Integer(a.value(row))),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| match a.value(row) {
                v if v.is_nan() => Value::Null,
                v => Value::Float(schema::normalize_float(v)),
            }),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| Value::Text(a.value(row).to_string())),
        _ => None,
    };
    value.ok_or_else(|| {
        DataError::parse(
            row_no,
            name,
            format!("cannot read a {} cell", col.data_type()),
        )
    })
}
