use std::path::Path;

use anyhow::Context;
use arrow::array::{Array, ArrayRef};
use arrow::util::display::array_value_to_string;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{LoadError, LoadResult};
use super::model::{
    Transaction, TransactionTable, COL_PAYMENT_INSTALLMENTS, COL_PAYMENT_VALUE,
    COL_PURCHASE_TIMESTAMP, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a transaction table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, the required columns located by name
/// * `.json`    – `[{ "customer_id": "...", ... }, ...]`
/// * `.parquet` – one column per field; the timestamp may be text or an
///   Arrow `Timestamp`
///
/// Extra columns are ignored in every format.
pub fn load_file(path: &Path) -> LoadResult<TransactionTable> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} transactions from {} ({} cities, span {:?})",
        table.len(),
        path.display(),
        table.distinct_cities(),
        table.date_span
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Row assembly shared by every format
// ---------------------------------------------------------------------------

/// Turn the six required cells (in [`REQUIRED_COLUMNS`] order) into a
/// [`Transaction`].  `row` is zero-based and only used for error messages.
fn build_transaction(row: usize, cells: [&str; 6]) -> LoadResult<Transaction> {
    let [customer_id, city, payment_type, value, installments, timestamp] = cells;

    let payment_value = parse_value(value)
        .ok_or_else(|| LoadError::malformed(row, COL_PAYMENT_VALUE, value))?;
    let payment_installments = parse_installments(installments)
        .ok_or_else(|| LoadError::malformed(row, COL_PAYMENT_INSTALLMENTS, installments))?;
    let order_purchase_timestamp = parse_timestamp(timestamp)
        .ok_or_else(|| LoadError::malformed(row, COL_PURCHASE_TIMESTAMP, timestamp))?;

    Ok(Transaction {
        customer_id: customer_id.trim().to_string(),
        customer_city: city.trim().to_string(),
        payment_type: payment_type.trim().to_string(),
        payment_value,
        payment_installments,
        order_purchase_timestamp,
    })
}

/// Empty cells become NaN so the statistics skip them.
fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}

/// Accepts `3` as well as `3.0` (Pandas writes integer columns with gaps as
/// floats).  `Some(None)` for an empty cell, `None` when unparseable.
fn parse_installments(s: &str) -> Option<Option<i64>> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Some(i));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(Some(f as i64)),
        _ => None,
    }
}

/// Parse a purchase timestamp.
///
/// Accepted: `2017-10-02 10:56:33`, the same with fractional seconds or a
/// `T` separator, RFC 3339 with an offset (wall-clock time is kept) and a
/// bare date (midnight).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one transaction per record.
fn load_csv(path: &Path) -> LoadResult<TransactionTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut idx = [0usize; 6];
    for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| LoadError::missing(column))?;
    }

    let mut transactions = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cells = idx.map(|i| record.get(i).unwrap_or(""));
        transactions.push(build_transaction(row_no, cells)?);
    }

    Ok(TransactionTable::from_transactions(transactions))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default of `df.to_json(orient='records')`:
///
/// ```json
/// [
///   {
///     "customer_id": "06b8999e2fba1a1fbc88172c00ba8bc7",
///     "customer_city": "franca",
///     "payment_type": "credit_card",
///     "payment_value": 146.87,
///     "payment_installments": 2,
///     "order_purchase_timestamp": "2017-05-16 15:05:35"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> LoadResult<TransactionTable> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut transactions = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut texts: [String; 6] = Default::default();
        for (slot, column) in texts.iter_mut().zip(REQUIRED_COLUMNS) {
            let value = obj.get(column).ok_or_else(|| LoadError::missing(column))?;
            *slot = json_to_text(value);
        }
        let cells = texts.each_ref().map(String::as_str);
        transactions.push(build_transaction(i, cells)?);
    }

    Ok(TransactionTable::from_transactions(transactions))
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Cells are read through Arrow's display formatting, so Utf8, integer,
/// float and `Timestamp` columns all work; nulls become empty cells.
fn load_parquet(path: &Path) -> LoadResult<TransactionTable> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    // Checked against the file schema so files without any row group are
    // validated too.
    let mut idx = [0usize; 6];
    for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = builder
            .schema()
            .index_of(column)
            .map_err(|_| LoadError::missing(column))?;
    }

    let reader = builder.build().context("building parquet reader")?;

    let mut transactions = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns: Vec<&ArrayRef> = idx.iter().map(|&i| batch.column(i)).collect();

        for row in 0..batch.num_rows() {
            let row_no = transactions.len();
            let mut texts: [String; 6] = Default::default();
            for (slot, col) in texts.iter_mut().zip(&columns) {
                *slot = arrow_cell_text(col, row)
                    .with_context(|| format!("Row {row_no}: failed to read cell"))?;
            }
            let cells = texts.each_ref().map(String::as_str);
            transactions.push(build_transaction(row_no, cells)?);
        }
    }

    Ok(TransactionTable::from_transactions(transactions))
}

fn arrow_cell_text(col: &ArrayRef, row: usize) -> anyhow::Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    Ok(array_value_to_string(col.as_ref(), row)?)
}
