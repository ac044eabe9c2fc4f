use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    /// Pick from `(item, weight)` pairs.
    fn weighted<'a>(&mut self, items: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for (item, w) in items {
            if target < *w {
                return *item;
            }
            target -= w;
        }
        items[items.len() - 1].0
    }

    fn hex_id(&mut self) -> String {
        format!("{:016x}{:016x}", self.next_u64(), self.next_u64())
    }
}

const CITIES: [(&str, f64); 14] = [
    ("sao paulo", 15.6),
    ("rio de janeiro", 6.9),
    ("belo horizonte", 2.8),
    ("brasilia", 2.1),
    ("curitiba", 1.5),
    ("campinas", 1.5),
    ("porto alegre", 1.4),
    ("salvador", 1.2),
    ("guarulhos", 1.2),
    ("sao bernardo do campo", 0.9),
    ("niteroi", 0.8),
    ("santo andre", 0.7),
    ("osasco", 0.7),
    ("franca", 0.2),
];

const PAYMENT_TYPES: [(&str, f64); 5] = [
    ("credit_card", 73.9),
    ("boleto", 19.0),
    ("voucher", 5.6),
    ("debit_card", 1.5),
    ("not_defined", 0.3),
];

/// Orders per customer: mostly one, a tail of repeat buyers.
const ORDER_COUNTS: [(&str, f64); 8] = [
    ("1", 70.0),
    ("2", 12.0),
    ("3", 7.0),
    ("4", 4.0),
    ("5", 3.0),
    ("6", 2.0),
    ("8", 1.5),
    ("11", 0.5),
];

#[derive(Debug, Serialize)]
struct SampleRow {
    order_id: String,
    customer_id: String,
    customer_city: String,
    payment_sequential: i64,
    payment_type: String,
    payment_installments: i64,
    payment_value: f64,
    order_purchase_timestamp: String,
}

fn generate(rng: &mut SimpleRng, customers: usize) -> Vec<SampleRow> {
    let first_day = NaiveDate::from_ymd_opt(2016, 9, 4)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN);
    let span_secs = 775 * 24 * 3600;

    let mut rows = Vec::new();
    for _ in 0..customers {
        let customer_id = rng.hex_id();
        let city = rng.weighted(&CITIES).to_string();
        let orders: u64 = rng.weighted(&ORDER_COUNTS).parse().unwrap_or(1);

        for _ in 0..orders {
            let order_id = rng.hex_id();
            let ts = first_day + Duration::seconds(rng.below(span_secs) as i64);
            // A few orders are split over two payments.
            let payments = if rng.next_f64() < 0.05 { 2 } else { 1 };

            for seq in 1..=payments {
                let payment_type = rng.weighted(&PAYMENT_TYPES).to_string();
                let installments = match payment_type.as_str() {
                    "credit_card" => 1 + rng.below(10) as i64,
                    "not_defined" => 0,
                    _ => 1,
                };
                let value = if payment_type == "not_defined" {
                    0.0
                } else {
                    ((20.0 + rng.next_f64().powi(2) * 480.0) * 100.0).round() / 100.0
                };

                rows.push(SampleRow {
                    order_id: order_id.clone(),
                    customer_id: customer_id.clone(),
                    customer_city: city.clone(),
                    payment_sequential: seq,
                    payment_type,
                    payment_installments: installments,
                    payment_value: value,
                    order_purchase_timestamp: ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                });
            }
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn string_column(rows: &[SampleRow], f: impl Fn(&SampleRow) -> &str) -> StringArray {
    StringArray::from(rows.iter().map(f).collect::<Vec<_>>())
}

fn write_parquet(path: &str, rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Utf8, false),
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("customer_city", DataType::Utf8, false),
        Field::new("payment_sequential", DataType::Int64, false),
        Field::new("payment_type", DataType::Utf8, false),
        Field::new("payment_installments", DataType::Int64, false),
        Field::new("payment_value", DataType::Float64, false),
        Field::new("order_purchase_timestamp", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(string_column(rows, |r| r.order_id.as_str())),
            Arc::new(string_column(rows, |r| r.customer_id.as_str())),
            Arc::new(string_column(rows, |r| r.customer_city.as_str())),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.payment_sequential).collect::<Vec<_>>(),
            )),
            Arc::new(string_column(rows, |r| r.payment_type.as_str())),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.payment_installments).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.payment_value).collect::<Vec<_>>(),
            )),
            Arc::new(string_column(rows, |r| r.order_purchase_timestamp.as_str())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 2_000);

    write_csv("all_data.csv", &rows)?;
    write_parquet("all_data.parquet", &rows)?;

    println!(
        "Wrote {} transaction rows to all_data.csv and all_data.parquet",
        rows.len()
    );
    Ok(())
}
