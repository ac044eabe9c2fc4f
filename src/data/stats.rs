use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

use super::model::{TransactionTable, COL_PAYMENT_INSTALLMENTS, COL_PAYMENT_VALUE};

/// `describe()`-style summary of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1); NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// Row labels and values in display order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Summarise the non-NaN values, `None` when there are none.
pub fn describe(values: impl IntoIterator<Item = f64>) -> Option<Summary> {
    let values: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mut data = Data::new(values);
    let std = if count > 1 {
        data.std_dev().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    };

    Some(Summary {
        count,
        mean: data.mean().unwrap_or(f64::NAN),
        std,
        min: data.min(),
        q25: linear_quantile(&mut data, count, 0.25),
        median: linear_quantile(&mut data, count, 0.5),
        q75: linear_quantile(&mut data, count, 0.75),
        max: data.max(),
    })
}

/// Quantile by linear interpolation between neighbouring order statistics
/// (Hyndman–Fan type 7, what `DataFrame.describe()` reports).
fn linear_quantile(data: &mut Data<Vec<f64>>, n: usize, p: f64) -> f64 {
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let below = data.order_statistic(lo + 1);
    if lo + 1 >= n {
        return below;
    }
    let above = data.order_statistic(lo + 2);
    below + (h - lo as f64) * (above - below)
}

/// Statistics for `payment_value` and `payment_installments`, labelled by
/// column name.  Columns with no usable values are omitted.
pub fn describe_payments(table: &TransactionTable) -> Vec<(&'static str, Summary)> {
    let value = describe(table.iter().map(|tx| tx.payment_value));
    let installments = describe(
        table
            .iter()
            .filter_map(|tx| tx.payment_installments)
            .map(|n| n as f64),
    );

    [(COL_PAYMENT_VALUE, value), (COL_PAYMENT_INSTALLMENTS, installments)]
        .into_iter()
        .filter_map(|(name, summary)| summary.map(|s| (name, s)))
        .collect()
}
