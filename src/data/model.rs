use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Column names of the merged dataset
// ---------------------------------------------------------------------------

pub const COL_CUSTOMER_ID: &str = "customer_id";
pub const COL_CUSTOMER_CITY: &str = "customer_city";
pub const COL_PAYMENT_TYPE: &str = "payment_type";
pub const COL_PAYMENT_VALUE: &str = "payment_value";
pub const COL_PAYMENT_INSTALLMENTS: &str = "payment_installments";
pub const COL_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_CUSTOMER_ID,
    COL_CUSTOMER_CITY,
    COL_PAYMENT_TYPE,
    COL_PAYMENT_VALUE,
    COL_PAYMENT_INSTALLMENTS,
    COL_PURCHASE_TIMESTAMP,
];

// ---------------------------------------------------------------------------
// Transaction – one row of the merged table
// ---------------------------------------------------------------------------

/// One order-payment line item.
///
/// `customer_id` repeats for repeat customers. Missing categorical cells are
/// kept as empty strings and skipped by the category counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub customer_id: String,
    pub customer_city: String,
    pub payment_type: String,
    /// NaN when the source cell was empty.
    pub payment_value: f64,
    pub payment_installments: Option<i64>,
    pub order_purchase_timestamp: NaiveDateTime,
}

impl Transaction {
    /// Purchase instant truncated to its calendar date.
    pub fn purchase_date(&self) -> NaiveDate {
        self.order_purchase_timestamp.date()
    }
}

// ---------------------------------------------------------------------------
// TransactionTable – the loaded (or filtered) dataset
// ---------------------------------------------------------------------------

/// An immutable collection of transactions plus a few pre-computed indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    pub transactions: Vec<Transaction>,
    /// Sorted set of observed payment types (sentinel included).
    pub payment_types: BTreeSet<String>,
    /// Earliest and latest purchase dates, `None` for an empty table.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl TransactionTable {
    /// Build indices from the loaded rows.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut payment_types = BTreeSet::new();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;

        for tx in &transactions {
            if !tx.payment_type.is_empty() && !payment_types.contains(&tx.payment_type) {
                payment_types.insert(tx.payment_type.clone());
            }
            let date = tx.purchase_date();
            date_span = Some(match date_span {
                Some((lo, hi)) => (lo.min(date), hi.max(date)),
                None => (date, date),
            });
        }

        TransactionTable {
            transactions,
            payment_types,
            date_span,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Number of distinct non-empty cities.
    pub fn distinct_cities(&self) -> usize {
        self.transactions
            .iter()
            .filter(|tx| !tx.customer_city.is_empty())
            .map(|tx| tx.customer_city.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{date, tx};
    use super::*;

    #[test]
    fn indices_cover_dates_and_payment_types() {
        let table = TransactionTable::from_transactions(vec![
            tx("a", "sao paulo", "credit_card", "2017-10-02 10:56:33"),
            tx("b", "rio de janeiro", "boleto", "2018-07-24 20:41:37"),
            tx("c", "sao paulo", "not_defined", "2017-01-15 00:00:00"),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.date_span,
            Some((date("2017-01-15"), date("2018-07-24")))
        );
        let types: Vec<&str> = table.payment_types.iter().map(String::as_str).collect();
        assert_eq!(types, vec!["boleto", "credit_card", "not_defined"]);
        assert_eq!(table.distinct_cities(), 2);
    }

    #[test]
    fn empty_table_has_no_span() {
        let table = TransactionTable::from_transactions(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.date_span, None);
        assert_eq!(table.distinct_cities(), 0);
    }
}
