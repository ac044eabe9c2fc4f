use std::fmt;

use chrono::{Local, NaiveDate};

use super::model::{Transaction, TransactionTable};
use crate::config::UNDEFINED_PAYMENT_TYPE;

// ---------------------------------------------------------------------------
// Filter predicate: date range + optional payment type
// ---------------------------------------------------------------------------

/// Payment-type constraint chosen in the side panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaymentFilter {
    /// No constraint ("All").
    #[default]
    All,
    /// Exact match on `payment_type`.
    Only(String),
}

impl PaymentFilter {
    pub fn accepts(&self, payment_type: &str) -> bool {
        match self {
            PaymentFilter::All => true,
            PaymentFilter::Only(wanted) => wanted == payment_type,
        }
    }
}

impl fmt::Display for PaymentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFilter::All => write!(f, "All"),
            PaymentFilter::Only(p) => write!(f, "{p}"),
        }
    }
}

/// The active filter: an inclusive calendar-date range and a payment
/// constraint.  `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub payment: PaymentFilter,
}

impl FilterSpec {
    /// A filter that lets every row of `table` through.  An empty table has
    /// no span, so both ends fall on today; the date pickers cannot step
    /// past chrono's extreme dates.
    pub fn covering(table: &TransactionTable) -> Self {
        let (start, end) = table.date_span.unwrap_or_else(|| {
            let today = Local::now().date_naive();
            (today, today)
        });
        FilterSpec {
            start,
            end,
            payment: PaymentFilter::All,
        }
    }

    /// Whether a single transaction passes both predicates.
    pub fn matches(&self, tx: &Transaction) -> bool {
        let date = tx.purchase_date();
        self.start <= date && date <= self.end && self.payment.accepts(&tx.payment_type)
    }
}

/// Return indices of transactions that pass the filter, in table order.
pub fn filtered_indices(table: &TransactionTable, spec: &FilterSpec) -> Vec<usize> {
    table
        .transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| spec.matches(tx))
        .map(|(i, _)| i)
        .collect()
}

/// Build a new table holding only the matching rows; `table` is untouched.
pub fn apply_filter(table: &TransactionTable, spec: &FilterSpec) -> TransactionTable {
    let rows = filtered_indices(table, spec)
        .into_iter()
        .map(|i| table.transactions[i].clone())
        .collect();
    TransactionTable::from_transactions(rows)
}

/// Payment types offered in the selector: every observed type except the
/// "undefined" sentinel, sorted.
pub fn selectable_payment_types(table: &TransactionTable) -> Vec<String> {
    table
        .payment_types
        .iter()
        .filter(|p| p.as_str() != UNDEFINED_PAYMENT_TYPE)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, tx};

    fn sample() -> TransactionTable {
        TransactionTable::from_transactions(vec![
            tx("a", "sao paulo", "credit_card", "2017-01-01 00:00:00"),
            tx("b", "sao paulo", "boleto", "2017-01-31 23:59:59"),
            tx("c", "franca", "not_defined", "2017-02-01 00:00:00"),
            tx("d", "curitiba", "credit_card", "2017-03-15 12:00:00"),
        ])
    }

    fn spec(start: &str, end: &str, payment: PaymentFilter) -> FilterSpec {
        FilterSpec {
            start: date(start),
            end: date(end),
            payment,
        }
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let table = sample();
        let filtered = apply_filter(&table, &spec("2017-01-01", "2017-01-31", PaymentFilter::All));
        let ids: Vec<&str> = filtered.iter().map(|t| t.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        for t in filtered.iter() {
            assert!(t.purchase_date() >= date("2017-01-01"));
            assert!(t.purchase_date() <= date("2017-01-31"));
        }
    }

    #[test]
    fn inverted_range_is_empty() {
        let table = sample();
        let filtered = apply_filter(&table, &spec("2017-03-01", "2017-01-01", PaymentFilter::All));
        assert!(filtered.is_empty());
        assert_eq!(filtered.date_span, None);
    }

    #[test]
    fn payment_constraint_is_exact() {
        let table = sample();
        let only_card = spec(
            "2016-01-01",
            "2019-01-01",
            PaymentFilter::Only("credit_card".to_string()),
        );
        assert_eq!(filtered_indices(&table, &only_card), vec![0, 3]);

        let prefix = spec("2016-01-01", "2019-01-01", PaymentFilter::Only("credit".into()));
        assert!(filtered_indices(&table, &prefix).is_empty());
    }

    #[test]
    fn all_keeps_sentinel_rows() {
        let table = sample();
        let all = spec("2017-02-01", "2017-02-01", PaymentFilter::All);
        let filtered = apply_filter(&table, &all);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.transactions[0].payment_type, "not_defined");
    }

    #[test]
    fn refiltering_with_containing_range_is_identity() {
        let table = sample();
        let first = apply_filter(&table, &spec("2017-01-01", "2017-02-28", PaymentFilter::All));
        let again = apply_filter(&first, &spec("2016-12-01", "2017-12-31", PaymentFilter::All));
        assert_eq!(first, again);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn covering_spec_passes_everything_and_source_is_untouched() {
        let table = sample();
        let before = table.clone();
        let filtered = apply_filter(&table, &FilterSpec::covering(&table));
        assert_eq!(filtered.transactions, table.transactions);
        assert_eq!(table, before);
    }

    #[test]
    fn covering_an_empty_table_uses_real_dates() {
        let spec = FilterSpec::covering(&TransactionTable::default());
        assert_eq!(spec.start, spec.end);
        assert!(spec.start.pred_opt().is_some());
        assert!(spec.end.succ_opt().is_some());
        assert_eq!(spec.payment, PaymentFilter::All);
    }

    #[test]
    fn sentinel_is_not_selectable() {
        let table = sample();
        assert_eq!(
            selectable_payment_types(&table),
            vec!["boleto".to_string(), "credit_card".to_string()]
        );
    }
}
