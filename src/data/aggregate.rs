use std::collections::HashMap;
use std::fmt;

use super::model::{Transaction, TransactionTable};
use crate::config::{ClusterThresholds, UNDEFINED_PAYMENT_TYPE};

// ---------------------------------------------------------------------------
// Category counting
// ---------------------------------------------------------------------------

/// One bar / slice: a category label and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Count rows per key, skipping empty keys.
///
/// Result is sorted by count descending.  Equal counts keep the order in
/// which their key was first seen, so the output is deterministic for a
/// fixed input.
fn count_by<'a, I, F>(rows: I, key: F) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for tx in rows {
        let k = key(tx);
        if k.is_empty() {
            continue;
        }
        match slots.get(k) {
            Some(&i) => counts[i].count += 1,
            None => {
                slots.insert(k, counts.len());
                counts.push(CategoryCount {
                    label: k.to_string(),
                    count: 1,
                });
            }
        }
    }

    // `sort_by` is stable: ties stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ---------------------------------------------------------------------------
// City ranking
// ---------------------------------------------------------------------------

/// The `limit` cities with the most purchase rows, most frequent first.
pub fn top_cities(table: &TransactionTable, limit: usize) -> Vec<CategoryCount> {
    let mut counts = count_by(table.iter(), |tx| tx.customer_city.as_str());
    counts.truncate(limit);
    counts
}

// ---------------------------------------------------------------------------
// Payment distribution
// ---------------------------------------------------------------------------

/// Rows per payment type, sentinel excluded, most frequent first.
pub fn payment_distribution(table: &TransactionTable) -> Vec<CategoryCount> {
    count_by(
        table
            .iter()
            .filter(|tx| tx.payment_type != UNDEFINED_PAYMENT_TYPE),
        |tx| tx.payment_type.as_str(),
    )
}

// ---------------------------------------------------------------------------
// Customer frequency buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterLabel {
    Low,
    Medium,
    High,
}

impl ClusterLabel {
    /// Display order.
    pub const ALL: [ClusterLabel; 3] = [ClusterLabel::Low, ClusterLabel::Medium, ClusterLabel::High];

    /// Bucket for a per-customer transaction count.
    pub fn classify(count: usize, thresholds: &ClusterThresholds) -> Self {
        if count <= thresholds.low_max {
            ClusterLabel::Low
        } else if count <= thresholds.medium_max {
            ClusterLabel::Medium
        } else {
            ClusterLabel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterLabel::Low => "Low",
            ClusterLabel::Medium => "Medium",
            ClusterLabel::High => "High",
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of customers per bucket.  All three buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl ClusterCounts {
    pub fn get(&self, label: ClusterLabel) -> usize {
        match label {
            ClusterLabel::Low => self.low,
            ClusterLabel::Medium => self.medium,
            ClusterLabel::High => self.high,
        }
    }

    fn bump(&mut self, label: ClusterLabel) {
        match label {
            ClusterLabel::Low => self.low += 1,
            ClusterLabel::Medium => self.medium += 1,
            ClusterLabel::High => self.high += 1,
        }
    }

    /// `(label, customers)` in Low, Medium, High order.
    pub fn entries(&self) -> [(ClusterLabel, usize); 3] {
        ClusterLabel::ALL.map(|label| (label, self.get(label)))
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Line items per customer, most active first.  Every row counts, so
/// several items of one order count separately.
pub fn customer_frequencies(table: &TransactionTable) -> Vec<CategoryCount> {
    count_by(table.iter(), |tx| tx.customer_id.as_str())
}

/// Bucket every distinct customer by transaction count.
pub fn customer_clusters(table: &TransactionTable, thresholds: &ClusterThresholds) -> ClusterCounts {
    let mut counts = ClusterCounts::default();
    for freq in customer_frequencies(table) {
        counts.bump(ClusterLabel::classify(freq.count, thresholds));
    }
    counts
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::fixtures::tx;

    const TS: &str = "2018-01-01 09:00:00";

    fn table_of(rows: &[(&str, &str, &str)]) -> TransactionTable {
        TransactionTable::from_transactions(
            rows.iter()
                .map(|(customer, city, payment)| tx(customer, city, payment, TS))
                .collect(),
        )
    }

    fn as_pairs(counts: &[CategoryCount]) -> Vec<(&str, usize)> {
        counts.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    #[test]
    fn city_ranking_is_sorted_and_capped() {
        let mut rows = Vec::new();
        let cities: Vec<String> = (0..14).map(|i| format!("city{i:02}")).collect();
        for (i, city) in cities.iter().enumerate() {
            for _ in 0..=(i % 5) {
                rows.push(tx("c", city, "boleto", TS));
            }
        }
        let table = TransactionTable::from_transactions(rows);

        let ranking = top_cities(&table, 10);
        assert_eq!(ranking.len(), 10);
        assert!(ranking.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(ranking[0].count, 5);
    }

    #[test]
    fn city_ties_keep_first_seen_order() {
        let table = table_of(&[
            ("a", "recife", "boleto"),
            ("b", "natal", "boleto"),
            ("c", "santos", "boleto"),
            ("d", "natal", "boleto"),
            ("e", "recife", "boleto"),
        ]);
        assert_eq!(
            as_pairs(&top_cities(&table, 10)),
            vec![("recife", 2), ("natal", 2), ("santos", 1)]
        );
    }

    #[test]
    fn fewer_cities_than_limit() {
        let table = table_of(&[("a", "recife", "boleto"), ("b", "", "boleto")]);
        assert_eq!(as_pairs(&top_cities(&table, 10)), vec![("recife", 1)]);
    }

    #[test]
    fn payment_distribution_drops_sentinel() {
        let table = table_of(&[
            ("a", "x", "credit_card"),
            ("b", "x", "credit_card"),
            ("c", "x", "not_defined"),
            ("d", "x", "boleto"),
        ]);
        let dist = payment_distribution(&table);
        assert_eq!(as_pairs(&dist), vec![("credit_card", 2), ("boleto", 1)]);
        assert!(dist.iter().all(|c| c.label != UNDEFINED_PAYMENT_TYPE));
    }

    #[test]
    fn only_sentinel_rows_give_empty_distribution() {
        let table = table_of(&[("a", "x", "not_defined"), ("b", "x", "not_defined")]);
        assert!(payment_distribution(&table).is_empty());
    }

    #[test]
    fn classify_uses_fixed_boundaries() {
        let t = ClusterThresholds::DEFAULT;
        let labels: Vec<ClusterLabel> = (1..=7).map(|n| ClusterLabel::classify(n, &t)).collect();
        assert_eq!(
            labels,
            vec![
                ClusterLabel::Low,
                ClusterLabel::Low,
                ClusterLabel::Medium,
                ClusterLabel::Medium,
                ClusterLabel::Medium,
                ClusterLabel::High,
                ClusterLabel::High,
            ]
        );
    }

    #[test]
    fn three_rows_for_a_and_one_for_b() {
        let table = table_of(&[
            ("A", "x", "boleto"),
            ("A", "x", "boleto"),
            ("A", "x", "voucher"),
            ("B", "y", "boleto"),
        ]);
        let clusters = customer_clusters(&table, &ClusterThresholds::DEFAULT);
        assert_eq!(
            clusters.entries(),
            [
                (ClusterLabel::Low, 1),
                (ClusterLabel::Medium, 1),
                (ClusterLabel::High, 0),
            ]
        );
    }

    #[test]
    fn bucket_total_equals_distinct_customers() {
        let mut rows = Vec::new();
        for (i, customer) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            for _ in 0..(i * 2 + 1) {
                rows.push(tx(customer, "x", "boleto", TS));
            }
        }
        let table = TransactionTable::from_transactions(rows);
        let distinct: BTreeSet<&str> = table.iter().map(|t| t.customer_id.as_str()).collect();

        let clusters = customer_clusters(&table, &ClusterThresholds::DEFAULT);
        assert_eq!(clusters.total(), distinct.len());
        assert_eq!((clusters.low, clusters.medium, clusters.high), (1, 2, 2));
    }

    #[test]
    fn empty_table_degrades_to_empty_results() {
        let table = TransactionTable::default();
        assert!(top_cities(&table, 10).is_empty());
        assert!(payment_distribution(&table).is_empty());
        let clusters = customer_clusters(&table, &ClusterThresholds::DEFAULT);
        assert_eq!(clusters, ClusterCounts::default());
        assert_eq!(clusters.entries().len(), 3);
    }
}
