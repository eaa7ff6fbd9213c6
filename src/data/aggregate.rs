use std::collections::BTreeMap;

use super::error::{DataError, Result};
use super::model::{Field, Record, Value};

// ---------------------------------------------------------------------------
// Scalar summaries
// ---------------------------------------------------------------------------

/// Mean of a numeric field; `None` when there is nothing to average.
pub fn mean(records: &[&Record], field: Field) -> Option<f64> {
    let (total, count) = records
        .iter()
        .filter_map(|r| field.numeric(r))
        .fold((0.0, 0usize), |(t, c), v| (t + v, c + 1));
    (count > 0).then(|| total / count as f64)
}

/// Sum of a numeric field; `None` over an empty subset.
pub fn sum(records: &[&Record], field: Field) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(|r| field.numeric(r)).collect();
    (!values.is_empty()).then(|| values.iter().sum())
}

// ---------------------------------------------------------------------------
// Bucketed grouping
// ---------------------------------------------------------------------------

/// Contiguous right-closed bins `(edges[i], edges[i + 1]]`, one label each.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets {
    edges: Vec<f64>,
    labels: Vec<String>,
}

impl Buckets {
    pub fn new(edges: Vec<f64>, labels: Vec<String>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(DataError::InvalidBuckets("need at least two edges".into()));
        }
        if labels.len() != edges.len() - 1 {
            return Err(DataError::InvalidBuckets(format!(
                "{} edges need {} labels, got {}",
                edges.len(),
                edges.len() - 1,
                labels.len()
            )));
        }
        if !edges.windows(2).all(|w| w[0] < w[1]) {
            return Err(DataError::InvalidBuckets("edges must be strictly increasing".into()));
        }
        Ok(Buckets { edges, labels })
    }

    /// Income brackets used by the conversion chart.
    pub fn income() -> Self {
        Buckets {
            edges: vec![0.0, 30_000.0, 60_000.0, 90_000.0, 120_000.0, 150_000.0],
            labels: ["<30k", "30k-60k", "60k-90k", "90k-120k", "120k+"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the bin holding `value`, `None` when outside every bin.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        self.edges
            .windows(2)
            .position(|w| value > w[0] && value <= w[1])
    }
}

/// Sum `target` per bin of `field`, one entry per label in bin order.
///
/// Bins without records report `0.0`; records outside every bin are skipped.
pub fn group_by_bucket(
    records: &[&Record],
    field: Field,
    buckets: &Buckets,
    target: Field,
) -> Vec<(String, f64)> {
    let mut sums = vec![0.0; buckets.labels.len()];
    for r in records {
        let (Some(v), Some(t)) = (field.numeric(r), target.numeric(r)) else {
            continue;
        };
        if let Some(bin) = buckets.bin_of(v) {
            sums[bin] += t;
        }
    }
    buckets.labels.iter().cloned().zip(sums).collect()
}

// ---------------------------------------------------------------------------
// Grouping by distinct value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Sum,
}

/// Reduce `target` per distinct value of `key`, keys in ascending order.
pub fn group_by_value(
    records: &[&Record],
    key: Field,
    target: Field,
    reducer: Reducer,
) -> BTreeMap<Value, f64> {
    let mut groups: BTreeMap<Value, (f64, usize)> = BTreeMap::new();
    for r in records {
        let Some(t) = target.numeric(r) else {
            continue;
        };
        let entry = groups.entry(key.value(r)).or_insert((0.0, 0));
        entry.0 += t;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (total, count))| {
            let reduced = match reducer {
                Reducer::Sum => total,
                Reducer::Mean => total / count as f64,
            };
            (k, reduced)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn refs(records: &[Record]) -> Vec<&Record> {
        records.iter().collect()
    }

    #[test]
    fn empty_subset_has_no_data() {
        assert_eq!(mean(&[], Field::ConversionRate), None);
        assert_eq!(sum(&[], Field::AdSpend), None);
        assert!(group_by_value(&[], Field::Age, Field::ConversionRate, Reducer::Mean).is_empty());
        let bins = group_by_bucket(&[], Field::Income, &Buckets::income(), Field::ConversionRate);
        assert!(bins.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn mean_and_sum_over_records() {
        let rs = vec![record(20, 1.0, 0.1), record(30, 1.0, 0.3)];
        let mean_cr = mean(&refs(&rs), Field::ConversionRate).unwrap();
        assert!((mean_cr - 0.2).abs() < 1e-12);
        assert_eq!(sum(&refs(&rs), Field::AdSpend), Some(2000.0));
    }

    #[test]
    fn categorical_fields_have_no_mean() {
        let rs = vec![record(20, 1.0, 0.1)];
        assert_eq!(mean(&refs(&rs), Field::Gender), None);
    }

    #[test]
    fn bucket_keys_follow_bin_order() {
        let rs = vec![
            record(20, 130_000.0, 0.5),
            record(20, 10_000.0, 0.25),
            record(20, 70_000.0, 0.125),
        ];
        let bins = group_by_bucket(&refs(&rs), Field::Income, &Buckets::income(), Field::ConversionRate);
        let labels: Vec<&str> = bins.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["<30k", "30k-60k", "60k-90k", "90k-120k", "120k+"]);
        assert_eq!(bins[0].1, 0.25);
        assert_eq!(bins[1].1, 0.0);
        assert_eq!(bins[2].1, 0.125);
        assert_eq!(bins[4].1, 0.5);
    }

    #[test]
    fn bins_are_right_closed() {
        let b = Buckets::income();
        assert_eq!(b.bin_of(0.0), None);
        assert_eq!(b.bin_of(1.0), Some(0));
        assert_eq!(b.bin_of(30_000.0), Some(0));
        assert_eq!(b.bin_of(30_000.5), Some(1));
        assert_eq!(b.bin_of(150_000.0), Some(4));
        assert_eq!(b.bin_of(150_001.0), None);
    }

    #[test]
    fn out_of_range_income_is_excluded() {
        let rs = vec![record(20, 150_001.0, 0.9), record(20, 100_000.0, 0.1)];
        let bins = group_by_bucket(&refs(&rs), Field::Income, &Buckets::income(), Field::ConversionRate);
        let total: f64 = bins.iter().map(|(_, v)| v).sum();
        assert!((total - 0.1).abs() < 1e-12);
    }

    #[test]
    fn bucket_layout_is_validated() {
        assert!(Buckets::new(vec![0.0], vec![]).is_err());
        assert!(Buckets::new(vec![0.0, 1.0], vec![]).is_err());
        assert!(Buckets::new(vec![0.0, 2.0, 1.0], vec!["a".into(), "b".into()]).is_err());
        let b = Buckets::new(vec![0.0, 1.0, 2.0], vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(b.labels(), ["a", "b"]);
    }

    #[test]
    fn group_by_value_sorts_keys_and_reduces() {
        let mut rs = vec![record(40, 1.0, 0.4), record(20, 1.0, 0.1), record(40, 1.0, 0.2)];
        rs[0].previous_purchases = 5;
        rs[2].previous_purchases = 7;

        let by_age = group_by_value(&refs(&rs), Field::Age, Field::ConversionRate, Reducer::Mean);
        let keys: Vec<&Value> = by_age.keys().collect();
        assert_eq!(keys, [&Value::Integer(20), &Value::Integer(40)]);
        assert!((by_age[&Value::Integer(40)] - 0.3).abs() < 1e-12);

        let purchases = group_by_value(&refs(&rs), Field::Age, Field::PreviousPurchases, Reducer::Sum);
        assert_eq!(purchases[&Value::Integer(40)], 12.0);
        assert_eq!(purchases[&Value::Integer(20)], 2.0);
    }

    #[test]
    fn group_by_categorical_key() {
        let mut rs = vec![record(20, 1.0, 0.1), record(20, 1.0, 0.1)];
        rs[0].campaign_type = "Retention".into();
        rs[0].loyalty_points = 300;
        let by_type = group_by_value(&refs(&rs), Field::CampaignType, Field::LoyaltyPoints, Reducer::Mean);
        let keys: Vec<String> = by_type.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["Awareness", "Retention"]);
        assert_eq!(by_type[&Value::Text("Retention".into())], 300.0);
    }
}
