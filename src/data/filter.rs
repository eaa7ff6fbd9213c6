use crate::config::DashboardConfig;

use super::model::{CampaignDataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: the sidebar selections
// ---------------------------------------------------------------------------

/// A categorical selection: every value, or exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice {
    #[default]
    Any,
    Only(String),
}

impl Choice {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::Any => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

/// User-selected constraints. All bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub age_min: i64,
    pub age_max: i64,
    pub channel: Choice,
    pub gender: Choice,
    pub income_min: f64,
    pub income_max: f64,
}

impl FilterSpec {
    /// Bounds covering every record of `dataset`, no categorical constraint.
    pub fn everything(dataset: &CampaignDataset) -> Self {
        let (age_min, age_max) = dataset.age_range().unwrap_or((0, 0));
        let (income_min, income_max) = dataset.income_range().unwrap_or((0.0, 0.0));
        FilterSpec {
            age_min,
            age_max,
            channel: Choice::Any,
            gender: Choice::Any,
            income_min,
            income_max,
        }
    }

    /// Dashboard defaults: the configured age window over the full income range.
    pub fn initial(dataset: &CampaignDataset, config: &DashboardConfig) -> Self {
        let (age_min, age_max) = config.default_age_range;
        FilterSpec {
            age_min,
            age_max,
            ..Self::everything(dataset)
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        (self.age_min..=self.age_max).contains(&record.age)
            && self.channel.matches(&record.campaign_channel)
            && self.gender.matches(&record.gender)
            && record.income >= self.income_min
            && record.income <= self.income_max
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The records of a dataset passing a [`FilterSpec`], by row index.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub dataset: &'a CampaignDataset,
    /// Ascending indices into `dataset.records`.
    pub indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> Vec<&'a Record> {
        let dataset = self.dataset;
        self.indices.iter().map(|&i| &dataset.records[i]).collect()
    }
}

/// Return indices of records that pass every predicate of `spec`.
pub fn filtered_indices(dataset: &CampaignDataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| spec.matches(r))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter<'a>(dataset: &'a CampaignDataset, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView {
        dataset,
        indices: filtered_indices(dataset, spec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn dataset() -> CampaignDataset {
        let mut records = Vec::new();
        for (i, age) in [18, 25, 33, 47, 52, 69].into_iter().enumerate() {
            let mut r = record(age, 20_000.0 + i as f64 * 25_000.0, 0.1);
            r.campaign_channel = ["Email", "SEO", "PPC"][i % 3].into();
            r.gender = ["Female", "Male"][i % 2].into();
            records.push(r);
        }
        CampaignDataset::from_records(records)
    }

    #[test]
    fn everything_returns_whole_dataset() {
        let ds = dataset();
        let view = filter(&ds, &FilterSpec::everything(&ds));
        assert_eq!(view.indices, (0..ds.len()).collect::<Vec<_>>());
    }

    #[test]
    fn matches_respect_every_constraint() {
        let ds = dataset();
        let spec = FilterSpec {
            age_min: 20,
            age_max: 60,
            channel: Choice::Any,
            gender: Choice::Only("Male".into()),
            income_min: 0.0,
            income_max: 100_000.0,
        };
        let view = filter(&ds, &spec);
        assert_eq!(view.indices, vec![1, 3]);
        for r in view.records() {
            assert!(r.age >= 20 && r.age <= 60);
            assert_eq!(r.gender, "Male");
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = dataset();
        let spec = FilterSpec {
            age_min: 25,
            age_max: 47,
            income_min: 45_000.0,
            income_max: 95_000.0,
            ..FilterSpec::everything(&ds)
        };
        assert_eq!(filtered_indices(&ds, &spec), vec![1, 2, 3]);
    }

    #[test]
    fn a_category_named_all_is_matchable() {
        let mut r = record(30, 50_000.0, 0.1);
        r.campaign_channel = "All".into();
        let ds = CampaignDataset::from_records(vec![r, record(31, 50_000.0, 0.1)]);
        let spec = FilterSpec {
            channel: Choice::Only("All".into()),
            ..FilterSpec::everything(&ds)
        };
        assert_eq!(filtered_indices(&ds, &spec), vec![0]);
    }

    #[test]
    fn unknown_channel_gives_empty_view() {
        let ds = dataset();
        let spec = FilterSpec {
            channel: Choice::Only("Billboard".into()),
            ..FilterSpec::everything(&ds)
        };
        let view = filter(&ds, &spec);
        assert!(view.is_empty());
        assert_eq!(ds.len(), 6);
    }

    #[test]
    fn initial_uses_configured_age_window() {
        let ds = dataset();
        let spec = FilterSpec::initial(&ds, &DashboardConfig::default());
        assert_eq!((spec.age_min, spec.age_max), (18, 65));
        assert_eq!((spec.income_min, spec.income_max), (20_000.0, 145_000.0));
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 1, 2, 3, 4]);
    }
}
