/// Data layer: schema, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (typed per schema)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop nulls, duplicates, irrelevant columns
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ CampaignDataset  │  Vec<Record>, category option sets
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  mean / sum / group-by
///   └───────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;

use std::path::Path;

pub use error::DataError;
pub use model::CampaignDataset;

/// Load, clean and type a campaign dataset.
pub fn load_dataset(path: &Path) -> error::Result<CampaignDataset> {
    let table = loader::load_file(path)?;
    let cleaned = clean::clean(table);
    CampaignDataset::from_table(&cleaned)
}
