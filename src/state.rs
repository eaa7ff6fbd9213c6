use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::filter::{filter, FilterSpec};
use crate::data::model::Value;
use crate::data::{self, CampaignDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Cleaned dataset; replaced only through File → Open.
    pub dataset: CampaignDataset,

    /// Current sidebar selections.
    pub filters: FilterSpec,

    /// Indices of records passing the current filters.
    pub visible_indices: Vec<usize>,

    /// KPIs and chart series for `visible_indices`.
    pub dashboard: Dashboard,

    /// Stable colour per campaign type across filter changes.
    pub campaign_type_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, dataset: CampaignDataset) -> Self {
        let filters = FilterSpec::initial(&dataset, &config);
        let view = filter(&dataset, &filters);
        let dashboard = Dashboard::compute(&view);
        let visible_indices = view.indices;
        let campaign_type_colors = campaign_type_colors(&dataset);

        Self {
            config,
            dataset,
            filters,
            visible_indices,
            dashboard,
            campaign_type_colors,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset filters to their defaults.
    pub fn set_dataset(&mut self, dataset: CampaignDataset) {
        self.campaign_type_colors = campaign_type_colors(&dataset);
        self.dataset = dataset;
        self.status_message = None;
        self.reset_filters();
    }

    /// Load, clean and install the dataset at `path`.
    /// On failure the current dataset stays in place.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let dataset = data::load_dataset(path)
            .with_context(|| format!("loading {}", path.display()))?;
        log::info!(
            "Loaded {} campaigns from {}",
            dataset.len(),
            path.display()
        );
        self.set_dataset(dataset);
        Ok(())
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterSpec::initial(&self.dataset, &self.config);
        self.refresh();
    }

    /// Re-run filter and aggregation after a filter change.
    pub fn refresh(&mut self) {
        let view = filter(&self.dataset, &self.filters);
        self.dashboard = Dashboard::compute(&view);
        self.visible_indices = view.indices;
    }
}

fn campaign_type_colors(dataset: &CampaignDataset) -> ColorMap {
    ColorMap::new(dataset.campaign_types.iter().cloned().map(Value::Text))
}
