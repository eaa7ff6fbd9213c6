use std::path::PathBuf;

/// Start-up settings of the dashboard. There is no config file or CLI; `main`
/// builds the default and hands it to the app.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Dataset loaded at start-up.
    pub dataset_path: PathBuf,
    /// Initial age window of the filter panel.
    pub default_age_range: (i64, i64),
    /// Rows shown in the preview table.
    pub preview_rows: usize,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("digital_marketing_campaign_dataset.csv"),
            default_age_range: (18, 65),
            preview_rows: 200,
            window_size: [1400.0, 900.0],
        }
    }
}
