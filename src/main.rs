use anyhow::{anyhow, Context};
use campaign_lens::app::CampaignLensApp;
use campaign_lens::state::AppState;
use campaign_lens::{load_dataset, DashboardConfig};
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // The dashboard cannot start without a dataset.
    let dataset = match load_dataset(&config.dataset_path)
        .with_context(|| format!("loading {}", config.dataset_path.display()))
    {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load dataset: {e:#}");
            return Err(e);
        }
    };
    log::info!("Loaded {} campaigns", dataset.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let state = AppState::new(config, dataset);

    eframe::run_native(
        "Campaign Lens – Digital Marketing Campaign Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(CampaignLensApp::new(state)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
