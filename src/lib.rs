//! Campaign Lens: an egui dashboard over a digital marketing campaign dataset.
//!
//! The pipeline is load → clean → filter → aggregate → display, re-run on
//! every filter change. Everything up to [`dashboard::Dashboard`] is plain
//! data code and usable without a window.

pub mod app;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod state;
pub mod ui;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use data::filter::{filter, Choice, FilterSpec, FilteredView};
pub use data::{load_dataset, CampaignDataset, DataError};
