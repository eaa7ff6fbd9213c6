use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::Choice;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Any edit re-runs filter and aggregation.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (data_age_min, data_age_max) = state
        .dataset
        .age_range()
        .unwrap_or(state.config.default_age_range);
    let (data_income_min, data_income_max) = state.dataset.income_range().unwrap_or((0.0, 0.0));

    let AppState {
        filters, dataset, ..
    } = state;
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // Widen slider ranges so the configured defaults stay visible
            // when the data covers a narrower window.
            let age_range = data_age_min.min(filters.age_min)..=data_age_max.max(filters.age_max);
            ui.strong("Select Age Range");
            if ui
                .add(Slider::new(&mut filters.age_min, age_range.clone()).text("from"))
                .changed()
            {
                filters.age_max = filters.age_max.max(filters.age_min);
                changed = true;
            }
            if ui
                .add(Slider::new(&mut filters.age_max, age_range).text("to"))
                .changed()
            {
                filters.age_min = filters.age_min.min(filters.age_max);
                changed = true;
            }
            ui.separator();

            changed |= choice_combo(
                ui,
                "channel_filter",
                "Select Campaign Channel",
                &mut filters.channel,
                &dataset.channels,
            );
            changed |= choice_combo(
                ui,
                "gender_filter",
                "Select Gender",
                &mut filters.gender,
                &dataset.genders,
            );
            ui.separator();

            let income_range = data_income_min.min(filters.income_min)
                ..=data_income_max.max(filters.income_max);
            ui.strong("Select Income Range");
            if ui
                .add(
                    Slider::new(&mut filters.income_min, income_range.clone())
                        .text("from")
                        .fixed_decimals(0),
                )
                .changed()
            {
                filters.income_max = filters.income_max.max(filters.income_min);
                changed = true;
            }
            if ui
                .add(
                    Slider::new(&mut filters.income_max, income_range)
                        .text("to")
                        .fixed_decimals(0),
                )
                .changed()
            {
                filters.income_min = filters.income_min.min(filters.income_max);
                changed = true;
            }
            ui.separator();
        });

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    } else if changed {
        state.refresh();
    }
}

/// Combo box over `options` plus an "All" entry mapped to [`Choice::Any`].
fn choice_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    choice: &mut Choice,
    options: &BTreeSet<String>,
) -> bool {
    let mut changed = false;
    let selected_text = match choice {
        Choice::Any => "All".to_string(),
        Choice::Only(value) => value.clone(),
    };

    ui.strong(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            changed |= ui.selectable_value(choice, Choice::Any, "All").changed();
            for option in options {
                changed |= ui
                    .selectable_value(choice, Choice::Only(option.clone()), option)
                    .changed();
            }
        });
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} campaigns loaded, {} match filters",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open campaign data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
