use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::color::generate_palette;
use crate::dashboard::Kpi;
use crate::data::model::Value;
use crate::state::AppState;
use crate::ui::table;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Central panel: KPI row, charts, preview table
// ---------------------------------------------------------------------------

pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let dashboard = &state.dashboard;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Conversion Data Analysis");
            ui.add_space(4.0);

            kpi_row(ui, &dashboard.kpis);
            ui.separator();

            if dashboard.is_empty() {
                ui.label(
                    RichText::new("No campaigns match the current filters.")
                        .color(Color32::GRAY),
                );
            }

            ui.columns(2, |cols: &mut [Ui]| {
                let palette = generate_palette(dashboard.conversion_by_income.len());
                let income_bars: Vec<(String, f64, Color32)> = dashboard
                    .conversion_by_income
                    .iter()
                    .zip(palette)
                    .map(|((label, v), c)| (label.clone(), *v, c))
                    .collect();
                category_bars(
                    &mut cols[0],
                    "income_chart",
                    "Conversion by Income Bracket",
                    "Σ conversion rate",
                    &income_bars,
                );
                numeric_series(
                    &mut cols[0],
                    "time_chart",
                    "Time Spent vs Conversion Rate",
                    &dashboard.conversion_by_time_on_site,
                    SeriesStyle::Area,
                );

                numeric_series(
                    &mut cols[1],
                    "age_chart",
                    "Age vs Conversion Rate",
                    &dashboard.conversion_by_age,
                    SeriesStyle::Line,
                );
                let type_bars: Vec<(String, f64, Color32)> = dashboard
                    .loyalty_by_campaign_type
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v, state.campaign_type_colors.color_for(k)))
                    .collect();
                category_bars(
                    &mut cols[1],
                    "campaign_type_chart",
                    "Loyalty Points by Campaign Type",
                    "mean loyalty points",
                    &type_bars,
                );
            });

            numeric_series(
                ui,
                "social_shares_chart",
                "Previous Purchases by Social Shares",
                &dashboard.purchases_by_social_shares,
                SeriesStyle::Scatter,
            );

            ui.separator();
            table::preview(ui, state);
        });
}

fn kpi_row(ui: &mut Ui, kpis: &[Kpi]) {
    ui.columns(kpis.len(), |cols: &mut [Ui]| {
        for (col, kpi) in cols.iter_mut().zip(kpis) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(kpi.label);
                ui.label(RichText::new(kpi.display_value()).size(26.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Chart primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum SeriesStyle {
    Line,
    Area,
    Scatter,
}

/// Bars at x = 0, 1, 2 … labelled with their category.
fn category_bars(ui: &mut Ui, id: &str, title: &str, y_label: &str, entries: &[(String, f64, Color32)]) {
    ui.strong(title);
    let labels: Vec<String> = entries.iter().map(|(l, _, _)| l.clone()).collect();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, v, color))| Bar::new(i as f64, *v).name(label).fill(*color).width(0.7))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Label for integral grid marks that index a category; empty otherwise.
fn category_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

/// Plot a numeric-keyed series; keys without a numeric reading are skipped.
fn numeric_series(ui: &mut Ui, id: &str, title: &str, series: &BTreeMap<Value, f64>, style: SeriesStyle) {
    ui.strong(title);
    let points: Vec<[f64; 2]> = series
        .iter()
        .filter_map(|(k, v)| k.as_f64().map(|x| [x, *v]))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| match style {
            SeriesStyle::Line => {
                plot_ui.line(Line::new(PlotPoints::from(points)).color(Color32::LIGHT_BLUE).width(1.5));
            }
            SeriesStyle::Area => {
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .color(Color32::LIGHT_GREEN)
                        .fill(0.0),
                );
            }
            SeriesStyle::Scatter => {
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .color(Color32::GOLD)
                        .radius(3.0),
                );
            }
        });
}
