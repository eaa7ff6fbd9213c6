use std::collections::BTreeMap;

use crate::data::aggregate::{self, Buckets, Reducer};
use crate::data::filter::FilteredView;
use crate::data::model::{Field, Value};

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiFormat {
    Ratio,
    Currency,
}

/// A scalar metric shown as a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub label: &'static str,
    /// `None` when the view has no rows.
    pub value: Option<f64>,
    pub format: KpiFormat,
}

impl Kpi {
    pub fn display_value(&self) -> String {
        match (self.value, self.format) {
            (None, _) => "No data".to_string(),
            (Some(v), KpiFormat::Ratio) => format!("{v:.2}"),
            (Some(v), KpiFormat::Currency) => format_currency(v),
        }
    }
}

/// `$1,234,567.89`
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{cents}")
}

// ---------------------------------------------------------------------------
// Dashboard: everything the UI draws for one filtered view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub visible: usize,
    pub total: usize,
    pub kpis: [Kpi; 3],
    /// Sum of ConversionRate per income bracket, bracket order.
    pub conversion_by_income: Vec<(String, f64)>,
    /// Mean ConversionRate per TimeOnSite value.
    pub conversion_by_time_on_site: BTreeMap<Value, f64>,
    /// Mean ConversionRate per Age.
    pub conversion_by_age: BTreeMap<Value, f64>,
    /// Mean LoyaltyPoints per CampaignType.
    pub loyalty_by_campaign_type: BTreeMap<Value, f64>,
    /// Sum of PreviousPurchases per SocialShares count.
    pub purchases_by_social_shares: BTreeMap<Value, f64>,
}

impl Dashboard {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let records = view.records();

        let kpis = [
            Kpi {
                label: "Average CTR",
                value: aggregate::mean(&records, Field::ClickThroughRate),
                format: KpiFormat::Ratio,
            },
            Kpi {
                label: "Average Conversion Rate",
                value: aggregate::mean(&records, Field::ConversionRate),
                format: KpiFormat::Ratio,
            },
            Kpi {
                label: "Total Ad Spend (USD)",
                value: aggregate::sum(&records, Field::AdSpend),
                format: KpiFormat::Currency,
            },
        ];

        let dashboard = Dashboard {
            visible: view.len(),
            total: view.dataset.len(),
            kpis,
            conversion_by_income: aggregate::group_by_bucket(
                &records,
                Field::Income,
                &Buckets::income(),
                Field::ConversionRate,
            ),
            conversion_by_time_on_site: aggregate::group_by_value(
                &records,
                Field::TimeOnSite,
                Field::ConversionRate,
                Reducer::Mean,
            ),
            conversion_by_age: aggregate::group_by_value(
                &records,
                Field::Age,
                Field::ConversionRate,
                Reducer::Mean,
            ),
            loyalty_by_campaign_type: aggregate::group_by_value(
                &records,
                Field::CampaignType,
                Field::LoyaltyPoints,
                Reducer::Mean,
            ),
            // Grouped by SocialShares, not CampaignType; see DESIGN.md.
            purchases_by_social_shares: aggregate::group_by_value(
                &records,
                Field::SocialShares,
                Field::PreviousPurchases,
                Reducer::Sum,
            ),
        };

        log::debug!(
            "Dashboard recomputed: {}/{} records visible",
            dashboard.visible,
            dashboard.total
        );
        dashboard
    }

    pub fn is_empty(&self) -> bool {
        self.visible == 0
    }
}
