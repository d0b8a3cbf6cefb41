//! Usage aggregator.
//!
//! Turns the monthly dataset plus a [`ViewState`] into everything the usage
//! charts draw: totals for the last selected month, a per-service breakdown
//! with month-over-month growth, the share distribution with small services
//! folded into "Other Services", growth averages and the stacked monthly
//! series. Every call recomputes from the records; nothing is cached.

mod filter;
mod series;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::schema::UsageConfig;
use crate::data::services::{OTHER_SERVICES_COLOR, OTHER_SERVICES_NAME};
use crate::data::{Dataset, MonthlyUsageRecord, ServiceKey};

pub use filter::{
    Selection, TimeRange, Unit, ViewState, filter_records, parse_months, parse_services,
};
pub use series::{SpendPoint, SpendSeries, insights, spend_series};

/// Percentage change from `previous` to `current`. Exactly `0.0` when
/// `previous` is zero.
pub fn growth_rate(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Tunables for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorSettings {
    /// Shares strictly below this percentage are grouped.
    pub other_threshold_pct: f64,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            other_threshold_pct: 5.0,
        }
    }
}

impl From<&UsageConfig> for AggregatorSettings {
    fn from(cfg: &UsageConfig) -> Self {
        Self {
            other_threshold_pct: cfg.other_threshold_pct,
        }
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Headline numbers of a usage view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageTotals {
    /// Selected services in the last selected month, in the view's unit.
    pub last_month_total: f64,
    /// Selected services summed over all selected months.
    pub filtered_total: f64,
    /// `sumOfCredits` of the last selected month.
    pub total_credits: f64,
    /// `totalCost` of the last selected month.
    pub total_cost: f64,
}

/// One bar of the service breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceUsageRow {
    pub key: ServiceKey,
    pub name: &'static str,
    pub color: &'static str,
    pub usage: f64,
    /// Whole-percent change against the previous selected month.
    pub growth: f64,
}

/// One slice of the share distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub color: String,
    /// Share of the last-month total, in percent.
    pub value: f64,
    /// Usage behind the share, in the view's unit.
    pub actual_value: f64,
    pub is_group: bool,
    /// Grouped services, for drill-down. Empty unless `is_group`.
    pub members: Vec<CategorySlice>,
}

impl CategorySlice {
    fn single(row: &ServiceUsageRow, share: f64) -> Self {
        Self {
            name: row.name.to_string(),
            color: row.color.to_string(),
            value: share,
            actual_value: row.usage,
            is_group: false,
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GrowthSummary {
    /// Mean month-over-month growth of total credits, whole percent.
    pub average: f64,
    /// Mean of the last three rates, one decimal.
    pub recent: f64,
}

/// One stacked bar of the monthly series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub values: BTreeMap<ServiceKey, f64>,
    pub total: f64,
}

/// Everything the usage view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageView {
    pub mode: Unit,
    pub range: TimeRange,
    pub months: Vec<String>,
    pub last_month: Option<String>,
    pub totals: UsageTotals,
    pub services: Vec<ServiceUsageRow>,
    pub categories: Vec<CategorySlice>,
    pub growth: GrowthSummary,
    pub monthly: Vec<MonthlyPoint>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Build the usage view for `state`.
pub fn aggregate(dataset: &Dataset, state: &ViewState, settings: &AggregatorSettings) -> UsageView {
    let filtered = filter_records(dataset.months(), state);
    let selected: Vec<ServiceKey> = ServiceKey::ALL
        .into_iter()
        .filter(|s| state.services.contains(s))
        .collect();

    let services = service_rows(&filtered, &selected, state.mode);
    let categories = categorize(&services, settings.other_threshold_pct);

    let growth = if filtered.len() > 1 {
        growth_summary(&filtered)
    } else {
        growth_summary(&dataset.months().iter().collect::<Vec<_>>())
    };

    let monthly: Vec<MonthlyPoint> = filtered
        .iter()
        .map(|record| {
            let values: BTreeMap<ServiceKey, f64> = selected
                .iter()
                .map(|&s| (s, state.mode.value(record, s)))
                .collect();
            let total = values.values().sum();
            MonthlyPoint {
                month: record.month.clone(),
                values,
                total,
            }
        })
        .collect();

    let totals = match filtered.last() {
        Some(last) => UsageTotals {
            last_month_total: monthly.last().map_or(0.0, |p| p.total),
            filtered_total: monthly.iter().map(|p| p.total).sum(),
            total_credits: last.sum_of_credits,
            total_cost: last.total_cost,
        },
        None => UsageTotals::default(),
    };

    UsageView {
        mode: state.mode,
        range: state.range,
        months: filtered.iter().map(|r| r.month.clone()).collect(),
        last_month: filtered.last().map(|r| r.month.clone()),
        totals,
        services,
        categories,
        growth,
        monthly,
    }
}

/// Usage of each selected service in the last record, with growth against
/// the record before it. Services with no usage are dropped.
fn service_rows(
    records: &[&MonthlyUsageRecord],
    selected: &[ServiceKey],
    unit: Unit,
) -> Vec<ServiceUsageRow> {
    let Some((last, earlier)) = records.split_last() else {
        return Vec::new();
    };
    let previous = earlier.last();

    selected
        .iter()
        .map(|&key| {
            // Growth is measured in credits whatever the unit.
            let growth = previous.map_or(0.0, |prev| {
                growth_rate(prev.credits(key), last.credits(key)).round()
            });
            ServiceUsageRow {
                key,
                name: key.display_name(),
                color: key.chart_color(),
                usage: unit.value(last, key),
                growth,
            }
        })
        .filter(|row| row.usage > 0.0)
        .collect()
}

/// Share distribution, largest first, with shares below `threshold_pct`
/// merged into a trailing "Other Services" slice.
fn categorize(rows: &[ServiceUsageRow], threshold_pct: f64) -> Vec<CategorySlice> {
    let total: f64 = rows.iter().map(|r| r.usage).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut own = Vec::new();
    let mut grouped = Vec::new();
    for row in rows {
        let share = row.usage / total * 100.0;
        let slice = CategorySlice::single(row, share);
        if share < threshold_pct {
            grouped.push(slice);
        } else {
            own.push(slice);
        }
    }

    own.sort_by(|a, b| b.value.total_cmp(&a.value));
    grouped.sort_by(|a, b| b.value.total_cmp(&a.value));

    if !grouped.is_empty() {
        own.push(CategorySlice {
            name: OTHER_SERVICES_NAME.to_string(),
            color: OTHER_SERVICES_COLOR.to_string(),
            value: grouped.iter().map(|s| s.value).sum(),
            actual_value: grouped.iter().map(|s| s.actual_value).sum(),
            is_group: true,
            members: grouped,
        });
    }
    own
}

/// Month-over-month growth of total credits, skipping periods that start
/// from zero.
fn growth_summary(records: &[&MonthlyUsageRecord]) -> GrowthSummary {
    let rates: Vec<f64> = records
        .windows(2)
        .filter(|pair| pair[0].sum_of_credits > 0.0)
        .map(|pair| growth_rate(pair[0].sum_of_credits, pair[1].sum_of_credits))
        .collect();

    let recent = &rates[rates.len().saturating_sub(3)..];
    GrowthSummary {
        average: mean(&rates).round(),
        recent: (mean(recent) * 10.0).round() / 10.0,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
