//! Spend-over-time series and generated observations.

use serde::Serialize;

use super::growth_rate;
use crate::data::{Dataset, MonthlyUsageRecord, ServiceKey};
use crate::utils::format::format_decimal;

/// One point of the spend growth chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendPoint {
    pub month: String,
    pub spend: f64,
    /// Spend of the month before, `0.0` for the first month.
    pub previous_spend: f64,
    pub credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendSeries {
    pub points: Vec<SpendPoint>,
    /// Mean month-over-month spend growth across the last three months.
    pub average_recent_growth: f64,
}

/// Monthly spend with the previous month alongside, for the growth chart.
pub fn spend_series(dataset: &Dataset) -> SpendSeries {
    let months = dataset.months();
    let points: Vec<SpendPoint> = months
        .iter()
        .enumerate()
        .map(|(i, record)| SpendPoint {
            month: record.month.clone(),
            spend: record.total_cost,
            previous_spend: i.checked_sub(1).map_or(0.0, |p| months[p].total_cost),
            credits: record.sum_of_credits,
        })
        .collect();

    let average_recent_growth = if points.len() < 3 {
        0.0
    } else {
        let last_three = &points[points.len() - 3..];
        let rates: Vec<f64> = last_three
            .windows(2)
            .map(|pair| growth_rate(pair[0].spend, pair[1].spend))
            .collect();
        rates.iter().sum::<f64>() / rates.len() as f64
    };

    SpendSeries {
        points,
        average_recent_growth,
    }
}

/// Short observations about the most recent month.
pub fn insights(dataset: &Dataset) -> Vec<String> {
    let first = dataset.first();
    let latest = dataset.latest();
    let months = dataset.months();
    let previous = months.len().checked_sub(2).map(|i| &months[i]);

    let mut ranked: Vec<(ServiceKey, f64)> = ServiceKey::ALL
        .into_iter()
        .map(|s| (s, latest.credits(s)))
        .filter(|(_, credits)| *credits > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let share = |credits: f64| {
        if latest.sum_of_credits > 0.0 {
            (credits / latest.sum_of_credits * 100.0).round()
        } else {
            0.0
        }
    };

    let mut out = Vec::new();
    if let Some(&(top, credits)) = ranked.first() {
        out.push(format!(
            "{} represents {}% of your total API usage, making it your most utilized service.",
            top.display_name(),
            format_decimal(share(credits), 0)
        ));
    }
    if latest.month != first.month && first.sum_of_credits > 0.0 {
        let growth = growth_rate(first.sum_of_credits, latest.sum_of_credits);
        let (verb, pct) = if growth >= 0.0 {
            ("grown", growth)
        } else {
            ("decreased", -growth)
        };
        out.push(format!(
            "Your usage has {verb} by {}% since {}.",
            format_decimal(pct, 0),
            first.month
        ));
    }
    if let (Some(&(top, _)), Some(&(second, credits))) = (ranked.first(), ranked.get(1)) {
        out.push(format!(
            "{} shows the second highest usage at {}% of total volume, complementing your {} strategy.",
            second.display_name(),
            format_decimal(share(credits), 0),
            top.display_name()
        ));
    }
    if let Some(prev) = previous {
        for service in [ServiceKey::LinkedinFinder, ServiceKey::CompetitorsSearch] {
            if let Some(line) = trend(service, prev, latest) {
                out.push(line);
            }
        }
    }
    out
}

/// Month-over-month direction of one service, if it was used at all.
fn trend(
    service: ServiceKey,
    previous: &MonthlyUsageRecord,
    latest: &MonthlyUsageRecord,
) -> Option<String> {
    let before = previous.credits(service);
    let now = latest.credits(service);
    if before == 0.0 && now == 0.0 {
        return None;
    }
    let name = service.display_name();
    Some(if before == 0.0 {
        format!("{name} usage started in {}.", latest.month)
    } else if now >= before {
        format!(
            "{name} usage increased {}% from {} to {}.",
            format_decimal(growth_rate(before, now), 0),
            previous.month,
            latest.month
        )
    } else {
        format!(
            "{name} usage decreased {}% from {} to {}.",
            format_decimal(-growth_rate(before, now), 0),
            previous.month,
            latest.month
        )
    })
}
