//! Load-time shape checks for the usage dataset.

use std::sync::LazyLock;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use regex::Regex;

use super::{MonthlyUsageRecord, ServiceKey, TOTAL_SENTINEL};

/// `Mon YYYY`, e.g. `Apr 2024`.
static MONTH_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) \d{4}$")
        .expect("month label regex must compile")
});

/// Absolute slack allowed when comparing rounded currency/credit sums.
const ABS_TOLERANCE: f64 = 0.01;
/// Relative slack on top of [`ABS_TOLERANCE`] for large aggregates.
const REL_TOLERANCE: f64 = 1e-6;

pub(super) fn validate(months: &[MonthlyUsageRecord], total: &MonthlyUsageRecord) -> Result<()> {
    if months.is_empty() {
        bail!("dataset has no monthly records");
    }
    if total.month != TOTAL_SENTINEL {
        bail!(
            "aggregate record must be labelled \"{TOTAL_SENTINEL}\", found \"{}\"",
            total.month
        );
    }

    let mut previous: Option<NaiveDate> = None;
    for record in months {
        let date = parse_month(&record.month)?;
        if let Some(prev) = previous
            && date <= prev
        {
            bail!(
                "months are not in chronological order: \"{}\" follows {}",
                record.month,
                prev.format("%b %Y")
            );
        }
        previous = Some(date);

        check_values(record)?;
        if record.cost_per_credit <= 0.0 {
            bail!("{}: costPerCredit must be positive", record.month);
        }

        let service_sum = record.usage.total();
        if !approx_eq(service_sum, record.sum_of_credits) {
            bail!(
                "{}: sumOfCredits is {} but services add up to {}",
                record.month,
                record.sum_of_credits,
                service_sum
            );
        }

        let expected_cost = record.sum_of_credits * record.cost_per_credit;
        if !approx_eq(expected_cost, record.total_cost) {
            bail!(
                "{}: totalCost is {} but sumOfCredits x costPerCredit is {:.4}",
                record.month,
                record.total_cost,
                expected_cost
            );
        }
    }

    check_values(total)?;
    let credits: f64 = months.iter().map(|m| m.sum_of_credits).sum();
    if !approx_eq(credits, total.sum_of_credits) {
        bail!(
            "\"{TOTAL_SENTINEL}\" sumOfCredits is {} but months add up to {}",
            total.sum_of_credits,
            credits
        );
    }
    let cost: f64 = months.iter().map(|m| m.total_cost).sum();
    if !approx_eq(cost, total.total_cost) {
        bail!(
            "\"{TOTAL_SENTINEL}\" totalCost is {} but months add up to {:.2}",
            total.total_cost,
            cost
        );
    }

    Ok(())
}

fn parse_month(label: &str) -> Result<NaiveDate> {
    if !MONTH_LABEL_RE.is_match(label) {
        bail!("month label \"{label}\" is not of the form \"Mon YYYY\"");
    }
    match NaiveDate::parse_from_str(&format!("1 {label}"), "%d %b %Y") {
        Ok(date) => Ok(date),
        Err(e) => bail!("month label \"{label}\" is not a valid month: {e}"),
    }
}

fn check_values(record: &MonthlyUsageRecord) -> Result<()> {
    let mut fields: Vec<(&str, f64)> = ServiceKey::ALL
        .into_iter()
        .map(|s| (s.key(), record.usage.get(s)))
        .collect();
    fields.push(("totalCost", record.total_cost));
    fields.push(("sumOfCredits", record.sum_of_credits));
    fields.push(("costPerCredit", record.cost_per_credit));

    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            bail!("{}: {name} must be a non-negative number, got {value}", record.month);
        }
    }
    Ok(())
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= ABS_TOLERANCE + REL_TOLERANCE * b.abs()
}
