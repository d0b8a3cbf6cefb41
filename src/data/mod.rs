//! Usage dataset for the proposal.
//!
//! The dataset is a JSON document with a `data` array of monthly records,
//! in chronological order, followed by a sentinel record whose `month` is
//! `"Total"` and whose fields hold the all-time aggregates:
//!
//! ```json
//! { "data": [
//!     { "month": "Apr 2024", "emailFinder": 6, "totalCost": 0.06,
//!       "sumOfCredits": 7.05, "costPerCredit": 0.008 },
//!     { "month": "Total", "emailFinder": 6, "totalCost": 0.06,
//!       "sumOfCredits": 7.05, "costPerCredit": 0.008 }
//! ] }
//! ```
//!
//! A copy of the proposal's dataset is compiled into the binary; `data.path`
//! in the config points at a replacement file. Either way the document is
//! validated at load time and a malformed file is an error, never a dashboard
//! full of zeros.

pub mod services;
mod validate;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use services::{SERVICES, ServiceDefinition, ServiceKey};

/// `month` value of the aggregate sentinel record.
pub const TOTAL_SENTINEL: &str = "Total";

/// The dataset shipped with the binary.
pub const EMBEDDED_DATASET: &str = include_str!("../../data/consumption.json");

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Credits consumed per service in one month. Missing columns read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceUsage {
    pub email_finder: f64,
    pub email_validation: f64,
    pub mobile_finder: f64,
    pub company_search: f64,
    pub linkedin_finder: f64,
    pub competitors_search: f64,
    pub personal_email_finder: f64,
}

impl ServiceUsage {
    /// Credits for a single service.
    pub fn get(&self, service: ServiceKey) -> f64 {
        match service {
            ServiceKey::EmailFinder => self.email_finder,
            ServiceKey::EmailValidation => self.email_validation,
            ServiceKey::MobileFinder => self.mobile_finder,
            ServiceKey::CompanySearch => self.company_search,
            ServiceKey::LinkedinFinder => self.linkedin_finder,
            ServiceKey::CompetitorsSearch => self.competitors_search,
            ServiceKey::PersonalEmailFinder => self.personal_email_finder,
        }
    }

    /// Sum over all seven services.
    pub fn total(&self) -> f64 {
        ServiceKey::ALL.into_iter().map(|s| self.get(s)).sum()
    }
}

/// One month of usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUsageRecord {
    /// Label such as `"Apr 2024"`.
    pub month: String,
    #[serde(flatten)]
    pub usage: ServiceUsage,
    /// Dollars billed for the month.
    pub total_cost: f64,
    pub sum_of_credits: f64,
    pub cost_per_credit: f64,
}

impl MonthlyUsageRecord {
    /// Credits for one service.
    pub fn credits(&self, service: ServiceKey) -> f64 {
        self.usage.get(service)
    }

    /// Dollars for one service at this month's credit price.
    pub fn dollars(&self, service: ServiceKey) -> f64 {
        self.usage.get(service) * self.cost_per_credit
    }

    fn is_sentinel(&self) -> bool {
        self.month == TOTAL_SENTINEL
    }
}

#[derive(Debug, Deserialize)]
struct DatasetDocument {
    data: Vec<MonthlyUsageRecord>,
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// A validated dataset: the monthly records and the extracted sentinel.
///
/// Always holds at least one month.
#[derive(Debug, Clone)]
pub struct Dataset {
    months: Vec<MonthlyUsageRecord>,
    total: MonthlyUsageRecord,
}

/// Figures describing the client's current position, taken from the most
/// recent month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUsage {
    pub month: String,
    pub monthly_spend: f64,
    pub monthly_credits: f64,
    pub cost_per_credit: f64,
    /// `monthly_spend * 12`.
    pub annual_run_rate_spend: f64,
    /// `monthly_credits * 12`.
    pub annualized_credits: f64,
}

impl Dataset {
    /// Build a dataset from already separated months and sentinel.
    pub fn new(months: Vec<MonthlyUsageRecord>, total: MonthlyUsageRecord) -> Result<Self> {
        validate::validate(&months, &total)?;
        Ok(Self { months, total })
    }

    /// Parse and validate a dataset document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: DatasetDocument =
            serde_json::from_str(json).context("dataset is not a valid usage document")?;

        let (sentinels, months): (Vec<_>, Vec<_>) =
            doc.data.into_iter().partition(MonthlyUsageRecord::is_sentinel);

        let mut sentinels = sentinels.into_iter();
        let total = sentinels
            .next()
            .with_context(|| format!("dataset has no \"{TOTAL_SENTINEL}\" record"))?;
        if sentinels.next().is_some() {
            anyhow::bail!("dataset has more than one \"{TOTAL_SENTINEL}\" record");
        }

        Self::new(months, total)
    }

    /// Read and validate a dataset file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid dataset {}", path.display()))
    }

    /// The dataset compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_DATASET).context("embedded dataset is invalid")
    }

    /// Load from `path` if given, otherwise the embedded dataset.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::embedded(),
        }
    }

    /// Monthly records in chronological order (sentinel excluded).
    pub fn months(&self) -> &[MonthlyUsageRecord] {
        &self.months
    }

    /// The `Total` sentinel.
    pub fn total(&self) -> &MonthlyUsageRecord {
        &self.total
    }

    /// Most recent month.
    pub fn latest(&self) -> &MonthlyUsageRecord {
        // Validation guarantees at least one month.
        &self.months[self.months.len() - 1]
    }

    pub fn first(&self) -> &MonthlyUsageRecord {
        &self.months[0]
    }

    /// Month labels in order.
    pub fn month_labels(&self) -> Vec<&str> {
        self.months.iter().map(|m| m.month.as_str()).collect()
    }

    /// Current-position figures from the latest month.
    pub fn snapshot(&self) -> CurrentUsage {
        let latest = self.latest();
        CurrentUsage {
            month: latest.month.clone(),
            monthly_spend: latest.total_cost,
            monthly_credits: latest.sum_of_credits,
            cost_per_credit: latest.cost_per_credit,
            annual_run_rate_spend: latest.total_cost * 12.0,
            annualized_credits: latest.sum_of_credits * 12.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
