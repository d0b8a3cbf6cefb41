//! View state for the usage charts and the filtering it drives.

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::schema::UsageConfig;
use crate::data::{Dataset, MonthlyUsageRecord, ServiceKey};

/// Positional time window over the chronologically ordered months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "all")]
    All,
    #[default]
    #[serde(rename = "6m")]
    Last6,
    #[serde(rename = "3m")]
    Last3,
}

impl TimeRange {
    /// Number of trailing records kept, `None` for all.
    pub fn months(self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Last6 => Some(6),
            Self::Last3 => Some(3),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "6m" | "6" | "last6" => Some(Self::Last6),
            "3m" | "3" | "last3" => Some(Self::Last3),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Last6 => "6m",
            Self::Last3 => "3m",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit the usage figures are expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Credits,
    Dollars,
}

impl Unit {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "credits" | "credit" => Some(Self::Credits),
            "dollars" | "dollar" | "usd" | "$" => Some(Self::Dollars),
            _ => None,
        }
    }

    /// Value of one service in one month in this unit.
    pub fn value(self, record: &MonthlyUsageRecord, service: ServiceKey) -> f64 {
        match self {
            Self::Credits => record.credits(service),
            Self::Dollars => record.dollars(service),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credits => write!(f, "credits"),
            Self::Dollars => write!(f, "dollars"),
        }
    }
}

/// Either everything, or an explicit subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection<T: Ord> {
    #[default]
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Selection<T> {
    pub fn contains(&self, item: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(item),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: Ord> FromIterator<T> for Selection<T> {
    /// An empty iterator selects everything.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let set: BTreeSet<T> = iter.into_iter().collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Only(set)
        }
    }
}

/// Split a comma-separated list; `all` anywhere or an empty list means
/// "no filter".
fn split_list(raw: &str) -> Option<Vec<&str>> {
    let items: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() || items.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        None
    } else {
        Some(items)
    }
}

/// Parse a service list such as `emailFinder,mobileFinder`.
pub fn parse_services(raw: &str) -> Result<Selection<ServiceKey>> {
    let Some(items) = split_list(raw) else {
        return Ok(Selection::All);
    };
    items
        .into_iter()
        .map(|item| match ServiceKey::from_key(item) {
            Some(service) => Ok(service),
            None => bail!("unknown service '{item}'"),
        })
        .collect::<Result<Vec<_>>>()
        .map(Selection::from_iter)
}

/// Parse a month list such as `Jan 2025,Feb 2025`, checking each label
/// against the dataset.
pub fn parse_months(raw: &str, dataset: &Dataset) -> Result<Selection<String>> {
    let Some(items) = split_list(raw) else {
        return Ok(Selection::All);
    };
    let known = dataset.month_labels();
    items
        .into_iter()
        .map(|item| match known.iter().find(|m| m.eq_ignore_ascii_case(item)) {
            Some(label) => Ok((*label).to_string()),
            None => bail!("unknown month '{item}'"),
        })
        .collect::<Result<Vec<_>>>()
        .map(Selection::from_iter)
}

/// Everything a usage view is computed from. Rebuilt from defaults on every
/// request and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub mode: Unit,
    pub range: TimeRange,
    pub services: Selection<ServiceKey>,
    pub months: Selection<String>,
}

impl ViewState {
    /// The state a freshly opened usage view starts in.
    pub fn initial(cfg: &UsageConfig) -> Self {
        Self {
            mode: cfg.default_mode,
            range: cfg.default_range,
            services: Selection::All,
            months: Selection::All,
        }
    }

    /// Build a state from optional raw parameters, falling back to the
    /// configured defaults for anything missing.
    pub fn from_params(
        cfg: &UsageConfig,
        dataset: &Dataset,
        mode: Option<&str>,
        range: Option<&str>,
        services: Option<&str>,
        months: Option<&str>,
    ) -> Result<Self> {
        let mut state = Self::initial(cfg);
        if let Some(raw) = mode.filter(|s| !s.trim().is_empty()) {
            state.mode = match Unit::parse(raw) {
                Some(unit) => unit,
                None => bail!("unknown mode '{raw}' (expected credits or dollars)"),
            };
        }
        if let Some(raw) = range.filter(|s| !s.trim().is_empty()) {
            state.range = match TimeRange::parse(raw) {
                Some(range) => range,
                None => bail!("unknown range '{raw}' (expected all, 6m or 3m)"),
            };
        }
        if let Some(raw) = services {
            state.services = parse_services(raw)?;
        }
        if let Some(raw) = months {
            state.months = parse_months(raw, dataset)?;
        }
        Ok(state)
    }
}

/// Apply the time range, then the month subset. Order is preserved.
pub fn filter_records<'a>(
    records: &'a [MonthlyUsageRecord],
    state: &ViewState,
) -> Vec<&'a MonthlyUsageRecord> {
    let start = match state.range.months() {
        Some(n) => records.len().saturating_sub(n),
        None => 0,
    };
    records[start..]
        .iter()
        .filter(|r| state.months.contains(&r.month))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::embedded().unwrap()
    }

    fn labels(records: &[&MonthlyUsageRecord]) -> Vec<String> {
        records.iter().map(|r| r.month.clone()).collect()
    }

    #[test]
    fn last_three_months_are_positional() {
        let ds = dataset();
        let state = ViewState {
            range: TimeRange::Last3,
            ..ViewState::default()
        };
        let filtered = filter_records(ds.months(), &state);
        assert_eq!(labels(&filtered), vec!["Dec 2024", "Jan 2025", "Feb 2025"]);
    }

    #[test]
    fn range_longer_than_dataset_keeps_everything() {
        let ds = dataset();
        let short = &ds.months()[..2];
        let state = ViewState {
            range: TimeRange::Last6,
            ..ViewState::default()
        };
        assert_eq!(filter_records(short, &state).len(), 2);
    }

    #[test]
    fn month_subset_applies_after_range() {
        let ds = dataset();
        let state = ViewState {
            range: TimeRange::Last3,
            months: parse_months("Apr 2024,Jan 2025", &ds).unwrap(),
            ..ViewState::default()
        };
        assert_eq!(labels(&filter_records(ds.months(), &state)), vec!["Jan 2025"]);
    }

    #[test]
    fn parse_services_handles_all_and_lists() {
        assert!(parse_services("").unwrap().is_all());
        assert!(parse_services("all").unwrap().is_all());
        assert!(parse_services("emailFinder,all").unwrap().is_all());
        let only = parse_services("emailFinder, mobileFinder").unwrap();
        assert!(only.contains(&ServiceKey::EmailFinder));
        assert!(!only.contains(&ServiceKey::CompanySearch));
        assert!(parse_services("emailFinder,bogus").is_err());
    }

    #[test]
    fn parse_months_rejects_unknown_labels() {
        let ds = dataset();
        assert!(parse_months("Mar 2030", &ds).is_err());
        let sel = parse_months("feb 2025", &ds).unwrap();
        assert!(sel.contains(&"Feb 2025".to_string()));
    }

    #[test]
    fn from_params_falls_back_to_defaults() {
        let ds = dataset();
        let cfg = UsageConfig::default();
        let state = ViewState::from_params(&cfg, &ds, None, Some(""), None, None).unwrap();
        assert_eq!(state, ViewState::initial(&cfg));
        assert_eq!(state.range, TimeRange::Last6);
        assert_eq!(state.mode, Unit::Credits);
    }

    #[test]
    fn from_params_rejects_bad_values() {
        let ds = dataset();
        let cfg = UsageConfig::default();
        assert!(ViewState::from_params(&cfg, &ds, Some("euros"), None, None, None).is_err());
        assert!(ViewState::from_params(&cfg, &ds, None, Some("12m"), None, None).is_err());
    }

    #[test]
    fn time_range_round_trips_through_strings() {
        for range in [TimeRange::All, TimeRange::Last6, TimeRange::Last3] {
            assert_eq!(TimeRange::parse(range.as_str()), Some(range));
        }
        assert_eq!(Unit::parse("Dollars"), Some(Unit::Dollars));
    }
}
