/// Usage aggregator and dataset tests.
///
/// Run the aggregator over the embedded dataset and over small hand-built
/// datasets loaded through `Dataset::from_json`.
use pitchdeck::config::schema::UsageConfig;
use pitchdeck::data::{Dataset, ServiceKey};
use pitchdeck::usage::{
    self, AggregatorSettings, Selection, TimeRange, Unit, ViewState, filter_records, growth_rate,
    parse_months, parse_services,
};

fn embedded() -> Dataset {
    Dataset::embedded().unwrap()
}

fn record_json(month: &str, email_finder: f64, mobile_finder: f64) -> String {
    let sum = email_finder + mobile_finder;
    format!(
        r#"{{"month": "{month}", "emailFinder": {email_finder}, "mobileFinder": {mobile_finder},
            "totalCost": {cost}, "sumOfCredits": {sum}, "costPerCredit": 0.008}}"#,
        cost = sum * 0.008
    )
}

/// Dataset from `(month, emailFinder, mobileFinder)` rows plus a matching
/// total record.
fn dataset_of(rows: &[(&str, f64, f64)]) -> Dataset {
    let mut records: Vec<String> = rows
        .iter()
        .map(|(m, e, p)| record_json(m, *e, *p))
        .collect();
    let email: f64 = rows.iter().map(|r| r.1).sum();
    let mobile: f64 = rows.iter().map(|r| r.2).sum();
    records.push(record_json("Total", email, mobile));
    Dataset::from_json(&format!(r#"{{"data": [{}]}}"#, records.join(","))).unwrap()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn last_three_months_in_dataset_order() {
    let ds = embedded();
    assert_eq!(ds.months().len(), 11);
    let state = ViewState {
        range: TimeRange::Last3,
        ..ViewState::default()
    };
    let months: Vec<&str> = filter_records(ds.months(), &state)
        .iter()
        .map(|r| r.month.as_str())
        .collect();
    assert_eq!(months, vec!["Dec 2024", "Jan 2025", "Feb 2025"]);
}

#[test]
fn all_range_keeps_every_month() {
    let ds = embedded();
    let state = ViewState {
        range: TimeRange::All,
        ..ViewState::default()
    };
    assert_eq!(filter_records(ds.months(), &state).len(), 11);
}

#[test]
fn month_subset_applies_after_range() {
    let ds = embedded();
    let state = ViewState {
        range: TimeRange::Last6,
        months: parse_months("Apr 2024,Jan 2025", &ds).unwrap(),
        ..ViewState::default()
    };
    let months: Vec<&str> = filter_records(ds.months(), &state)
        .iter()
        .map(|r| r.month.as_str())
        .collect();
    assert_eq!(months, vec!["Jan 2025"]);
}

#[test]
fn query_parameters_fall_back_to_configured_defaults() {
    let ds = embedded();
    let cfg = UsageConfig::default();
    let state = ViewState::from_params(&cfg, &ds, None, None, None, None).unwrap();
    assert_eq!(state, ViewState::initial(&cfg));
    assert_eq!(state.range, TimeRange::Last6);
    assert_eq!(state.mode, Unit::Credits);

    let state =
        ViewState::from_params(&cfg, &ds, Some("dollars"), Some("all"), Some("all"), Some(""))
            .unwrap();
    assert_eq!(state.mode, Unit::Dollars);
    assert_eq!(state.range, TimeRange::All);
    assert!(state.services.is_all());
    assert!(state.months.is_all());
}

#[test]
fn unknown_filter_values_are_errors() {
    let ds = embedded();
    assert!(parse_services("emailFinder,faxFinder").is_err());
    assert!(parse_months("Smarch 2025", &ds).is_err());
    let cfg = UsageConfig::default();
    assert!(ViewState::from_params(&cfg, &ds, Some("euros"), None, None, None).is_err());
    assert!(ViewState::from_params(&cfg, &ds, None, Some("12m"), None, None).is_err());
}

#[test]
fn service_list_parses_into_selection() {
    let selection = parse_services("mobileFinder, emailFinder").unwrap();
    assert!(selection.contains(&ServiceKey::EmailFinder));
    assert!(selection.contains(&ServiceKey::MobileFinder));
    assert!(!selection.contains(&ServiceKey::CompanySearch));
    assert_eq!(parse_services("").unwrap(), Selection::All);
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn category_shares_total_one_hundred_for_any_selection() {
    let ds = embedded();
    let settings = AggregatorSettings::default();
    let selections = ["all", "emailFinder,mobileFinder", "emailValidation,companySearch"];
    for services in selections {
        for range in [TimeRange::All, TimeRange::Last6, TimeRange::Last3] {
            let state = ViewState {
                range,
                services: parse_services(services).unwrap(),
                ..ViewState::default()
            };
            let view = usage::aggregate(&ds, &state, &settings);
            let sum: f64 = view.categories.iter().map(|c| c.value).sum();
            assert!((sum - 100.0).abs() < 1e-6, "{services} {range}: {sum}");
        }
    }
}

#[test]
fn three_percent_is_grouped_six_percent_is_not() {
    let ds = Dataset::from_json(
        r#"{"data": [
            {"month": "Jan 2025", "emailFinder": 91, "mobileFinder": 6, "companySearch": 3,
             "totalCost": 0.8, "sumOfCredits": 100, "costPerCredit": 0.008},
            {"month": "Total", "emailFinder": 91, "mobileFinder": 6, "companySearch": 3,
             "totalCost": 0.8, "sumOfCredits": 100, "costPerCredit": 0.008}
        ]}"#,
    )
    .unwrap();
    let view = usage::aggregate(&ds, &ViewState::default(), &AggregatorSettings::default());

    let mobile = view
        .categories
        .iter()
        .find(|c| c.name == "Mobile Finder")
        .unwrap();
    assert!(!mobile.is_group);
    assert!((mobile.value - 6.0).abs() < 1e-9);

    let other = view.categories.iter().find(|c| c.is_group).unwrap();
    assert_eq!(other.members.len(), 1);
    assert_eq!(other.members[0].name, "Company Search");
    assert!(view.categories.iter().all(|c| c.name != "Company Search"));
}

#[test]
fn grouping_threshold_is_configurable() {
    let ds = embedded();
    let settings = AggregatorSettings {
        other_threshold_pct: 0.0,
    };
    let view = usage::aggregate(&ds, &ViewState::default(), &settings);
    assert!(view.categories.iter().all(|c| !c.is_group));
}

#[test]
fn growth_never_divides_by_zero() {
    assert_eq!(growth_rate(0.0, 1_000.0), 0.0);
    assert!(growth_rate(0.0, 1_000.0).is_finite());

    // Mobile Finder goes from 0 to 500; its row growth must be 0, not inf.
    let ds = dataset_of(&[("Jan 2025", 100.0, 0.0), ("Feb 2025", 100.0, 500.0)]);
    let state = ViewState {
        range: TimeRange::All,
        ..ViewState::default()
    };
    let view = usage::aggregate(&ds, &state, &AggregatorSettings::default());
    let mobile = view
        .services
        .iter()
        .find(|s| s.key == ServiceKey::MobileFinder)
        .unwrap();
    assert_eq!(mobile.growth, 0.0);
    assert!(view.growth.average.is_finite());
}

#[test]
fn growth_summary_over_filtered_months() {
    let ds = dataset_of(&[
        ("Jan 2025", 100.0, 0.0),
        ("Feb 2025", 150.0, 0.0),
        ("Mar 2025", 300.0, 0.0),
    ]);
    let state = ViewState {
        range: TimeRange::All,
        ..ViewState::default()
    };
    let view = usage::aggregate(&ds, &state, &AggregatorSettings::default());
    // (50 + 100) / 2
    assert_eq!(view.growth.average, 75.0);
    assert_eq!(view.services[0].growth, 100.0);
}

#[test]
fn monthly_series_follows_selection() {
    let ds = embedded();
    let state = ViewState {
        range: TimeRange::Last3,
        services: parse_services("emailFinder").unwrap(),
        ..ViewState::default()
    };
    let view = usage::aggregate(&ds, &state, &AggregatorSettings::default());
    assert_eq!(view.monthly.len(), 3);
    for point in &view.monthly {
        assert_eq!(point.values.len(), 1);
        let v = point.values[&ServiceKey::EmailFinder];
        assert!((point.total - v).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Spend series and insights
// ---------------------------------------------------------------------------

#[test]
fn spend_series_chains_previous_month() {
    let series = usage::spend_series(&embedded());
    assert_eq!(series.points.len(), 11);
    assert_eq!(series.points[0].previous_spend, 0.0);
    for pair in series.points.windows(2) {
        assert_eq!(pair[1].previous_spend, pair[0].spend);
    }
    assert!(series.average_recent_growth.is_finite());
}

#[test]
fn insights_name_the_top_service() {
    let lines = usage::insights(&embedded());
    assert!(!lines.is_empty());
    assert!(lines[0].starts_with("Email Finder"));
    assert!(lines.iter().any(|l| l.contains("since Apr 2024")));
}

// ---------------------------------------------------------------------------
// Dataset validation
// ---------------------------------------------------------------------------

#[test]
fn dataset_without_total_is_rejected() {
    let json = format!(r#"{{"data": [{}]}}"#, record_json("Jan 2025", 10.0, 0.0));
    assert!(Dataset::from_json(&json).is_err());
}

#[test]
fn out_of_order_months_are_rejected() {
    let json = format!(
        r#"{{"data": [{}, {}, {}]}}"#,
        record_json("Feb 2025", 10.0, 0.0),
        record_json("Jan 2025", 10.0, 0.0),
        record_json("Total", 20.0, 0.0)
    );
    assert!(Dataset::from_json(&json).is_err());
}

#[test]
fn negative_usage_is_rejected() {
    let json = r#"{"data": [
        {"month": "Jan 2025", "emailFinder": -5, "totalCost": 0, "sumOfCredits": -5, "costPerCredit": 0.008},
        {"month": "Total", "emailFinder": -5, "totalCost": 0, "sumOfCredits": -5, "costPerCredit": 0.008}
    ]}"#;
    assert!(Dataset::from_json(json).is_err());
}
