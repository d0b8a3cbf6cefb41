/// Pricing calculator tests.
///
/// Exercise the calculator through the public API with the built-in tier
/// table and the embedded dataset.
use pitchdeck::config::schema::PricingConfig;
use pitchdeck::data::Dataset;
use pitchdeck::pricing::{DiscountTier, PricingCalculator, TierTable, default_tiers};

fn calculator() -> PricingCalculator {
    PricingCalculator::from_config(&PricingConfig::default()).unwrap()
}

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

// ---------------------------------------------------------------------------
// Tier lookup
// ---------------------------------------------------------------------------

#[test]
fn applicable_tier_is_the_floor_threshold() {
    let table = TierTable::new(default_tiers()).unwrap();
    let thresholds: Vec<u32> = table.iter().map(|t| t.threshold_millions).collect();
    for x in 40..=100 {
        let expected = thresholds.iter().copied().filter(|t| *t <= x).max().unwrap();
        assert_eq!(table.applicable(x).threshold_millions, expected, "x = {x}");
    }
}

#[test]
fn below_smallest_threshold_clamps_to_smallest_tier() {
    let table = TierTable::new(default_tiers()).unwrap();
    assert_eq!(table.applicable(0).threshold_millions, 40);
    assert_eq!(table.applicable(39).threshold_millions, 40);
}

#[test]
fn discounts_rise_as_prices_fall() {
    let calc = calculator();
    let tiers: Vec<&DiscountTier> = calc.tiers().iter().collect();
    for pair in tiers.windows(2) {
        assert!(pair[1].discount >= pair[0].discount);
        assert!(pair[1].price_per_credit <= pair[0].price_per_credit);
    }
}

#[test]
fn unordered_tiers_are_rejected() {
    let tiers = vec![
        DiscountTier::new(60, 0.20, 0.0064),
        DiscountTier::new(50, 0.15, 0.0068),
    ];
    assert!(TierTable::new(tiers).is_err());
    assert!(TierTable::new(Vec::new()).is_err());
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[test]
fn fifty_million_quote_matches_worked_example() {
    let quote = calculator().quote(50);
    assert_eq!(quote.tier.threshold_millions, 50);
    assert!(approx(quote.discounted_monthly_cost, 28_333.33, 0.01));
    assert!(approx(quote.standard_monthly_cost, 33_333.33, 0.01));
    assert!(approx(quote.monthly_savings, 5_000.0, 0.01));
    assert!(approx(quote.annual_savings, 60_000.0, 1e-6));
    assert!(approx(quote.free_months_equivalent, 1.8, 1e-9));
    assert!(quote.price_lock);
}

#[test]
fn annual_and_monthly_savings_agree() {
    let calc = calculator();
    for commitment in (40..=100).step_by(5) {
        let q = calc.quote(commitment);
        let annual = q.standard_annual_cost - q.discounted_annual_cost;
        let monthly = q.standard_monthly_cost * 12.0 - q.discounted_monthly_cost * 12.0;
        assert!(approx(annual, monthly, 1e-6), "commitment {commitment}");
        assert!(approx(q.annual_savings, annual, 1e-6));
    }
}

#[test]
fn commitment_between_tiers_uses_lower_tier_price() {
    let q = calculator().quote(55);
    assert_eq!(q.tier.threshold_millions, 50);
    assert!(approx(q.discounted_annual_cost, 55_000_000.0 * 0.0068, 1e-6));
}

#[test]
fn price_lock_starts_at_configured_threshold() {
    let calc = calculator();
    assert!(!calc.quote(40).price_lock);
    assert!(calc.quote(50).price_lock);

    let cfg = PricingConfig {
        price_lock_from_millions: 75,
        ..PricingConfig::default()
    };
    let calc = PricingCalculator::from_config(&cfg).unwrap();
    assert!(!calc.quote(60).price_lock);
    assert!(calc.quote(75).price_lock);
}

#[test]
fn comparison_with_current_spend_is_separate() {
    let dataset = Dataset::embedded().unwrap();
    let current = dataset.snapshot();
    let calc = calculator();
    let plain = calc.quote(50);
    let compared = calc.quote_against(50, &current);

    assert!(plain.versus_current.is_none());
    assert!(approx(plain.annual_savings, compared.annual_savings, 1e-9));

    let vs = compared.versus_current.unwrap();
    assert!(approx(vs.current_annual_spend, current.monthly_spend * 12.0, 1e-6));
    assert!(approx(
        vs.savings_vs_current_spend,
        vs.current_annual_spend - compared.discounted_annual_cost,
        1e-6
    ));
}

// ---------------------------------------------------------------------------
// Recommendation and tier rows
// ---------------------------------------------------------------------------

#[test]
fn recommendation_follows_annualized_volume() {
    let dataset = Dataset::embedded().unwrap();
    let current = dataset.snapshot();
    let rec = calculator().recommendation(&current);
    let volume = current.annualized_credits / 1_000_000.0;
    assert!(f64::from(rec.commitment_millions) <= volume.max(40.0));
    assert_eq!(rec.commitment_millions, 50);
    assert_eq!(rec.quote.commitment_millions, 50);
}

#[test]
fn tier_rows_mark_exactly_one_current_tier() {
    let rows = calculator().tier_rows(62);
    assert_eq!(rows.len(), 5);
    let current: Vec<u32> = rows
        .iter()
        .filter(|r| r.is_current)
        .map(|r| r.tier.threshold_millions)
        .collect();
    assert_eq!(current, vec![60]);
}

#[test]
fn savings_range_spans_tier_thresholds() {
    let range = calculator().savings_range();
    assert!(approx(range.min, 32_000.0, 1e-6));
    assert!(approx(range.max, 216_000.0, 1e-6));
}

#[test]
fn base_rate_below_tier_price_is_rejected() {
    let cfg = PricingConfig {
        base_rate: 0.007,
        ..PricingConfig::default()
    };
    assert!(PricingCalculator::from_config(&cfg).is_err());
}
