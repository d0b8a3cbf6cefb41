//! Annual-plan pricing calculator.
//!
//! Given an annual credit commitment (in millions of credits) the calculator
//! picks the applicable [`DiscountTier`] by floor lookup and derives the
//! monthly and annual cost of that commitment at the standard rate and at
//! the tier's discounted rate.
//!
//! "Annual savings" always means the saving from committing, compared with
//! buying the same volume at the standard rate. The comparison with what the
//! client spends today is reported separately as [`VersusCurrent`].
//!
//! All amounts are `f64` dollars; rounding happens only when formatting.

pub mod tiers;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::config::schema::PricingConfig;
use crate::data::CurrentUsage;

pub use tiers::{CREDITS_PER_MILLION, DiscountTier, TierTable, default_tiers};

/// Standard pay-as-you-go price of one credit.
pub const BASE_RATE: f64 = 0.008;

const MONTHS_PER_YEAR: f64 = 12.0;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Cost figures for one commitment level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Commitment as requested (not snapped to the tier threshold).
    pub commitment_millions: u32,
    pub commitment_credits: f64,
    pub tier: DiscountTier,
    pub base_rate: f64,
    pub price_per_credit: f64,
    pub discount: f64,
    pub standard_monthly_cost: f64,
    pub discounted_monthly_cost: f64,
    pub monthly_savings: f64,
    pub standard_annual_cost: f64,
    pub discounted_annual_cost: f64,
    /// `standard_annual_cost - discounted_annual_cost`.
    pub annual_savings: f64,
    /// Annual savings expressed as months of standard-rate billing.
    pub free_months_equivalent: f64,
    /// Whether the tier carries the credit price lock.
    pub price_lock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versus_current: Option<VersusCurrent>,
}

/// Comparison of a quote against the client's current spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersusCurrent {
    pub current_monthly_spend: f64,
    pub current_annual_spend: f64,
    pub annualized_credits: f64,
    /// `current_annual_spend - discounted_annual_cost`. Negative when the
    /// commitment costs more than the current run rate.
    pub savings_vs_current_spend: f64,
    /// Committed credits beyond the current annualized volume (may be
    /// negative).
    pub credits_above_current: f64,
}

/// One row of the tier comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRow {
    pub tier: DiscountTier,
    pub commitment_credits: f64,
    pub standard_annual_cost: f64,
    pub discounted_annual_cost: f64,
    pub annual_savings: f64,
    pub price_lock: bool,
    /// The tier that applies to the commitment the table was built for.
    pub is_current: bool,
}

/// Suggested commitment for the client's current volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub commitment_millions: u32,
    pub annualized_credits: f64,
    pub quote: Quote,
}

/// Smallest and largest annual savings across the tier thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsRange {
    pub min: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PricingCalculator {
    tiers: TierTable,
    base_rate: f64,
    price_lock_from_millions: u32,
}

impl Default for PricingCalculator {
    fn default() -> Self {
        Self {
            tiers: TierTable::default(),
            base_rate: BASE_RATE,
            price_lock_from_millions: 50,
        }
    }
}

impl PricingCalculator {
    pub fn new(tiers: TierTable, base_rate: f64, price_lock_from_millions: u32) -> Result<Self> {
        if !base_rate.is_finite() || base_rate <= 0.0 {
            bail!("base rate must be a positive number, got {base_rate}");
        }
        if tiers.smallest().price_per_credit > base_rate {
            bail!(
                "tier {}M price {} exceeds the base rate {base_rate}",
                tiers.smallest().threshold_millions,
                tiers.smallest().price_per_credit
            );
        }
        Ok(Self {
            tiers,
            base_rate,
            price_lock_from_millions,
        })
    }

    pub fn from_config(cfg: &PricingConfig) -> Result<Self> {
        let tiers = TierTable::new(cfg.tiers.clone())?;
        Self::new(tiers, cfg.base_rate, cfg.price_lock_from_millions)
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn base_rate(&self) -> f64 {
        self.base_rate
    }

    /// Quote a commitment of `commitment_millions` million credits per year.
    pub fn quote(&self, commitment_millions: u32) -> Quote {
        let tier = self.tiers.applicable(commitment_millions);
        let commitment_credits = f64::from(commitment_millions) * CREDITS_PER_MILLION;

        let standard_annual_cost = commitment_credits * self.base_rate;
        let discounted_annual_cost = commitment_credits * tier.price_per_credit;
        let standard_monthly_cost = standard_annual_cost / MONTHS_PER_YEAR;
        let discounted_monthly_cost = discounted_annual_cost / MONTHS_PER_YEAR;
        let annual_savings = standard_annual_cost - discounted_annual_cost;

        let free_months_equivalent = if standard_monthly_cost == 0.0 {
            0.0
        } else {
            annual_savings / standard_monthly_cost
        };

        Quote {
            commitment_millions,
            commitment_credits,
            tier: tier.clone(),
            base_rate: self.base_rate,
            price_per_credit: tier.price_per_credit,
            discount: tier.discount,
            standard_monthly_cost,
            discounted_monthly_cost,
            monthly_savings: standard_monthly_cost - discounted_monthly_cost,
            standard_annual_cost,
            discounted_annual_cost,
            annual_savings,
            free_months_equivalent,
            price_lock: self.has_price_lock(tier),
            versus_current: None,
        }
    }

    /// Quote a commitment and compare it with the client's current spend.
    pub fn quote_against(&self, commitment_millions: u32, current: &CurrentUsage) -> Quote {
        let mut quote = self.quote(commitment_millions);
        quote.versus_current = Some(VersusCurrent {
            current_monthly_spend: current.monthly_spend,
            current_annual_spend: current.annual_run_rate_spend,
            annualized_credits: current.annualized_credits,
            savings_vs_current_spend: current.annual_run_rate_spend
                - quote.discounted_annual_cost,
            credits_above_current: quote.commitment_credits - current.annualized_credits,
        });
        quote
    }

    /// The tier table priced at each tier's own threshold, marking the tier
    /// that applies to `commitment_millions`.
    pub fn tier_rows(&self, commitment_millions: u32) -> Vec<TierRow> {
        let current = self.tiers.applicable(commitment_millions).threshold_millions;
        self.tiers
            .iter()
            .map(|tier| {
                let credits = tier.annual_commitment_credits();
                let standard = credits * self.base_rate;
                let discounted = credits * tier.price_per_credit;
                TierRow {
                    tier: tier.clone(),
                    commitment_credits: credits,
                    standard_annual_cost: standard,
                    discounted_annual_cost: discounted,
                    annual_savings: standard - discounted,
                    price_lock: self.has_price_lock(tier),
                    is_current: tier.threshold_millions == current,
                }
            })
            .collect()
    }

    /// Recommend the tier the client's annualized volume already reaches.
    pub fn recommendation(&self, current: &CurrentUsage) -> Recommendation {
        let volume_millions = (current.annualized_credits / CREDITS_PER_MILLION).floor();
        // Saturating float-to-int conversion; huge volumes land on the top tier.
        let volume_millions = volume_millions.max(0.0) as u32;
        let commitment_millions = self.tiers.applicable(volume_millions).threshold_millions;
        Recommendation {
            commitment_millions,
            annualized_credits: current.annualized_credits,
            quote: self.quote_against(commitment_millions, current),
        }
    }

    /// Range of annual savings over all tier thresholds.
    pub fn savings_range(&self) -> SavingsRange {
        let savings: Vec<f64> = self
            .tier_rows(self.tiers.smallest().threshold_millions)
            .into_iter()
            .map(|row| row.annual_savings)
            .collect();
        SavingsRange {
            min: savings.iter().copied().fold(f64::INFINITY, f64::min),
            max: savings.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    fn has_price_lock(&self, tier: &DiscountTier) -> bool {
        tier.threshold_millions >= self.price_lock_from_millions
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn current(monthly_spend: f64, monthly_credits: f64) -> CurrentUsage {
        CurrentUsage {
            month: "Feb 2025".to_string(),
            monthly_spend,
            monthly_credits,
            cost_per_credit: 0.008,
            annual_run_rate_spend: monthly_spend * 12.0,
            annualized_credits: monthly_credits * 12.0,
        }
    }

    #[test]
    fn fifty_million_commitment() {
        let q = PricingCalculator::default().quote(50);
        assert_eq!(q.tier.threshold_millions, 50);
        assert!(approx(q.discounted_monthly_cost, 28_333.33, 0.01));
        assert!(approx(q.standard_monthly_cost, 33_333.33, 0.01));
        assert!(approx(q.monthly_savings, 5_000.0, 0.01));
        assert!(approx(q.annual_savings, 60_000.0, 1e-6));
    }

    #[test]
    fn savings_identity_holds() {
        let calc = PricingCalculator::default();
        for m in (0..=120).step_by(5) {
            let q = calc.quote(m);
            let lhs = q.standard_annual_cost - q.discounted_annual_cost;
            let rhs = q.standard_monthly_cost * 12.0 - q.discounted_monthly_cost * 12.0;
            assert!(approx(lhs, rhs, 1e-6), "commitment {m}: {lhs} vs {rhs}");
            assert!(approx(q.annual_savings, lhs, 1e-6));
        }
    }

    #[test]
    fn commitment_between_tiers_keeps_requested_volume() {
        let q = PricingCalculator::default().quote(55);
        assert_eq!(q.tier.threshold_millions, 50);
        assert_eq!(q.commitment_credits, 55_000_000.0);
        assert!(approx(q.discounted_annual_cost, 55_000_000.0 * 0.0068, 1e-6));
    }

    #[test]
    fn below_smallest_tier_uses_first_tier() {
        let q = PricingCalculator::default().quote(10);
        assert_eq!(q.tier.threshold_millions, 40);
        assert!(!q.price_lock);
    }

    #[test]
    fn zero_commitment_has_no_free_months() {
        let q = PricingCalculator::default().quote(0);
        assert_eq!(q.free_months_equivalent, 0.0);
        assert_eq!(q.annual_savings, 0.0);
    }

    #[test]
    fn free_months_for_thirty_percent() {
        let q = PricingCalculator::default().quote(90);
        // 30% of twelve months.
        assert!(approx(q.free_months_equivalent, 3.6, 1e-9));
    }

    #[test]
    fn price_lock_starts_at_fifty() {
        let calc = PricingCalculator::default();
        assert!(!calc.quote(40).price_lock);
        assert!(calc.quote(50).price_lock);
        assert!(calc.quote(90).price_lock);
    }

    #[test]
    fn versus_current_is_separate_from_savings() {
        let calc = PricingCalculator::default();
        let snapshot = current(34_778.85, 4_347_355.65);
        let q = calc.quote_against(50, &snapshot);
        let vs = q.versus_current.clone().unwrap();
        assert!(approx(vs.current_annual_spend, 417_346.2, 1e-6));
        assert!(approx(vs.savings_vs_current_spend, 417_346.2 - 340_000.0, 1e-6));
        assert!(approx(q.annual_savings, 60_000.0, 1e-6));
    }

    #[test]
    fn tier_rows_mark_current_tier() {
        let rows = PricingCalculator::default().tier_rows(65);
        assert_eq!(rows.len(), 5);
        let current: Vec<u32> = rows
            .iter()
            .filter(|r| r.is_current)
            .map(|r| r.tier.threshold_millions)
            .collect();
        assert_eq!(current, vec![60]);
        assert!(approx(rows[0].annual_savings, 32_000.0, 1e-6));
    }

    #[test]
    fn recommendation_floors_annualized_volume() {
        let calc = PricingCalculator::default();
        // 4.35M per month is 52.2M per year.
        let rec = calc.recommendation(&current(34_778.85, 4_347_355.65));
        assert_eq!(rec.commitment_millions, 50);

        let small = calc.recommendation(&current(1_000.0, 125_000.0));
        assert_eq!(small.commitment_millions, 40);
    }

    #[test]
    fn savings_range_spans_tiers() {
        let range = PricingCalculator::default().savings_range();
        assert!(approx(range.min, 32_000.0, 1e-6));
        assert!(approx(range.max, 216_000.0, 1e-6));
    }

    #[test]
    fn rejects_bad_base_rate() {
        assert!(PricingCalculator::new(TierTable::default(), 0.0, 50).is_err());
        assert!(PricingCalculator::new(TierTable::default(), 0.005, 50).is_err());
    }
}
