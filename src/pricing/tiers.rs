//! Volume discount tiers.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Credits per "million" unit used by commitment thresholds.
pub const CREDITS_PER_MILLION: f64 = 1_000_000.0;

/// One row of the volume-discount table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountTier {
    /// Minimum annual commitment, in millions of credits.
    pub threshold_millions: u32,
    /// Discount off the base rate, `0.0..=1.0`.
    pub discount: f64,
    /// Discounted price of one credit.
    pub price_per_credit: f64,
}

impl DiscountTier {
    pub fn new(threshold_millions: u32, discount: f64, price_per_credit: f64) -> Self {
        Self {
            threshold_millions,
            discount,
            price_per_credit,
        }
    }

    /// Credits committed per year at exactly this tier's threshold.
    pub fn annual_commitment_credits(&self) -> f64 {
        f64::from(self.threshold_millions) * CREDITS_PER_MILLION
    }

    /// Discount as a whole percentage (`0.15` → `15.0`).
    pub fn discount_pct(&self) -> f64 {
        self.discount * 100.0
    }
}

/// The built-in tier table offered with the proposal.
pub fn default_tiers() -> Vec<DiscountTier> {
    vec![
        DiscountTier::new(40, 0.10, 0.0072),
        DiscountTier::new(50, 0.15, 0.0068),
        DiscountTier::new(60, 0.20, 0.0064),
        DiscountTier::new(75, 0.25, 0.0060),
        DiscountTier::new(90, 0.30, 0.0056),
    ]
}

/// An ordered, validated set of tiers.
///
/// Invariants: at least one tier; thresholds strictly increasing; price per
/// credit strictly decreasing; discount non-decreasing and within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<DiscountTier>,
}

impl TierTable {
    pub fn new(tiers: Vec<DiscountTier>) -> Result<Self> {
        if tiers.is_empty() {
            bail!("discount tier table is empty");
        }

        for tier in &tiers {
            if !(0.0..=1.0).contains(&tier.discount) {
                bail!(
                    "tier {}M: discount {} is outside 0..=1",
                    tier.threshold_millions,
                    tier.discount
                );
            }
            if !tier.price_per_credit.is_finite() || tier.price_per_credit <= 0.0 {
                bail!(
                    "tier {}M: price per credit must be positive",
                    tier.threshold_millions
                );
            }
        }

        for pair in tiers.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if upper.threshold_millions <= lower.threshold_millions {
                bail!(
                    "tier thresholds must increase strictly: {}M follows {}M",
                    upper.threshold_millions,
                    lower.threshold_millions
                );
            }
            if upper.price_per_credit >= lower.price_per_credit {
                bail!(
                    "tier {}M: price per credit {} must be below {} of tier {}M",
                    upper.threshold_millions,
                    upper.price_per_credit,
                    lower.price_per_credit,
                    lower.threshold_millions
                );
            }
            if upper.discount < lower.discount {
                bail!(
                    "tier {}M: discount {} is lower than tier {}M",
                    upper.threshold_millions,
                    upper.discount,
                    lower.threshold_millions
                );
            }
        }

        Ok(Self { tiers })
    }

    /// Tier that applies to a commitment: the highest threshold at or below
    /// `commitment_millions`, or the smallest tier when the commitment is
    /// under every threshold.
    pub fn applicable(&self, commitment_millions: u32) -> &DiscountTier {
        let above = self
            .tiers
            .partition_point(|t| t.threshold_millions <= commitment_millions);
        &self.tiers[above.saturating_sub(1)]
    }

    pub fn smallest(&self) -> &DiscountTier {
        &self.tiers[0]
    }

    pub fn largest(&self) -> &DiscountTier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiscountTier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}
