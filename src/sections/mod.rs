//! Proposal sections and their navigation order.
//!
//! Each section has a stable slug used in URLs and a content builder that
//! fills the page from config, dataset and pricing.

mod content;

use serde::Serialize;

use crate::config::schema::PitchdeckConfig;
use crate::data::Dataset;
use crate::pricing::PricingCalculator;

pub use content::{
    AboutUs, AnnualPlanBenefits, Benefit, CompanyDetails, ExecutiveSummary, Fact, Link,
    NextSteps, RangeOption, ServiceOption, SliderSettings, Step, UsageAnalysis,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    ExecutiveSummary,
    UsageAnalysis,
    AnnualPlanBenefits,
    NextSteps,
    AboutUs,
}

impl Section {
    /// Navigation order.
    pub const ALL: [Section; 5] = [
        Self::ExecutiveSummary,
        Self::UsageAnalysis,
        Self::AnnualPlanBenefits,
        Self::NextSteps,
        Self::AboutUs,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "executive-summary",
            Self::UsageAnalysis => "usage-analysis",
            Self::AnnualPlanBenefits => "annual-plan-benefits",
            Self::NextSteps => "next-steps",
            Self::AboutUs => "about-us",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    /// Sidebar label.
    pub fn title(self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "Executive Summary",
            Self::UsageAnalysis => "Usage Analysis",
            Self::AnnualPlanBenefits => "Annual Plan Benefits",
            Self::NextSteps => "Next Steps",
            Self::AboutUs => "About Us",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub slug: &'static str,
    pub title: &'static str,
}

pub fn navigation() -> Vec<NavItem> {
    Section::ALL
        .into_iter()
        .map(|s| NavItem {
            slug: s.slug(),
            title: s.title(),
        })
        .collect()
}

/// Everything a content builder reads.
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub config: &'a PitchdeckConfig,
    pub dataset: &'a Dataset,
    pub calculator: &'a PricingCalculator,
}

/// Rendered content of one section, tagged with its slug.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", rename_all = "kebab-case")]
pub enum SectionContent {
    ExecutiveSummary(ExecutiveSummary),
    UsageAnalysis(UsageAnalysis),
    AnnualPlanBenefits(AnnualPlanBenefits),
    NextSteps(NextSteps),
    AboutUs(AboutUs),
}

impl SectionContent {
    pub fn build(section: Section, ctx: &SectionContext<'_>) -> Self {
        match section {
            Section::ExecutiveSummary => Self::ExecutiveSummary(content::executive_summary(ctx)),
            Section::UsageAnalysis => Self::UsageAnalysis(content::usage_analysis(ctx)),
            Section::AnnualPlanBenefits => {
                Self::AnnualPlanBenefits(content::annual_plan_benefits(ctx))
            }
            Section::NextSteps => Self::NextSteps(content::next_steps(ctx)),
            Section::AboutUs => Self::AboutUs(content::about_us(ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_slug(section.slug()), Some(section));
        }
        assert_eq!(Section::from_slug("pricing"), None);
        assert_eq!(Section::from_slug("Executive-Summary"), None);
    }

    #[test]
    fn serde_name_matches_slug() {
        for section in Section::ALL {
            let json = serde_json::to_string(&section).unwrap();
            assert_eq!(json, format!("\"{}\"", section.slug()));
        }
    }

    #[test]
    fn navigation_is_in_order() {
        let nav = navigation();
        assert_eq!(nav.len(), 5);
        assert_eq!(nav[0].slug, "executive-summary");
        assert_eq!(nav[4].title, "About Us");
    }

    #[test]
    fn content_is_tagged_with_slug() {
        let config = PitchdeckConfig::default();
        let dataset = Dataset::embedded().unwrap();
        let calculator = PricingCalculator::default();
        let ctx = SectionContext {
            config: &config,
            dataset: &dataset,
            calculator: &calculator,
        };
        for section in Section::ALL {
            let value = serde_json::to_value(SectionContent::build(section, &ctx)).unwrap();
            assert_eq!(value["section"], section.slug());
        }
    }
}
