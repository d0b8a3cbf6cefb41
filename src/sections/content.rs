//! Content builders, one per section.

use serde::Serialize;

use super::SectionContext;
use crate::config::schema::ContactConfig;
use crate::data::{CurrentUsage, SERVICES, ServiceKey};
use crate::pricing::{Recommendation, SavingsRange, TierRow};
use crate::usage::{TimeRange, Unit, growth_rate};
use crate::utils::format::{format_compact, format_currency, format_rate};

/// Label and value pair, e.g. a stat card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

impl Fact {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Benefit {
    pub title: String,
    pub description: String,
}

fn benefit(title: &str, description: impl Into<String>) -> Benefit {
    Benefit {
        title: title.to_string(),
        description: description.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Executive summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveSummary {
    pub title: String,
    pub subtitle: String,
    pub overview: String,
    pub current: CurrentUsage,
    pub base_rate: f64,
    pub first_month: String,
    /// Growth of monthly credits from the first to the latest month, percent.
    pub growth_since_first: f64,
    pub savings_range: SavingsRange,
    pub highlights: Vec<Fact>,
    pub benefits: Vec<Benefit>,
    pub quote: String,
    pub call_to_action: String,
}

pub(super) fn executive_summary(ctx: &SectionContext<'_>) -> ExecutiveSummary {
    let general = &ctx.config.general;
    let current = ctx.dataset.snapshot();
    let first = ctx.dataset.first();
    let base_rate = ctx.calculator.base_rate();
    let savings_range = ctx.calculator.savings_range();
    let range_text = format!(
        "{} to {}",
        format_currency(savings_range.min, 0),
        format_currency(savings_range.max, 0)
    );

    let overview = format!(
        "{client} has grown to {spend} in monthly spend since {first}, with {credits} credits \
         consumed in {month} at {rate} per credit. Lock in your current rate with an annual \
         plan and save {range_text} based on volume.",
        client = general.client_name,
        spend = format_currency(current.monthly_spend, 0),
        first = first.month,
        credits = format_compact(current.monthly_credits),
        month = current.month,
        rate = format_rate(base_rate),
    );

    let highlights = vec![
        Fact::new("Current monthly spend", format_currency(current.monthly_spend, 0)),
        Fact::new("Annual run rate", format_currency(current.annual_run_rate_spend, 0)),
        Fact::new("Monthly credits", format_compact(current.monthly_credits)),
        Fact::new("Current rate", format!("{} per credit", format_rate(base_rate))),
        Fact::new("Potential annual savings", range_text.clone()),
    ];

    let benefits = vec![
        benefit("Significant savings", format!("{range_text} based on committed volume")),
        benefit(
            "Price lock",
            format!("Secure {} per credit pricing for 12 months as you continue to scale", format_rate(base_rate)),
        ),
        benefit(
            "Priority support",
            "Dedicated account management and early access to new features",
        ),
        benefit(
            "Community partnership",
            "Helping sales and marketing professionals become GTM engineers through training and community building",
        ),
        benefit(
            "Predictable budgeting",
            "Simplified financial planning with consistent annual billing",
        ),
    ];

    ExecutiveSummary {
        title: "Executive Summary".to_string(),
        subtitle: format!("Annual plan proposal for {}", general.client_name),
        overview,
        base_rate,
        first_month: first.month.clone(),
        growth_since_first: growth_rate(first.sum_of_credits, current.monthly_credits).round(),
        current,
        savings_range,
        highlights,
        benefits,
        quote: "When in doubt, go on the side of what's better for the customer. The real work \
                isn't in the initial growth spurt; it's in building the machine that can sustain \
                and repeat it."
            .to_string(),
        call_to_action: "Lock in your annual discount within 30 days and start saving immediately."
            .to_string(),
    }
}

// ---------------------------------------------------------------------------
// Usage analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ServiceOption {
    pub key: ServiceKey,
    pub name: &'static str,
    pub color: &'static str,
    pub credit_cost: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeOption {
    pub value: TimeRange,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageAnalysis {
    pub title: String,
    pub subtitle: String,
    pub months: Vec<String>,
    pub services: Vec<ServiceOption>,
    pub ranges: Vec<RangeOption>,
    pub default_range: TimeRange,
    pub default_mode: Unit,
    pub other_threshold_pct: f64,
    pub credit_cost_note: String,
}

pub(super) fn usage_analysis(ctx: &SectionContext<'_>) -> UsageAnalysis {
    let usage = &ctx.config.usage;
    UsageAnalysis {
        title: "Usage Analysis".to_string(),
        subtitle: format!(
            "How {} uses {} services month by month",
            ctx.config.general.client_name, ctx.config.general.vendor_name
        ),
        months: ctx
            .dataset
            .month_labels()
            .into_iter()
            .map(str::to_string)
            .collect(),
        services: SERVICES
            .iter()
            .map(|def| ServiceOption {
                key: def.key,
                name: def.display_name,
                color: def.chart_color,
                credit_cost: def.credit_cost,
            })
            .collect(),
        ranges: vec![
            RangeOption {
                value: TimeRange::All,
                label: "All time",
            },
            RangeOption {
                value: TimeRange::Last6,
                label: "Last 6 months",
            },
            RangeOption {
                value: TimeRange::Last3,
                label: "Last 3 months",
            },
        ],
        default_range: usage.default_range,
        default_mode: usage.default_mode,
        other_threshold_pct: usage.other_threshold_pct,
        credit_cost_note: "All results are charged only on success. You are only charged when \
                           we find what you're looking for."
            .to_string(),
    }
}

// ---------------------------------------------------------------------------
// Annual plan benefits
// ---------------------------------------------------------------------------

/// Commitment slider bounds, in millions of credits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderSettings {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnualPlanBenefits {
    pub title: String,
    pub subtitle: String,
    pub slider: SliderSettings,
    pub tiers: Vec<TierRow>,
    pub current: CurrentUsage,
    pub recommendation: Recommendation,
    /// Savings given up by staying on monthly billing at the recommended tier.
    pub cost_of_not_switching: f64,
    pub benefits: Vec<Benefit>,
    pub top_up_policy: String,
    pub disclaimer: String,
}

pub(super) fn annual_plan_benefits(ctx: &SectionContext<'_>) -> AnnualPlanBenefits {
    let pricing = &ctx.config.pricing;
    let tiers = ctx.calculator.tiers();
    let current = ctx.dataset.snapshot();
    let recommendation = ctx.calculator.recommendation(&current);

    let min = tiers.smallest().threshold_millions;
    let max = pricing.slider_max_millions.max(tiers.largest().threshold_millions);
    let slider = SliderSettings {
        min,
        max,
        step: pricing.slider_step_millions.max(1),
        default: recommendation.commitment_millions.clamp(min, max),
    };

    AnnualPlanBenefits {
        title: "Annual Plan Benefits".to_string(),
        subtitle: "Lock in your credit rate now and save significantly as your usage continues to grow"
            .to_string(),
        tiers: ctx.calculator.tier_rows(slider.default),
        cost_of_not_switching: recommendation.quote.annual_savings,
        slider,
        current,
        recommendation,
        benefits: vec![
            benefit(
                "Predictable budgeting",
                "Lock in your rates for the entire year and simplify budgeting with upfront annual billing.",
            ),
            benefit(
                "Premium support",
                "Get dedicated account management and priority technical support for all your needs.",
            ),
            benefit(
                "Volume discounts",
                "Receive significant discounts on your high-volume usage across all data enrichment services.",
            ),
            benefit(
                "Price protection",
                "Protect yourself against future rate increases with a guaranteed price lock for 12 months.",
            ),
        ],
        top_up_policy: "If you exceed your annual commitment, additional credits are billed at \
                        your discounted tier rate, so your savings hold as usage grows."
            .to_string(),
        disclaimer: "Pricing shown is for illustration. Actual savings depend on your usage patterns."
            .to_string(),
    }
}

// ---------------------------------------------------------------------------
// Next steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub number: usize,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetails {
    pub vendor: String,
    pub website: String,
    pub client: String,
    pub proposal_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextSteps {
    pub title: String,
    pub subtitle: String,
    pub steps: Vec<Step>,
    pub contact: ContactConfig,
    pub company: CompanyDetails,
    pub booking_url: String,
    pub quote: String,
}

const STEPS: [(&str, &str); 4] = [
    (
        "Review Proposal",
        "Take time to review all details of this annual plan proposal",
    ),
    (
        "Schedule Discussion",
        "Book a call with your account manager to discuss any questions",
    ),
    (
        "Sign Agreement",
        "Complete the digital signature process for the annual agreement",
    ),
    (
        "Onboarding",
        "Our team will guide you through the transition to the annual plan",
    ),
];

pub(super) fn next_steps(ctx: &SectionContext<'_>) -> NextSteps {
    let general = &ctx.config.general;
    let contact = ctx.config.contact.clone();
    NextSteps {
        title: "Next Steps".to_string(),
        subtitle: "Here's how to proceed with your annual plan proposal".to_string(),
        steps: STEPS
            .iter()
            .enumerate()
            .map(|(i, &(title, description))| Step {
                number: i + 1,
                title,
                description,
            })
            .collect(),
        company: CompanyDetails {
            vendor: general.vendor_name.clone(),
            website: contact.website.clone(),
            client: general.client_name.clone(),
            proposal_date: general.proposal_date.clone(),
        },
        booking_url: contact.booking_url.clone(),
        contact,
        quote: "No company has ever made it to the summit without successfully passing through \
                basecamp first. Focus on the next 18 months, not the next 18 years."
            .to_string(),
    }
}

// ---------------------------------------------------------------------------
// About us
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AboutUs {
    pub title: String,
    pub subtitle: String,
    pub mission: String,
    pub offerings: Vec<Benefit>,
    pub overview: Vec<Fact>,
    pub links: Vec<Link>,
    pub founder_quote: String,
}

pub(super) fn about_us(ctx: &SectionContext<'_>) -> AboutUs {
    let vendor = &ctx.config.general.vendor_name;
    let contact = &ctx.config.contact;
    AboutUs {
        title: format!("About {vendor}"),
        subtitle: "Empowering GTM Engineers with powerful data enrichment tools".to_string(),
        mission: format!(
            "{vendor} is a provider of data enrichment APIs designed for GTM (Go-To-Market) \
             Engineers. We give sales and marketing professionals the tools to build \
             sophisticated outreach systems and automate their prospecting workflows."
        ),
        offerings: vec![
            benefit(
                "Data Enrichment APIs",
                "APIs for email finding, validation, mobile numbers, and more",
            ),
            benefit(
                "GTM Engineering Community",
                "A community of sales and marketing professionals",
            ),
            benefit(
                "Workflow Automation",
                "Tools to automate prospecting and outreach at scale",
            ),
            benefit(
                "Enterprise Solutions",
                "Tailored solutions for high-volume users with dedicated support",
            ),
        ],
        overview: vec![
            Fact::new("Founded", "2022"),
            Fact::new("Headquarters", "Boston, MA"),
            Fact::new("Industry", "Data Enrichment"),
            Fact::new("Specialization", "GTM Engineering"),
        ],
        links: vec![
            Link {
                label: "Website".to_string(),
                url: contact.website.clone(),
            },
            Link {
                label: "Contact".to_string(),
                url: contact.booking_url.clone(),
            },
        ],
        founder_quote: format!(
            "We're building {vendor} to empower the next generation of GTM Engineers: \
             professionals who combine sales, marketing and technical skills to build \
             sophisticated outreach systems."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PitchdeckConfig;
    use crate::data::Dataset;
    use crate::pricing::PricingCalculator;

    struct Fixture {
        config: PitchdeckConfig,
        dataset: Dataset,
        calculator: PricingCalculator,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                config: PitchdeckConfig::default(),
                dataset: Dataset::embedded().unwrap(),
                calculator: PricingCalculator::default(),
            }
        }

        fn ctx(&self) -> SectionContext<'_> {
            SectionContext {
                config: &self.config,
                dataset: &self.dataset,
                calculator: &self.calculator,
            }
        }
    }

    #[test]
    fn executive_summary_uses_latest_month() {
        let f = Fixture::new();
        let summary = executive_summary(&f.ctx());
        assert_eq!(summary.current.month, "Feb 2025");
        assert_eq!(summary.first_month, "Apr 2024");
        assert!(summary.overview.starts_with("Clay.com has grown to $34,779"));
        assert!(summary.overview.contains("$32,000 to $216,000"));
    }

    #[test]
    fn client_name_is_interpolated() {
        let mut f = Fixture::new();
        f.config.general.client_name = "Acme".to_string();
        f.config.general.vendor_name = "DataCo".to_string();
        assert!(executive_summary(&f.ctx()).subtitle.ends_with("for Acme"));
        assert_eq!(about_us(&f.ctx()).title, "About DataCo");
        assert_eq!(next_steps(&f.ctx()).company.client, "Acme");
    }

    #[test]
    fn slider_defaults_to_recommendation() {
        let f = Fixture::new();
        let plan = annual_plan_benefits(&f.ctx());
        assert_eq!(plan.slider.min, 40);
        assert_eq!(plan.slider.max, 100);
        assert_eq!(plan.slider.step, 5);
        assert_eq!(plan.slider.default, 50);
        assert_eq!(plan.tiers.len(), 5);
        assert!(plan.tiers.iter().any(|r| r.is_current && r.tier.threshold_millions == 50));
        assert!((plan.cost_of_not_switching - 60_000.0).abs() < 1e-6);
    }

    #[test]
    fn usage_analysis_lists_every_month_and_service() {
        let f = Fixture::new();
        let usage = usage_analysis(&f.ctx());
        assert_eq!(usage.months.len(), 11);
        assert_eq!(usage.services.len(), 7);
        assert_eq!(usage.services[1].credit_cost, "1 Credit = 20 Email Validations");
        assert_eq!(usage.default_range, TimeRange::Last6);
    }

    #[test]
    fn next_steps_are_numbered() {
        let f = Fixture::new();
        let steps = next_steps(&f.ctx());
        let numbers: Vec<usize> = steps.steps.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(steps.booking_url, "https://cal.com/team/leadmagic/strategy");
        assert_eq!(steps.company.proposal_date, "February 27, 2025");
    }
}
