//! Static service catalog.
//!
//! The seven billable API services that appear as columns in the usage
//! dataset, with the display name and chart colour the dashboard uses.

use serde::{Deserialize, Serialize};

/// Display name of the synthetic bucket that collects small services.
pub const OTHER_SERVICES_NAME: &str = "Other Services";

/// Chart colour of the "Other Services" bucket.
pub const OTHER_SERVICES_COLOR: &str = "#64748b";

/// One of the seven billable services. Serializes as the dataset column key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceKey {
    EmailFinder,
    EmailValidation,
    MobileFinder,
    CompanySearch,
    LinkedinFinder,
    CompetitorsSearch,
    PersonalEmailFinder,
}

impl ServiceKey {
    /// All services in catalog order.
    pub const ALL: [ServiceKey; 7] = [
        Self::EmailFinder,
        Self::EmailValidation,
        Self::MobileFinder,
        Self::CompanySearch,
        Self::LinkedinFinder,
        Self::CompetitorsSearch,
        Self::PersonalEmailFinder,
    ];

    /// Column key in the dataset JSON (e.g. `"emailFinder"`).
    pub fn key(self) -> &'static str {
        self.definition().key_str
    }

    /// Parse a column key. Case-insensitive; `-` and `_` are ignored so
    /// `email-finder` and `email_finder` also match.
    pub fn from_key(raw: &str) -> Option<Self> {
        let wanted: String = raw
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.key().to_ascii_lowercase() == wanted)
    }

    /// Catalog entry for this service.
    pub fn definition(self) -> &'static ServiceDefinition {
        &SERVICES[self as usize]
    }

    pub fn display_name(self) -> &'static str {
        self.definition().display_name
    }

    pub fn chart_color(self) -> &'static str {
        self.definition().chart_color
    }
}

impl std::fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Static description of a service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDefinition {
    pub key: ServiceKey,
    #[serde(skip)]
    key_str: &'static str,
    pub display_name: &'static str,
    pub chart_color: &'static str,
    /// Human-readable credit cost, e.g. `"1 Credit = 20 Email Validations"`.
    pub credit_cost: &'static str,
}

/// The service catalog, indexed by `ServiceKey as usize`.
pub static SERVICES: [ServiceDefinition; 7] = [
    ServiceDefinition {
        key: ServiceKey::EmailFinder,
        key_str: "emailFinder",
        display_name: "Email Finder",
        chart_color: "#2563eb",
        credit_cost: "1 Credit = 1 Email Found",
    },
    ServiceDefinition {
        key: ServiceKey::EmailValidation,
        key_str: "emailValidation",
        display_name: "Email Validation",
        chart_color: "#7c3aed",
        credit_cost: "1 Credit = 20 Email Validations",
    },
    ServiceDefinition {
        key: ServiceKey::MobileFinder,
        key_str: "mobileFinder",
        display_name: "Mobile Finder",
        chart_color: "#0891b2",
        credit_cost: "5 Credits = 1 Mobile Found",
    },
    ServiceDefinition {
        key: ServiceKey::CompanySearch,
        key_str: "companySearch",
        display_name: "Company Search",
        chart_color: "#059669",
        credit_cost: "1 Credit = 1 Company Found",
    },
    ServiceDefinition {
        key: ServiceKey::LinkedinFinder,
        key_str: "linkedinFinder",
        display_name: "Email to B2B Profile",
        chart_color: "#d97706",
        credit_cost: "10 Credits = 1 Email Found",
    },
    ServiceDefinition {
        key: ServiceKey::CompetitorsSearch,
        key_str: "competitorsSearch",
        display_name: "Competitors Search",
        chart_color: "#9333ea",
        credit_cost: "5 Credits = 1 Group of Competitors",
    },
    ServiceDefinition {
        key: ServiceKey::PersonalEmailFinder,
        key_str: "personalEmailFinder",
        display_name: "Personal Email Finder",
        chart_color: "#ec4899",
        credit_cost: "2 Credits = 1 Personal Email",
    },
];
