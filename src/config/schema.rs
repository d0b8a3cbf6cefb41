/// Configuration schema and defaults for pitchdeck.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[general]`, `[gate]`, `[server]`, `[data]`, `[pricing]`, `[usage]`,
/// `[contact]` and `[logging]`.
///
/// Every field has a built-in default. A config file only needs the values
/// it wants to change.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::pricing::{BASE_RATE, DiscountTier, default_tiers};
use crate::usage::{TimeRange, Unit};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level pitchdeck configuration.
///
/// Maps directly to `~/.pitchdeck/config.toml` and `.pitchdeck.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchdeckConfig {
    pub general: GeneralConfig,
    pub gate: GateConfig,
    pub server: ServerConfig,
    pub data: DataConfig,
    pub pricing: PricingConfig,
    pub usage: UsageConfig,
    pub contact: ContactConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

/// Who the proposal is for and from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Prospective client, shown in headings.
    pub client_name: String,
    /// Company presenting the proposal.
    pub vendor_name: String,
    /// Date printed on the "next steps" page.
    pub proposal_date: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            client_name: "Clay.com".to_string(),
            vendor_name: "LeadMagic".to_string(),
            proposal_date: "February 27, 2025".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [gate]
// ---------------------------------------------------------------------------

/// Soft access gate. Not a security boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Shared word that opens the proposal.
    pub password: String,
    /// Keep the browser session flag across reloads. When `false` the
    /// dashboard clears the flag each time the app loads.
    pub preview_mode: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            password: "claymagic1".to_string(),
            preview_mode: false,
        }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for `pitchdeck serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Replacement dataset file. Unset means the embedded dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// [pricing]
// ---------------------------------------------------------------------------

/// Annual-plan calculator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Standard price of one credit.
    pub base_rate: f64,
    /// Tiers at or above this threshold carry the credit price lock.
    pub price_lock_from_millions: u32,
    /// Upper end of the commitment slider.
    pub slider_max_millions: u32,
    pub slider_step_millions: u32,
    /// Volume discount table, ordered by threshold.
    pub tiers: Vec<DiscountTier>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_rate: BASE_RATE,
            price_lock_from_millions: 50,
            slider_max_millions: 100,
            slider_step_millions: 5,
            tiers: default_tiers(),
        }
    }
}

// ---------------------------------------------------------------------------
// [usage]
// ---------------------------------------------------------------------------

/// Usage aggregator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Services whose share is strictly below this percentage are grouped
    /// into "Other Services".
    pub other_threshold_pct: f64,
    /// Time range the usage view opens with.
    pub default_range: TimeRange,
    /// Unit the usage view opens with.
    pub default_mode: Unit,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            other_threshold_pct: 5.0,
            default_range: TimeRange::Last6,
            default_mode: Unit::Credits,
        }
    }
}

// ---------------------------------------------------------------------------
// [contact]
// ---------------------------------------------------------------------------

/// Account manager shown on the "next steps" page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub booking_url: String,
    pub website: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            name: "Jesse Ouellette".to_string(),
            title: "Founder & CEO".to_string(),
            email: "jesse@leadmagic.io".to_string(),
            phone: "(555) 123-4567".to_string(),
            booking_url: "https://cal.com/team/leadmagic/strategy".to_string(),
            website: "https://leadmagic.io".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append activity events to `~/.pitchdeck/events.jsonl`.
    pub enabled: bool,
    /// Print one access line per request.
    pub access_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            access_log: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl PitchdeckConfig {
    /// Annotated default config file content, written by `pitchdeck config init`.
    pub fn default_toml() -> String {
        r#"# pitchdeck configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (PITCHDECK_*)
#   2. Project config (.pitchdeck.toml in current directory)
#   3. User global config (~/.pitchdeck/config.toml)
#   4. Built-in defaults

[general]
client_name = "Clay.com"
vendor_name = "LeadMagic"
proposal_date = "February 27, 2025"

[gate]
password = "claymagic1"   # soft gate only, not access control
preview_mode = false      # true keeps the browser session flag across reloads

[server]
addr = "127.0.0.1:9747"
open_browser = true

[data]
# path = "data/consumption.json"   # unset: use the embedded dataset

[usage]
other_threshold_pct = 5.0   # shares below this are grouped as "Other Services"
default_range = "6m"        # all | 6m | 3m
default_mode = "credits"    # credits | dollars

[contact]
name = "Jesse Ouellette"
title = "Founder & CEO"
email = "jesse@leadmagic.io"
phone = "(555) 123-4567"
booking_url = "https://cal.com/team/leadmagic/strategy"
website = "https://leadmagic.io"

[logging]
enabled = true      # activity events in ~/.pitchdeck/events.jsonl
access_log = true

[pricing]
base_rate = 0.008
price_lock_from_millions = 50
slider_max_millions = 100
slider_step_millions = 5

[[pricing.tiers]]
threshold_millions = 40
discount = 0.10
price_per_credit = 0.0072

[[pricing.tiers]]
threshold_millions = 50
discount = 0.15
price_per_credit = 0.0068

[[pricing.tiers]]
threshold_millions = 60
discount = 0.20
price_per_credit = 0.0064

[[pricing.tiers]]
threshold_millions = 75
discount = 0.25
price_per_credit = 0.0060

[[pricing.tiers]]
threshold_millions = 90
discount = 0.30
price_per_credit = 0.0056
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = PitchdeckConfig::default();
        assert_eq!(cfg.general.client_name, "Clay.com");
        assert!(!cfg.gate.preview_mode);
        assert_eq!(cfg.server.addr, "127.0.0.1:9747");
        assert!(cfg.data.path.is_none());
        assert_eq!(cfg.pricing.tiers.len(), 5);
        assert_eq!(cfg.usage.default_range, TimeRange::Last6);
        assert_eq!(cfg.usage.default_mode, Unit::Credits);
        assert!(cfg.logging.enabled);
    }

    #[test]
    fn deserialize_minimal_toml() {
        let toml_str = r#"
[general]
client_name = "Acme Corp"

[gate]
preview_mode = true
"#;
        let cfg: PitchdeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.general.client_name, "Acme Corp");
        assert_eq!(cfg.general.vendor_name, "LeadMagic");
        assert!(cfg.gate.preview_mode);
        assert_eq!(cfg.gate.password, "claymagic1");
        assert_eq!(cfg.pricing.tiers, default_tiers());
    }

    #[test]
    fn custom_tiers_replace_defaults() {
        let toml_str = r#"
[pricing]
base_rate = 0.01

[[pricing.tiers]]
threshold_millions = 10
discount = 0.05
price_per_credit = 0.0095
"#;
        let cfg: PitchdeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.pricing.tiers.len(), 1);
        assert_eq!(cfg.pricing.tiers[0].threshold_millions, 10);
        assert_eq!(cfg.pricing.slider_max_millions, 100);
    }

    #[test]
    fn usage_enums_parse_from_toml() {
        let toml_str = r#"
[usage]
default_range = "3m"
default_mode = "dollars"
"#;
        let cfg: PitchdeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.usage.default_range, TimeRange::Last3);
        assert_eq!(cfg.usage.default_mode, Unit::Dollars);
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let cfg: PitchdeckConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.addr, "127.0.0.1:9747");
        assert!((cfg.usage.other_threshold_pct - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_toml_parses_back() {
        let cfg: PitchdeckConfig = toml::from_str(&PitchdeckConfig::default_toml()).unwrap();
        assert_eq!(cfg.pricing.tiers, default_tiers());
        assert_eq!(cfg.contact.booking_url, ContactConfig::default().booking_url);
    }

    #[test]
    fn serialized_defaults_round_trip() {
        let text = toml::to_string_pretty(&PitchdeckConfig::default()).unwrap();
        let cfg: PitchdeckConfig = toml::from_str(&text).unwrap();
        assert_eq!(cfg.pricing.tiers.len(), 5);
    }
}
