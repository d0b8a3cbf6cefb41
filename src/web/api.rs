//! JSON API handlers for the proposal dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. Handlers recompute from
//! the shared [`AppState`] on every call.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::data::CurrentUsage;
use crate::gate::SessionPolicy;
use crate::pricing::{Quote, SavingsRange, TierRow, TierTable};
use crate::sections::{self, NavItem, Section, SectionContent, SectionContext};
use crate::usage::{self, AggregatorSettings, ViewState};

use super::{AppState, HttpResponse, content_type_json, error_response};

// ---------------------------------------------------------------------------
// Request and response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GateRequest {
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct GateResponse {
    granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
struct SectionsResponse {
    client_name: String,
    vendor_name: String,
    sections: Vec<NavItem>,
}

#[derive(Serialize)]
struct TiersResponse<'a> {
    base_rate: f64,
    price_lock_from_millions: u32,
    tiers: &'a TierTable,
    savings_range: SavingsRange,
}

#[derive(Deserialize)]
struct QuoteQuery {
    commitment: Option<String>,
}

#[derive(Serialize)]
struct QuoteResponse {
    quote: Quote,
    tiers: Vec<TierRow>,
}

/// `?mode=&range=&services=&months=`; lists are comma-separated.
#[derive(Deserialize)]
struct UsageQuery {
    mode: Option<String>,
    range: Option<String>,
    services: Option<String>,
    months: Option<String>,
}

#[derive(Serialize)]
struct InsightsResponse {
    insights: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    months: usize,
    first_month: String,
    latest_month: String,
    tiers: usize,
    current: CurrentUsage,
    event_log: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

fn bad_request(message: &str) -> Result<HttpResponse> {
    Ok(error_response(400, message))
}

fn section_context(state: &AppState) -> SectionContext<'_> {
    SectionContext {
        config: &state.config,
        dataset: &state.dataset,
        calculator: &state.calculator,
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/gate` with `{ "password": "..." }`. Always 200; a wrong word
/// is an answer, not an error.
pub fn post_gate(state: &AppState, body: &str) -> Result<HttpResponse> {
    let Ok(req) = serde_json::from_str::<GateRequest>(body) else {
        return bad_request("expected a JSON body like {\"password\": \"...\"}");
    };
    let outcome = state.gate.check(&req.password);
    state.events.gate_attempt(outcome.is_granted());
    json_response(&GateResponse {
        granted: outcome.is_granted(),
        message: outcome.message().map(str::to_string),
    })
}

/// `GET /api/session`: how the client keeps its session flag.
pub fn get_session(state: &AppState) -> Result<HttpResponse> {
    json_response(&SessionPolicy::new(state.config.gate.preview_mode))
}

/// `GET /api/sections`: navigation.
pub fn get_sections(state: &AppState) -> Result<HttpResponse> {
    json_response(&SectionsResponse {
        client_name: state.config.general.client_name.clone(),
        vendor_name: state.config.general.vendor_name.clone(),
        sections: sections::navigation(),
    })
}

/// `GET /api/sections/{slug}`: one section's content.
pub fn get_section(state: &AppState, slug: &str) -> Result<HttpResponse> {
    let Some(section) = Section::from_slug(slug) else {
        return Ok(error_response(404, &format!("unknown section '{slug}'")));
    };
    state.events.section_view(section.slug());
    json_response(&SectionContent::build(section, &section_context(state)))
}

/// `GET /api/pricing/tiers`
pub fn get_tiers(state: &AppState) -> Result<HttpResponse> {
    json_response(&TiersResponse {
        base_rate: state.calculator.base_rate(),
        price_lock_from_millions: state.config.pricing.price_lock_from_millions,
        tiers: state.calculator.tiers(),
        savings_range: state.calculator.savings_range(),
    })
}

/// `GET /api/pricing/quote?commitment=N`: `N` in millions of credits.
/// Without `N` the recommended commitment is quoted.
pub fn get_quote(state: &AppState, query: &str) -> Result<HttpResponse> {
    let Ok(params) = serde_urlencoded::from_str::<QuoteQuery>(query) else {
        return bad_request("malformed query string");
    };
    let current = state.dataset.snapshot();
    let commitment = match params.commitment.as_deref().map(str::trim) {
        None | Some("") => state.calculator.recommendation(&current).commitment_millions,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                return bad_request(&format!(
                    "commitment must be a whole number of millions, got '{raw}'"
                ));
            }
        },
    };

    let quote = state.calculator.quote_against(commitment, &current);
    state
        .events
        .quote(commitment, quote.tier.threshold_millions);
    json_response(&QuoteResponse {
        tiers: state.calculator.tier_rows(commitment),
        quote,
    })
}

/// `GET /api/usage?mode=&range=&services=&months=`
pub fn get_usage(state: &AppState, query: &str) -> Result<HttpResponse> {
    let Ok(params) = serde_urlencoded::from_str::<UsageQuery>(query) else {
        return bad_request("malformed query string");
    };
    let view_state = match ViewState::from_params(
        &state.config.usage,
        &state.dataset,
        params.mode.as_deref(),
        params.range.as_deref(),
        params.services.as_deref(),
        params.months.as_deref(),
    ) {
        Ok(s) => s,
        Err(e) => return bad_request(&e.to_string()),
    };
    let settings = AggregatorSettings::from(&state.config.usage);
    json_response(&usage::aggregate(&state.dataset, &view_state, &settings))
}

/// `GET /api/usage/spend`
pub fn get_spend(state: &AppState) -> Result<HttpResponse> {
    json_response(&usage::spend_series(&state.dataset))
}

/// `GET /api/usage/insights`
pub fn get_insights(state: &AppState) -> Result<HttpResponse> {
    json_response(&InsightsResponse {
        insights: usage::insights(&state.dataset),
    })
}

/// `GET /api/health`
pub fn get_health(state: &AppState) -> Result<HttpResponse> {
    json_response(&HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        months: state.dataset.months().len(),
        first_month: state.dataset.first().month.clone(),
        latest_month: state.dataset.latest().month.clone(),
        tiers: state.calculator.tiers().len(),
        current: state.dataset.snapshot(),
        event_log: state.events.path().map(|p| p.display().to_string()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
