//! Embedded proposal dashboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The single-page proposal: password screen, sidebar and five sections
//! - JSON API endpoints for the gate, section content, pricing and usage
//!
//! Launched via `pitchdeck serve` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::analytics::logger::EventLog;
use crate::config::schema::PitchdeckConfig;
use crate::data::Dataset;
use crate::gate::SoftGate;
use crate::pricing::PricingCalculator;

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything a request handler reads. Loaded once, never mutated.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: PitchdeckConfig,
    pub dataset: Dataset,
    pub calculator: PricingCalculator,
    pub gate: SoftGate,
    pub events: EventLog,
}

impl AppState {
    pub fn new(config: PitchdeckConfig, dataset: Dataset, events: EventLog) -> Result<Self> {
        let calculator =
            PricingCalculator::from_config(&config.pricing).context("invalid [pricing] config")?;
        let gate = SoftGate::new(config.gate.password.clone());
        Ok(Self {
            config,
            dataset,
            calculator,
            gate,
            events,
        })
    }

    /// Load the dataset named by the config (or the embedded one) and open
    /// the event log.
    pub fn from_config(config: PitchdeckConfig) -> Result<Self> {
        let dataset = Dataset::load(config.data.path.as_deref().map(Path::new))?;
        let events = EventLog::from_config(&config.logging);
        Self::new(config, dataset, events)
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on the given address.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a single presenter). Errors are answered per request without stopping
/// the server.
pub fn serve(state: &AppState, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!(
        "{} proposal for {} running at http://{addr}",
        state.config.general.vendor_name, state.config.general.client_name
    );
    println!("Press Ctrl+C to stop.\n");

    if open {
        // Best-effort
        let _ = open_browser(&format!("http://{addr}"));
    }

    run(&server, state);
    Ok(())
}

/// Answer requests from `server` until it shuts down.
pub fn run(server: &Server, state: &AppState) {
    for request in server.incoming_requests() {
        handle(request, state);
    }
}

fn handle(mut request: Request, state: &AppState) {
    let method = request.method().clone();
    let url = request.url().to_string();

    // Read body up-front for methods that carry one
    let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
        let mut buf = String::new();
        let _ = request.as_reader().read_to_string(&mut buf);
        Some(buf)
    } else {
        None
    };

    let resp = dispatch(state, &method, &url, body.as_deref())
        .unwrap_or_else(|e| error_response(500, &format!("{e:#}")));
    let _ = request.respond(resp);

    // Brief access log
    if state.config.logging.access_log {
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub(crate) fn dispatch(
    state: &AppState,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<HttpResponse> {
    // Strip query string for path matching
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match (method, path) {
        // Frontend
        (&Method::Get, "/" | "/index.html" | "/password") => Ok(serve_frontend()),

        // API: gate
        (&Method::Post, "/api/gate") => api::post_gate(state, body.unwrap_or("")),
        (&Method::Get, "/api/session") => api::get_session(state),

        // API: sections
        (&Method::Get, "/api/sections") => api::get_sections(state),
        (&Method::Get, p) if p.starts_with("/api/sections/") => {
            api::get_section(state, &p["/api/sections/".len()..])
        }

        // API: pricing
        (&Method::Get, "/api/pricing/tiers") => api::get_tiers(state),
        (&Method::Get, "/api/pricing/quote") => api::get_quote(state, query),

        // API: usage
        (&Method::Get, "/api/usage") => api::get_usage(state, query),
        (&Method::Get, "/api/usage/spend") => api::get_spend(state),
        (&Method::Get, "/api/usage/insights") => api::get_insights(state),

        // API: health
        (&Method::Get, "/api/health") => api::get_health(state),

        (_, p) if p == "/api" || p.starts_with("/api/") => Ok(not_found()),

        // Any other page goes back to the app root
        (&Method::Get, _) => Ok(redirect("/")),

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> HttpResponse {
    let html = frontend::INDEX_HTML;
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> HttpResponse {
    error_response(404, "not found")
}

/// JSON `{ "error": ... }` with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

fn redirect(location: &str) -> HttpResponse {
    let location = Header::from_bytes("Location", location)
        .unwrap_or_else(|_| Header::from_bytes("Location", "/").unwrap());
    Response::from_data(Vec::new())
        .with_header(location)
        .with_status_code(StatusCode(302))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
