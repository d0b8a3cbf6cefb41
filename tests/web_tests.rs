/// End-to-end dashboard tests.
///
/// Each test binds a `tiny_http` server on an ephemeral port, serves it from
/// a background thread and talks to it over real HTTP with `ureq`.
use std::path::PathBuf;
use std::thread;

use pitchdeck::analytics::events::EventKind;
use pitchdeck::analytics::logger::EventLog;
use pitchdeck::config::PitchdeckConfig;
use pitchdeck::data::Dataset;
use pitchdeck::web::{self, AppState};

fn quiet_config() -> PitchdeckConfig {
    let mut config = PitchdeckConfig::default();
    config.logging.access_log = false;
    config
}

/// Start a dashboard and return its base URL.
fn spawn(config: PitchdeckConfig, events: EventLog) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let state = AppState::new(config, Dataset::embedded().unwrap(), events).unwrap();
    thread::spawn(move || web::run(&server, &state));
    format!("http://{addr}")
}

fn spawn_default() -> String {
    spawn(quiet_config(), EventLog::disabled())
}

fn get_json(url: &str) -> serde_json::Value {
    ureq::get(url).call().unwrap().into_json().unwrap()
}

fn status_of(result: Result<ureq::Response, ureq::Error>) -> u16 {
    match result {
        Ok(resp) => resp.status(),
        Err(ureq::Error::Status(code, _)) => code,
        Err(e) => panic!("transport error: {e}"),
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pitchdeck-web-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[test]
fn root_serves_the_dashboard() {
    let base = spawn_default();
    let resp = ureq::get(&format!("{base}/")).call().unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.content_type().starts_with("text/html"));
    let body = resp.into_string().unwrap();
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("/api/gate"));
}

#[test]
fn unknown_page_lands_on_root() {
    let base = spawn_default();
    let resp = ureq::get(&format!("{base}/pricing/enterprise")).call().unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.get_url().ends_with('/'));
    assert!(resp.into_string().unwrap().contains("<!DOCTYPE html>"));
}

#[test]
fn unknown_api_path_is_json_404() {
    let base = spawn_default();
    match ureq::get(&format!("{base}/api/unknown")).call() {
        Err(ureq::Error::Status(404, resp)) => {
            let body: serde_json::Value = resp.into_json().unwrap();
            assert_eq!(body["error"], "not found");
        }
        other => panic!("expected 404, got {:?}", other.map(|r| r.status())),
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

#[test]
fn gate_accepts_and_rejects() {
    let base = spawn_default();
    let url = format!("{base}/api/gate");

    let ok: serde_json::Value = ureq::post(&url)
        .send_json(serde_json::json!({ "password": "claymagic1" }))
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(ok["granted"], true);

    let denied: serde_json::Value = ureq::post(&url)
        .send_json(serde_json::json!({ "password": "ClayMagic1" }))
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(denied["granted"], false);
    assert_eq!(denied["message"], "Incorrect password. Please try again.");
}

#[test]
fn gate_password_comes_from_config() {
    let mut config = quiet_config();
    config.gate.password = "open-sesame".to_string();
    let base = spawn(config, EventLog::disabled());
    let url = format!("{base}/api/gate");

    let v: serde_json::Value = ureq::post(&url)
        .send_json(serde_json::json!({ "password": "open-sesame" }))
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(v["granted"], true);
}

#[test]
fn malformed_gate_body_is_400() {
    let base = spawn_default();
    let result = ureq::post(&format!("{base}/api/gate")).send_string("not json");
    assert_eq!(status_of(result), 400);
}

#[test]
fn preview_mode_is_reported_to_the_client() {
    let mut config = quiet_config();
    config.gate.preview_mode = true;
    let base = spawn(config, EventLog::disabled());
    let v = get_json(&format!("{base}/api/session"));
    assert_eq!(v["preview_mode"], true);
    assert_eq!(v["storage_key"], "isAuthenticated");
}

// ---------------------------------------------------------------------------
// Content, pricing and usage
// ---------------------------------------------------------------------------

#[test]
fn every_listed_section_loads() {
    let base = spawn_default();
    let nav = get_json(&format!("{base}/api/sections"));
    let sections = nav["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 5);
    for item in sections {
        let slug = item["slug"].as_str().unwrap();
        let content = get_json(&format!("{base}/api/sections/{slug}"));
        assert_eq!(content["section"], slug);
        assert!(content["title"].is_string());
    }
}

#[test]
fn quote_over_http() {
    let base = spawn_default();
    let v = get_json(&format!("{base}/api/pricing/quote?commitment=50"));
    let monthly = v["quote"]["discounted_monthly_cost"].as_f64().unwrap();
    assert!((monthly - 28_333.33).abs() < 0.01);

    let result = ureq::get(&format!("{base}/api/pricing/quote?commitment=-3")).call();
    assert_eq!(status_of(result), 400);
}

#[test]
fn tiers_over_http() {
    let base = spawn_default();
    let v = get_json(&format!("{base}/api/pricing/tiers"));
    assert_eq!(v["tiers"].as_array().unwrap().len(), 5);
    assert_eq!(v["base_rate"], 0.008);
}

#[test]
fn usage_filters_over_http() {
    let base = spawn_default();
    let v = get_json(&format!(
        "{base}/api/usage?range=all&mode=dollars&months=Jan%202025%2CFeb%202025"
    ));
    assert_eq!(v["months"], serde_json::json!(["Jan 2025", "Feb 2025"]));
    assert_eq!(v["mode"], "dollars");

    let result = ureq::get(&format!("{base}/api/usage?range=forever")).call();
    assert_eq!(status_of(result), 400);
}

#[test]
fn health_reports_dataset_and_tiers() {
    let base = spawn_default();
    let v = get_json(&format!("{base}/api/health"));
    assert_eq!(v["status"], "ok");
    assert_eq!(v["months"], 11);
    assert_eq!(v["tiers"], 5);
    assert_eq!(v["latest_month"], "Feb 2025");
    assert!(v["event_log"].is_null());
}

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

#[test]
fn requests_are_recorded_without_the_password() {
    let dir = temp_dir("events");
    let path = dir.join("events.jsonl");
    let base = spawn(quiet_config(), EventLog::at(&path));

    ureq::post(&format!("{base}/api/gate"))
        .send_json(serde_json::json!({ "password": "hunter2" }))
        .unwrap();
    get_json(&format!("{base}/api/sections/usage-analysis"));
    get_json(&format!("{base}/api/pricing/quote?commitment=65"));

    let kinds: Vec<EventKind> = EventLog::at(&path)
        .read_all()
        .into_iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::GateAttempt { granted: false },
            EventKind::SectionView {
                section: "usage-analysis".to_string()
            },
            EventKind::Quote {
                commitment_millions: 65,
                tier_millions: 60
            },
        ]
    );

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("hunter2"));
    let _ = std::fs::remove_dir_all(dir);
}
