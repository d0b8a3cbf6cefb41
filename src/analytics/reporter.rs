//! Activity reporter: aggregates the event log for `pitchdeck activity`.
//!
//! Reads the JSONL event log and summarizes:
//! - **Gate**: attempts and success rate
//! - **Sections**: views per section, most viewed first
//! - **Quotes**: how often the calculator ran, most quoted commitment
//! - **Daily**: events per calendar day

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::analytics::events::{EventKind, ProposalEvent};
use crate::analytics::logger::{EventLog, parse_timestamp};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityReport {
    pub total_events: usize,
    pub gate: GateStats,
    pub section_views: Vec<SectionViewStat>,
    pub quotes: usize,
    pub most_quoted: Option<QuotedCommitment>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub daily: Vec<DailyActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GateStats {
    pub attempts: usize,
    pub granted: usize,
}

impl GateStats {
    /// Percentage of attempts granted, 0.0 with no attempts.
    pub fn success_pct(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            (self.granted as f64 / self.attempts as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionViewStat {
    pub section: String,
    pub views: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotedCommitment {
    pub commitment_millions: u32,
    pub count: usize,
}

/// A single day of activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActivity {
    pub date: String,
    pub events: usize,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Summarize the log, optionally limited to the last `days` days.
pub fn compute_report(log: &EventLog, days: Option<u32>) -> ActivityReport {
    build_report(&log.read_since_days(days))
}

pub fn build_report(events: &[ProposalEvent]) -> ActivityReport {
    if events.is_empty() {
        return ActivityReport::default();
    }

    let mut gate = GateStats::default();
    let mut views: HashMap<&str, usize> = HashMap::new();
    let mut quoted: HashMap<u32, usize> = HashMap::new();
    let mut quotes = 0;

    for event in events {
        match &event.kind {
            EventKind::GateAttempt { granted } => {
                gate.attempts += 1;
                if *granted {
                    gate.granted += 1;
                }
            }
            EventKind::SectionView { section } => {
                *views.entry(section.as_str()).or_default() += 1;
            }
            EventKind::Quote {
                commitment_millions,
                ..
            } => {
                quotes += 1;
                *quoted.entry(*commitment_millions).or_default() += 1;
            }
        }
    }

    let mut section_views: Vec<SectionViewStat> = views
        .into_iter()
        .map(|(section, views)| SectionViewStat {
            section: section.to_string(),
            views,
        })
        .collect();
    // Most viewed first, ties by name for stable output.
    section_views.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.section.cmp(&b.section)));

    // Ties go to the smaller commitment.
    let most_quoted = quoted
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(commitment_millions, count)| QuotedCommitment {
            commitment_millions,
            count,
        });

    let mut stamps: Vec<_> = events
        .iter()
        .filter_map(|e| parse_timestamp(&e.timestamp))
        .collect();
    stamps.sort();

    let mut daily: BTreeMap<String, usize> = BTreeMap::new();
    for stamp in &stamps {
        *daily.entry(stamp.format("%Y-%m-%d").to_string()).or_default() += 1;
    }

    ActivityReport {
        total_events: events.len(),
        gate,
        section_views,
        quotes,
        most_quoted,
        first_seen: stamps.first().map(|t| t.to_rfc3339()),
        last_seen: stamps.last().map(|t| t.to_rfc3339()),
        daily: daily
            .into_iter()
            .map(|(date, events)| DailyActivity { date, events })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp: &str, kind: EventKind) -> ProposalEvent {
        ProposalEvent {
            timestamp: timestamp.to_string(),
            kind,
        }
    }

    fn sample_events() -> Vec<ProposalEvent> {
        vec![
            event("2025-02-27T10:00:00+00:00", EventKind::GateAttempt { granted: false }),
            event("2025-02-27T10:01:00+00:00", EventKind::GateAttempt { granted: true }),
            event(
                "2025-02-27T10:02:00+00:00",
                EventKind::SectionView {
                    section: "executive-summary".to_string(),
                },
            ),
            event(
                "2025-02-28T09:00:00+00:00",
                EventKind::SectionView {
                    section: "annual-plan-benefits".to_string(),
                },
            ),
            event(
                "2025-02-28T09:01:00+00:00",
                EventKind::SectionView {
                    section: "annual-plan-benefits".to_string(),
                },
            ),
            event(
                "2025-02-28T09:02:00+00:00",
                EventKind::Quote {
                    commitment_millions: 60,
                    tier_millions: 60,
                },
            ),
            event(
                "2025-02-28T09:03:00+00:00",
                EventKind::Quote {
                    commitment_millions: 75,
                    tier_millions: 75,
                },
            ),
            event(
                "2025-02-28T09:04:00+00:00",
                EventKind::Quote {
                    commitment_millions: 60,
                    tier_millions: 60,
                },
            ),
        ]
    }

    #[test]
    fn gate_success_rate() {
        let report = build_report(&sample_events());
        assert_eq!(report.gate.attempts, 2);
        assert_eq!(report.gate.granted, 1);
        assert!((report.gate.success_pct() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn section_views_sorted_by_count() {
        let report = build_report(&sample_events());
        assert_eq!(report.section_views.len(), 2);
        assert_eq!(report.section_views[0].section, "annual-plan-benefits");
        assert_eq!(report.section_views[0].views, 2);
    }

    #[test]
    fn most_quoted_commitment() {
        let report = build_report(&sample_events());
        assert_eq!(report.quotes, 3);
        assert_eq!(
            report.most_quoted,
            Some(QuotedCommitment {
                commitment_millions: 60,
                count: 2
            })
        );
    }

    #[test]
    fn first_and_last_seen_and_daily() {
        let report = build_report(&sample_events());
        assert_eq!(report.total_events, 8);
        assert_eq!(report.first_seen.as_deref(), Some("2025-02-27T10:00:00+00:00"));
        assert_eq!(report.last_seen.as_deref(), Some("2025-02-28T09:04:00+00:00"));
        let days: Vec<(&str, usize)> = report
            .daily
            .iter()
            .map(|d| (d.date.as_str(), d.events))
            .collect();
        assert_eq!(days, vec![("2025-02-27", 3), ("2025-02-28", 5)]);
    }

    #[test]
    fn empty_log_gives_empty_report() {
        let report = build_report(&[]);
        assert_eq!(report, ActivityReport::default());
        assert_eq!(report.gate.success_pct(), 0.0);
    }
}
