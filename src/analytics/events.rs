//! Proposal activity events.
//!
//! One JSON object per line in `~/.pitchdeck/events.jsonl`. The entered
//! password never appears in an event; a gate attempt only records whether
//! it was granted.

use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalEvent {
    /// RFC 3339, UTC.
    pub timestamp: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    GateAttempt {
        granted: bool,
    },
    SectionView {
        section: String,
    },
    Quote {
        commitment_millions: u32,
        tier_millions: u32,
    },
}

impl EventKind {
    /// Stable name, as written in the `event` field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GateAttempt { .. } => "gate_attempt",
            Self::SectionView { .. } => "section_view",
            Self::Quote { .. } => "quote",
        }
    }
}

impl ProposalEvent {
    /// Stamp `kind` with the current time.
    pub fn now(kind: EventKind) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            kind,
        }
    }
}
