//! Soft access gate in front of the proposal.
//!
//! A single shared word keeps casual visitors on the password screen. It is
//! not access control: the word ships with the config and the API behind the
//! gate is open.

use serde::Serialize;

/// Browser storage key the dashboard uses for its session flag.
pub const STORAGE_KEY: &str = "isAuthenticated";

/// Shown inline when the word does not match.
pub const DENIED_MESSAGE: &str = "Incorrect password. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GateOutcome {
    Granted,
    Denied { message: String },
}

impl GateOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Granted => None,
            Self::Denied { message } => Some(message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SoftGate {
    secret: String,
}

impl SoftGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Exact, case-sensitive comparison. No trimming, no lockout.
    pub fn check(&self, attempt: &str) -> GateOutcome {
        if attempt == self.secret {
            GateOutcome::Granted
        } else {
            GateOutcome::Denied {
                message: DENIED_MESSAGE.to_string(),
            }
        }
    }
}

/// How the dashboard treats its stored session flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionPolicy {
    /// Keep the flag across reloads instead of clearing it on app load.
    pub preview_mode: bool,
    pub storage_key: &'static str,
}

impl SessionPolicy {
    pub fn new(preview_mode: bool) -> Self {
        Self {
            preview_mode,
            storage_key: STORAGE_KEY,
        }
    }
}
