use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to start a wipe session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartWipeRequest {
    pub session_id: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub wipe_all: bool,
}

impl StartWipeRequest {
    pub fn files(session_id: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            session_id: session_id.into(),
            files,
            wipe_all: false,
        }
    }

    pub fn wipe_all(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            files: Vec::new(),
            wipe_all: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartWipeResponse {
    pub session_id: String,
    pub started: bool,
}

/// Lifecycle of a session. `Complete` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Created,
    Running,
    Complete,
}

/// What a session destroys. Fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WipeMode {
    /// Placeholder mode: passes advance on a schedule, nothing is touched
    All,
    /// Files processed in order, stopping at the first failure
    Files(Vec<String>),
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WipeStatus {
    pub session_id: String,
    /// Highest pass reached so far, 0..=3
    pub pass_number: u8,
    pub complete: bool,
    pub success: bool,
    /// Last file picked up, empty before the first one
    pub current_file: String,
    pub state: SessionState,
    /// Pass of the file currently being processed, resets per file
    pub file_pass: u8,
    pub files_wiped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl WipeStatus {
    pub(crate) fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            pass_number: 0,
            complete: false,
            success: false,
            current_file: String::new(),
            state: SessionState::Created,
            file_pass: 0,
            files_wiped: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}
