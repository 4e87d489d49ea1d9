//! Event logging subsystem for git-flow.
//!
//! Every state-changing lifecycle transition appends one event to an
//! append-only NDJSON log at `.git/.gitflow/events.ndjson`, giving the
//! operator an audit trail of what git-flow did to the repository. The log is
//! never read back by git-flow itself.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The transition performed (init, start, finish, ...)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `kind`: Optional supporting-branch kind
//! - `branch`: Optional full branch name
//! - `details`: Freeform object with action-specific details

use crate::error::{FlowError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the event log inside the state directory.
pub const EVENTS_FILE: &str = "events.ndjson";

/// Transitions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Repository initialized for git-flow
    Init,
    /// Supporting branch created
    Start,
    /// Supporting branch merged and cleaned up
    Finish,
    /// Supporting branch pushed to the remote
    Publish,
    /// Local branch created tracking a remote supporting branch
    Track,
    /// Finish paused on a merge conflict
    ConflictPause,
    /// Paused finish picked up again
    ConflictResume,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::Start => write!(f, "start"),
            EventAction::Finish => write!(f, "finish"),
            EventAction::Publish => write!(f, "publish"),
            EventAction::Track => write!(f, "track"),
            EventAction::ConflictPause => write!(f, "conflict_pause"),
            EventAction::ConflictResume => write!(f, "conflict_resume"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The transition that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Supporting-branch kind, when the event concerns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Full branch name, when the event concerns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action, stamped now.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            kind: None,
            branch: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the supporting-branch kind and full branch name.
    pub fn with_branch(mut self, kind: impl Into<String>, branch: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self.branch = Some(branch.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| FlowError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Path of the event log inside `state_dir`.
pub fn events_file_path(state_dir: &Path) -> PathBuf {
    state_dir.join(EVENTS_FILE)
}

/// Append an event as a single JSON line, creating the log if needed.
pub fn append_event(state_dir: &Path, event: &Event) -> Result<()> {
    let events_file = events_file_path(state_dir);
    let json_line = event.to_ndjson_line()?;

    if !state_dir.exists() {
        fs::create_dir_all(state_dir).map_err(|e| {
            FlowError::UserError(format!(
                "failed to create state directory '{}': {}",
                state_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            FlowError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        FlowError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}
