//! Data model — LogEntry, ActionRecord, Learning, DreamRecord, RejectedLearning
//!
//! `payload` / `args_snapshot` are arbitrary JSON documents. Readers must
//! tolerate unknown fields — schema-validated access happens at the tool
//! boundary (see `tools.rs`), not here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A behavioral signal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Stress,
    Confession,
    Ethics,
    Guidance,
    SessionSummary,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stress => "stress",
            Self::Confession => "confession",
            Self::Ethics => "ethics",
            Self::Guidance => "guidance",
            Self::SessionSummary => "session_summary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stress" => Some(Self::Stress),
            "confession" => Some(Self::Confession),
            "ethics" => Some(Self::Ethics),
            "guidance" => Some(Self::Guidance),
            "session_summary" => Some(Self::SessionSummary),
            _ => None,
        }
    }

    pub fn all() -> [Self; 5] {
        [
            Self::Stress,
            Self::Confession,
            Self::Ethics,
            Self::Guidance,
            Self::SessionSummary,
        ]
    }

    /// Human title used in dream-prompt section headings.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Stress => "Stress Signals",
            Self::Confession => "Confessions of Uncertainty",
            Self::Ethics => "Ethical Refusals",
            Self::Guidance => "User Guidance",
            Self::SessionSummary => "Session Summaries",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub category: LogCategory,
    pub payload: Value,
    pub session_key: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: i64,
    pub tool_name: String,
    pub summary: String,
    pub args_snapshot: Value,
    pub session_key: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learning {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub rationale: String,
    pub relevance_score: f64,
    pub activation_count: i64,
    pub last_activated: i64,
    pub approved: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamRecord {
    pub id: i64,
    pub days_analyzed: i64,
    pub log_count: i64,
    pub proposals: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedLearning {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub rejected_at: i64,
}

/// Milliseconds in a day, for lookback-window arithmetic.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Millisecond timestamp, "now".
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Normalize an agent identifier: trimmed, lowercased, empty defaults to "main".
pub fn normalize_agent_id(raw: &str) -> String {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.is_empty() {
        "main".to_string()
    } else {
        trimmed
    }
}
