//! Per-agent SQLite persistence.
//!
//! Every storage fault below this boundary is swallowed and logged — callers
//! get a sentinel (`-1`, `0`, or an empty `Vec`) rather than a `Result`. This
//! mirrors the Store's role as the crate's bottom layer: dreaming, identity
//! rendering, and the tool surface all need to keep working even if a single
//! write fails, so nothing above this file ever sees a `rusqlite::Error`.

use crate::actions;
use crate::config::ActionsConfig;
use crate::error::{Error, Result};
use crate::types::{now_ms, ActionRecord, DreamRecord, Learning, LogCategory, LogEntry};
use chrono::TimeZone;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

/// Render a millisecond timestamp as ISO-8601, truncated to minute precision.
fn format_minute(ms: i64) -> String {
    chrono::Utc
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS mind_log (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    category    TEXT NOT NULL,
    payload     TEXT NOT NULL,
    session_key TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_mind_log_category ON mind_log(category);
CREATE INDEX IF NOT EXISTS idx_mind_log_created_at ON mind_log(created_at);
CREATE INDEX IF NOT EXISTS idx_mind_log_session_key ON mind_log(session_key);

CREATE TABLE IF NOT EXISTS mind_actions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    tool_name     TEXT NOT NULL,
    summary       TEXT NOT NULL,
    args_snapshot TEXT NOT NULL,
    session_key   TEXT NOT NULL,
    created_at    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_mind_actions_session_key ON mind_actions(session_key);
CREATE INDEX IF NOT EXISTS idx_mind_actions_created_at ON mind_actions(created_at);

CREATE TABLE IF NOT EXISTS mind_learnings (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    title            TEXT NOT NULL,
    content          TEXT NOT NULL,
    rationale        TEXT NOT NULL,
    relevance_score  REAL NOT NULL DEFAULT 1.0,
    activation_count INTEGER NOT NULL DEFAULT 0,
    last_activated   INTEGER NOT NULL DEFAULT 0,
    approved         INTEGER NOT NULL DEFAULT 0,
    created_at       INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_mind_learnings_approved ON mind_learnings(approved);

CREATE TABLE IF NOT EXISTS mind_dreams (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    days_analyzed INTEGER NOT NULL,
    log_count     INTEGER NOT NULL,
    proposals     TEXT NOT NULL,
    created_at    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_mind_dreams_created_at ON mind_dreams(created_at);

CREATE TABLE IF NOT EXISTS mind_rejected_learnings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    rejected_at INTEGER NOT NULL
);
";

/// One Store per agent, one SQLite file per Store.
pub struct Store {
    conn: Connection,
    agent_id: String,
    actions_config: ActionsConfig,
}

impl Store {
    pub fn open(path: &Path, agent_id: &str, actions_config: ActionsConfig) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            agent_id: agent_id.to_string(),
            actions_config,
        })
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    // ---- log ----------------------------------------------------------

    pub fn add_log(&self, category: LogCategory, payload: &Value, session_key: &str) -> i64 {
        let payload_text = payload.to_string();
        let result = self.conn.execute(
            "INSERT INTO mind_log (category, payload, session_key, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![category.as_str(), payload_text, session_key, now_ms()],
        );
        match result {
            Ok(_) => self.conn.last_insert_rowid(),
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "add_log failed");
                -1
            }
        }
    }

    pub fn get_logs(&self, category: LogCategory, since_ms: i64) -> Vec<LogEntry> {
        let query = "SELECT id, category, payload, session_key, created_at FROM mind_log \
                     WHERE category = ?1 AND created_at >= ?2 ORDER BY created_at DESC";
        self.query_logs(query, params![category.as_str(), since_ms])
    }

    pub fn get_all_logs(&self, since_ms: i64) -> Vec<LogEntry> {
        let query = "SELECT id, category, payload, session_key, created_at FROM mind_log \
                     WHERE created_at >= ?1 ORDER BY created_at DESC";
        self.query_logs(query, params![since_ms])
    }

    fn query_logs(&self, query: &str, params: &[&dyn rusqlite::ToSql]) -> Vec<LogEntry> {
        let result = (|| -> rusqlite::Result<Vec<LogEntry>> {
            let mut stmt = self.conn.prepare(query)?;
            let rows = stmt.query_map(params, |row| {
                let category_str: String = row.get(1)?;
                let payload_str: String = row.get(2)?;
                Ok(LogEntry {
                    id: row.get(0)?,
                    category: LogCategory::parse(&category_str).unwrap_or(LogCategory::Guidance),
                    payload: serde_json::from_str(&payload_str).unwrap_or(Value::Null),
                    session_key: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })();

        match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "get_logs failed");
                Vec::new()
            }
        }
    }

    pub fn get_log_count(&self, since_ms: i64) -> i64 {
        let result: rusqlite::Result<i64> = self.conn.query_row(
            "SELECT COUNT(*) FROM mind_log WHERE created_at >= ?1",
            params![since_ms],
            |row| row.get(0),
        );
        result.unwrap_or_else(|e| {
            tracing::warn!(agent_id = %self.agent_id, error = %e, "get_log_count failed");
            0
        })
    }

    // ---- actions --------------------------------------------------------

    pub fn log_action(&self, tool_name: &str, args: &Value, session_key: &str) -> i64 {
        let Some(summary) = actions::summarize(tool_name, args, self.actions_config.summary_max_chars) else {
            return -1;
        };
        let args_text = args.to_string();
        let result = self.conn.execute(
            "INSERT INTO mind_actions (tool_name, summary, args_snapshot, session_key, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![tool_name, summary, args_text, session_key, now_ms()],
        );
        match result {
            Ok(_) => self.conn.last_insert_rowid(),
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "log_action failed");
                -1
            }
        }
    }

    fn query_actions(&self, query: &str, params: &[&dyn rusqlite::ToSql]) -> Vec<ActionRecord> {
        let result = (|| -> rusqlite::Result<Vec<ActionRecord>> {
            let mut stmt = self.conn.prepare(query)?;
            let rows = stmt.query_map(params, |row| {
                let args_str: String = row.get(3)?;
                Ok(ActionRecord {
                    id: row.get(0)?,
                    tool_name: row.get(1)?,
                    summary: row.get(2)?,
                    args_snapshot: serde_json::from_str(&args_str).unwrap_or(Value::Null),
                    session_key: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })();

        match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "query_actions failed");
                Vec::new()
            }
        }
    }

    /// Actions since `since_ms`, optionally restricted to one session, most
    /// recent first, capped at `ActionsConfig::recent_actions_cap`.
    pub fn get_recent_actions(&self, since_ms: i64, session_key: Option<&str>) -> Vec<ActionRecord> {
        let cap = self.actions_config.recent_actions_cap as i64;
        match session_key {
            Some(key) => {
                let query = "SELECT id, tool_name, summary, args_snapshot, session_key, created_at \
                             FROM mind_actions WHERE created_at >= ?1 AND session_key = ?2 \
                             ORDER BY created_at DESC LIMIT ?3";
                self.query_actions(query, params![since_ms, key, cap])
            }
            None => {
                let query = "SELECT id, tool_name, summary, args_snapshot, session_key, created_at \
                             FROM mind_actions WHERE created_at >= ?1 \
                             ORDER BY created_at DESC LIMIT ?2";
                self.query_actions(query, params![since_ms, cap])
            }
        }
    }

    /// Actions recorded since `since_ms`, in chronological order. Used by
    /// the Identity Builder's selective-activation lookback window.
    pub fn get_actions_since(&self, since_ms: i64) -> Vec<ActionRecord> {
        let query = "SELECT id, tool_name, summary, args_snapshot, session_key, created_at \
                     FROM mind_actions WHERE created_at >= ?1 ORDER BY created_at ASC";
        self.query_actions(query, params![since_ms])
    }

    /// Render the most recent actions as a bulleted list with minute-precision
    /// ISO-8601 timestamps, for the identity prompt's Action Memory section.
    pub fn format_recent_actions(&self, session_key: Option<&str>, limit: usize) -> String {
        let mut actions = self.get_recent_actions(0, session_key);
        actions.truncate(limit);
        if actions.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for a in &actions {
            out.push_str(&format!("- [{}] {}\n", format_minute(a.created_at), a.summary));
        }
        out
    }

    /// Render the dream prompt's actions section: tool usage counted and
    /// sorted descending, followed by the most recent `recent_limit` actions.
    pub fn format_actions_for_dream(&self, since_ms: i64, recent_limit: usize) -> String {
        let actions = self.get_recent_actions(since_ms, None);

        let mut out = String::new();
        out.push_str("## Tool Usage\n\n");
        if actions.is_empty() {
            out.push_str("*No recent actions recorded.*\n\n");
        } else {
            let mut counts: Vec<(String, usize)> = Vec::new();
            for a in &actions {
                match counts.iter_mut().find(|(name, _)| name == &a.tool_name) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((a.tool_name.clone(), 1)),
                }
            }
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            for (name, count) in &counts {
                out.push_str(&format!("- {}: {}\n", name, count));
            }
            out.push('\n');
        }

        out.push_str("## Recent Actions\n\n");
        if actions.is_empty() {
            out.push_str("*No recent actions recorded.*\n");
        } else {
            for a in actions.iter().take(recent_limit) {
                out.push_str(&format!("- [{}] {}\n", a.tool_name, a.summary));
            }
        }
        out
    }

    // ---- learnings ------------------------------------------------------

    pub fn add_learning(&self, title: &str, content: &str, rationale: &str) -> i64 {
        let result = self.conn.execute(
            "INSERT INTO mind_learnings \
             (title, content, rationale, relevance_score, activation_count, last_activated, approved, created_at) \
             VALUES (?1, ?2, ?3, 1.0, 0, 0, 0, ?4)",
            params![title, content, rationale, now_ms()],
        );
        match result {
            Ok(_) => self.conn.last_insert_rowid(),
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "add_learning failed");
                -1
            }
        }
    }

    pub fn approve_learning(&self, id: i64) -> bool {
        let result = self
            .conn
            .execute("UPDATE mind_learnings SET approved = 1 WHERE id = ?1", params![id]);
        match result {
            Ok(n) => n > 0,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "approve_learning failed");
                false
            }
        }
    }

    /// Reject a learning, pending or approved: delete its row and tombstone
    /// the title so it cannot be re-proposed in a later dream.
    pub fn reject_learning(&self, id: i64) -> bool {
        let learning = self.conn.query_row(
            "SELECT title, content FROM mind_learnings WHERE id = ?1",
            params![id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );

        let (title, content) = match learning {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "reject_learning: no such learning");
                return false;
            }
        };

        let deleted = self
            .conn
            .execute("DELETE FROM mind_learnings WHERE id = ?1", params![id]);
        if !matches!(deleted, Ok(n) if n > 0) {
            return false;
        }

        let tombstoned = self.conn.execute(
            "INSERT INTO mind_rejected_learnings (title, content, rejected_at) VALUES (?1, ?2, ?3)",
            params![title, content, now_ms()],
        );
        if let Err(e) = tombstoned {
            tracing::warn!(agent_id = %self.agent_id, error = %e, "reject_learning: tombstone insert failed");
        }
        true
    }

    pub fn get_approved_learnings(&self) -> Vec<Learning> {
        self.query_learnings("SELECT id, title, content, rationale, relevance_score, activation_count, \
             last_activated, approved, created_at FROM mind_learnings WHERE approved = 1 \
             ORDER BY relevance_score DESC", params![])
    }

    pub fn get_pending_learnings(&self) -> Vec<Learning> {
        self.query_learnings("SELECT id, title, content, rationale, relevance_score, activation_count, \
             last_activated, approved, created_at FROM mind_learnings WHERE approved = 0 \
             ORDER BY created_at ASC", params![])
    }

    fn query_learnings(&self, query: &str, params: &[&dyn rusqlite::ToSql]) -> Vec<Learning> {
        let result = (|| -> rusqlite::Result<Vec<Learning>> {
            let mut stmt = self.conn.prepare(query)?;
            let rows = stmt.query_map(params, |row| {
                Ok(Learning {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    content: row.get(2)?,
                    rationale: row.get(3)?,
                    relevance_score: row.get(4)?,
                    activation_count: row.get(5)?,
                    last_activated: row.get(6)?,
                    approved: row.get::<_, i64>(7)? != 0,
                    created_at: row.get(8)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })();

        match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "query_learnings failed");
                Vec::new()
            }
        }
    }

    /// Selective activation: boost relevance and bump the activation count
    /// and timestamp. Relevance is capped at 1.0.
    pub fn activate_learning(&self, id: i64, boost: f64) -> bool {
        let result = self.conn.execute(
            "UPDATE mind_learnings SET \
             relevance_score = MIN(1.0, relevance_score + ?1), \
             activation_count = activation_count + 1, \
             last_activated = ?2 \
             WHERE id = ?3 AND approved = 1",
            params![boost, now_ms(), id],
        );
        match result {
            Ok(n) => n > 0,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "activate_learning failed");
                false
            }
        }
    }

    /// Multiplicative decay across every approved learning, then prune
    /// anything that fell below the floor. Returns the number pruned.
    pub fn apply_decay(&self, decay_factor: f64, min_relevance: f64) -> i64 {
        let decayed = self.conn.execute(
            "UPDATE mind_learnings SET relevance_score = relevance_score * ?1 WHERE approved = 1",
            params![decay_factor],
        );
        if let Err(e) = decayed {
            tracing::warn!(agent_id = %self.agent_id, error = %e, "apply_decay: decay update failed");
            return 0;
        }

        let pruned = self.conn.execute(
            "DELETE FROM mind_learnings WHERE approved = 1 AND relevance_score < ?1",
            params![min_relevance],
        );
        match pruned {
            Ok(n) => n as i64,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "apply_decay: prune failed");
                0
            }
        }
    }

    // ---- dreams & tombstones ---------------------------------------------

    pub fn record_dream(&self, days_analyzed: i64, log_count: i64, proposals: &str) -> i64 {
        let result = self.conn.execute(
            "INSERT INTO mind_dreams (days_analyzed, log_count, proposals, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![days_analyzed, log_count, proposals, now_ms()],
        );
        match result {
            Ok(_) => self.conn.last_insert_rowid(),
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "record_dream failed");
                -1
            }
        }
    }

    pub fn get_recent_dreams(&self, limit: usize) -> Vec<DreamRecord> {
        let query = "SELECT id, days_analyzed, log_count, proposals, created_at \
                     FROM mind_dreams ORDER BY created_at DESC LIMIT ?1";
        let result = (|| -> rusqlite::Result<Vec<DreamRecord>> {
            let mut stmt = self.conn.prepare(query)?;
            let rows = stmt.query_map(params![limit as i64], |row| {
                Ok(DreamRecord {
                    id: row.get(0)?,
                    days_analyzed: row.get(1)?,
                    log_count: row.get(2)?,
                    proposals: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })();

        match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "get_recent_dreams failed");
                Vec::new()
            }
        }
    }

    pub fn get_rejected_titles(&self, limit: usize) -> Vec<String> {
        let query = "SELECT title FROM mind_rejected_learnings ORDER BY rejected_at DESC LIMIT ?1";
        let result = (|| -> rusqlite::Result<Vec<String>> {
            let mut stmt = self.conn.prepare(query)?;
            let rows = stmt.query_map(params![limit as i64], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })();

        match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "get_rejected_titles failed");
                Vec::new()
            }
        }
    }

    /// Fetch a single pending learning by id, used by the tool surface to
    /// echo back a title/content on approve/reject.
    pub fn get_learning(&self, id: i64) -> Option<Learning> {
        self.conn
            .query_row(
                "SELECT id, title, content, rationale, relevance_score, activation_count, \
                 last_activated, approved, created_at FROM mind_learnings WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Learning {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        content: row.get(2)?,
                        rationale: row.get(3)?,
                        relevance_score: row.get(4)?,
                        activation_count: row.get(5)?,
                        last_activated: row.get(6)?,
                        approved: row.get::<_, i64>(7)? != 0,
                        created_at: row.get(8)?,
                    })
                },
            )
            .optional()
            .unwrap_or_else(|e| {
                tracing::warn!(agent_id = %self.agent_id, error = %e, "get_learning failed");
                None
            })
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| Error::from(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActionsConfig;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mind.sqlite3");
        let store = Store::open(&path, "test-agent", ActionsConfig::default()).unwrap();
        (dir, store)
    }

    #[test]
    fn add_and_get_logs_roundtrip() {
        let (_dir, store) = temp_store();
        let id = store.add_log(LogCategory::Stress, &json!({"utterance": "no that's wrong"}), "sess-1");
        assert!(id > 0);

        let logs = store.get_logs(LogCategory::Stress, 0);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].session_key, "sess-1");
    }

    #[test]
    fn get_logs_is_ordered_newest_first() {
        let (_dir, store) = temp_store();
        store.conn.execute(
            "INSERT INTO mind_log (category, payload, session_key, created_at) VALUES ('stress', '{}', 's', 100)",
            [],
        ).unwrap();
        store.conn.execute(
            "INSERT INTO mind_log (category, payload, session_key, created_at) VALUES ('stress', '{}', 's', 200)",
            [],
        ).unwrap();
        let logs = store.get_logs(LogCategory::Stress, 0);
        assert_eq!(logs[0].created_at, 200);
        assert_eq!(logs[1].created_at, 100);
    }

    #[test]
    fn get_all_logs_spans_categories() {
        let (_dir, store) = temp_store();
        store.add_log(LogCategory::Stress, &json!({}), "s1");
        store.add_log(LogCategory::Confession, &json!({}), "s1");
        assert_eq!(store.get_all_logs(0).len(), 2);
        assert_eq!(store.get_log_count(0), 2);
    }

    #[test]
    fn log_action_skips_trivial_tools() {
        let (_dir, store) = temp_store();
        let id = store.log_action("mind_dream", &json!({}), "s1");
        assert_eq!(id, -1);
        assert_eq!(store.get_recent_actions(0, None).len(), 0);
    }

    #[test]
    fn log_action_records_non_trivial_tools() {
        let (_dir, store) = temp_store();
        let id = store.log_action("read", &json!({"path": "/a.txt"}), "s1");
        assert!(id > 0);
        let actions = store.get_recent_actions(0, None);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].summary, "Read file: /a.txt");
    }

    #[test]
    fn get_recent_actions_filters_by_session_key() {
        let (_dir, store) = temp_store();
        store.log_action("read", &json!({"path": "/a.txt"}), "s1");
        store.log_action("read", &json!({"path": "/b.txt"}), "s2");
        assert_eq!(store.get_recent_actions(0, Some("s1")).len(), 1);
        assert_eq!(store.get_recent_actions(0, None).len(), 2);
    }

    #[test]
    fn learning_lifecycle_add_approve_activate_decay() {
        let (_dir, store) = temp_store();
        let id = store.add_learning("Title", "Content", "Rationale");
        assert!(id > 0);
        assert_eq!(store.get_pending_learnings().len(), 1);

        assert!(store.approve_learning(id));
        assert_eq!(store.get_approved_learnings().len(), 1);
        assert_eq!(store.get_approved_learnings()[0].relevance_score, 1.0);

        // decay 5 times with no activation
        for _ in 0..5 {
            store.apply_decay(0.95, 0.1);
        }
        let relevance = store.get_approved_learnings()[0].relevance_score;
        assert!((relevance - 0.95_f64.powi(5)).abs() < 1e-9);
    }

    #[test]
    fn decay_prunes_below_floor() {
        let (_dir, store) = temp_store();
        let id = store.add_learning("Title", "Content", "Rationale");
        store.approve_learning(id);
        // one huge decay step drives relevance under the floor
        let pruned = store.apply_decay(0.01, 0.1);
        assert_eq!(pruned, 1);
        assert_eq!(store.get_approved_learnings().len(), 0);
    }

    #[test]
    fn activation_boost_is_capped_at_one() {
        let (_dir, store) = temp_store();
        let id = store.add_learning("Title", "Content", "Rationale");
        store.approve_learning(id);
        assert!(store.activate_learning(id, 0.5));
        assert!(store.activate_learning(id, 0.9));
        let relevance = store.get_approved_learnings()[0].relevance_score;
        assert_eq!(relevance, 1.0);
    }

    #[test]
    fn reject_learning_tombstones_title_and_removes_pending_row() {
        let (_dir, store) = temp_store();
        let id = store.add_learning("Bad Idea", "Content", "Rationale");
        assert!(store.reject_learning(id));
        assert_eq!(store.get_pending_learnings().len(), 0);
        assert_eq!(store.get_rejected_titles(10), vec!["Bad Idea".to_string()]);
    }

    #[test]
    fn reject_learning_is_not_reapproved_after_tombstone() {
        let (_dir, store) = temp_store();
        let id = store.add_learning("Bad Idea", "Content", "Rationale");
        store.reject_learning(id);
        // approving a now-deleted id is a no-op, not a panic
        assert!(!store.approve_learning(id));
    }

    #[test]
    fn reject_learning_also_tombstones_an_already_approved_learning() {
        let (_dir, store) = temp_store();
        let id = store.add_learning("Bad Idea", "Content", "Rationale");
        store.approve_learning(id);
        assert!(store.reject_learning(id));
        assert_eq!(store.get_approved_learnings().len(), 0);
        assert_eq!(store.get_rejected_titles(10), vec!["Bad Idea".to_string()]);
    }

    #[test]
    fn dream_record_roundtrips() {
        let (_dir, store) = temp_store();
        let id = store.record_dream(7, 42, "## Proposals\n");
        assert!(id > 0);
        let dreams = store.get_recent_dreams(5);
        assert_eq!(dreams.len(), 1);
        assert_eq!(dreams[0].log_count, 42);
    }

    #[test]
    fn format_recent_actions_empty_is_empty_string() {
        let (_dir, store) = temp_store();
        assert_eq!(store.format_recent_actions(None, 10), "");
    }

    #[test]
    fn format_recent_actions_includes_minute_precision_timestamp() {
        let (_dir, store) = temp_store();
        store.log_action("read", &json!({"path": "/a.txt"}), "s1");
        let formatted = store.format_recent_actions(None, 10);
        assert!(formatted.contains("Read file: /a.txt"));
        // e.g. "- [2026-07-29T03:15] Read file: /a.txt"
        let ts = formatted.trim_start_matches("- [").split(']').next().unwrap();
        assert_eq!(ts.len(), "YYYY-MM-DDTHH:MM".len());
    }

    #[test]
    fn format_recent_actions_respects_session_key_filter() {
        let (_dir, store) = temp_store();
        store.log_action("read", &json!({"path": "/a.txt"}), "s1");
        store.log_action("read", &json!({"path": "/b.txt"}), "s2");
        let formatted = store.format_recent_actions(Some("s1"), 10);
        assert!(formatted.contains("/a.txt"));
        assert!(!formatted.contains("/b.txt"));
    }

    #[test]
    fn format_actions_for_dream_empty_has_placeholders() {
        let (_dir, store) = temp_store();
        let out = store.format_actions_for_dream(0, 30);
        assert!(out.contains("## Tool Usage"));
        assert!(out.contains("## Recent Actions"));
        assert!(out.contains("*No recent actions recorded.*"));
    }

    #[test]
    fn format_actions_for_dream_counts_tool_usage_descending() {
        let (_dir, store) = temp_store();
        store.log_action("read", &json!({"path": "/a.txt"}), "s1");
        store.log_action("read", &json!({"path": "/b.txt"}), "s1");
        store.log_action("bash", &json!({"command": "ls"}), "s1");
        let out = store.format_actions_for_dream(0, 30);
        let usage_section = out.split("## Recent Actions").next().unwrap();
        let read_pos = usage_section.find("read: 2").unwrap();
        let bash_pos = usage_section.find("bash: 1").unwrap();
        assert!(read_pos < bash_pos);
    }

    #[test]
    fn get_actions_since_filters_by_timestamp() {
        let (_dir, store) = temp_store();
        store.log_action("read", &json!({"path": "/a.txt"}), "s1");
        let future_cutoff = now_ms() + 60_000;
        assert_eq!(store.get_actions_since(0).len(), 1);
        assert_eq!(store.get_actions_since(future_cutoff).len(), 0);
    }

    #[test]
    fn agent_isolation_uses_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store_a = Store::open(&dir.path().join("a.sqlite3"), "agent-a", ActionsConfig::default()).unwrap();
        let store_b = Store::open(&dir.path().join("b.sqlite3"), "agent-b", ActionsConfig::default()).unwrap();
        store_a.add_log(LogCategory::Stress, &json!({}), "s");
        assert_eq!(store_a.get_log_count(0), 1);
        assert_eq!(store_b.get_log_count(0), 0);
    }
}
