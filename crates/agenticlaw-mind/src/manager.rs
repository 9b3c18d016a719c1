//! Manager — per-agent Store registry, dream-cron payload builder, and the
//! dashboard aggregator.
//!
//! One `Store` per normalized agent id, lazily opened under
//! `<data_dir>/mind/<agent_id>.db`. Mirrors the registry pattern in
//! `agenticlaw-consciousness`'s `EgoManager`, which keeps one `Ego` per
//! agent behind a `DashMap` rather than a single shared instance.

use crate::config::MindConfig;
use crate::error::Result;
use crate::store::Store;
use crate::types::{normalize_agent_id, Learning};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, serde::Serialize)]
pub struct MindDashboard {
    pub agent_id: String,
    pub approved_learnings: Vec<Learning>,
    pub pending_learnings: Vec<Learning>,
    pub recent_dreams: Vec<crate::types::DreamRecord>,
    pub log_counts_by_category: BTreeMap<String, i64>,
    pub total_log_count: i64,
    pub rejected_titles: Vec<String>,
}

/// Registry of per-agent Stores, keyed by normalized agent id.
pub struct Manager {
    data_dir: PathBuf,
    stores: DashMap<String, Store>,
    config: MindConfig,
}

impl Manager {
    pub fn new(data_dir: impl Into<PathBuf>, config: MindConfig) -> Self {
        Self {
            data_dir: data_dir.into(),
            stores: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &MindConfig {
        &self.config
    }

    fn mind_dir(&self) -> PathBuf {
        self.data_dir.join("mind")
    }

    fn store_path(&self, agent_id: &str) -> PathBuf {
        self.mind_dir().join(format!("{}.db", agent_id))
    }

    pub fn has_mind_store(&self, agent_id: &str) -> bool {
        let normalized = normalize_agent_id(agent_id);
        self.stores.contains_key(&normalized) || self.store_path(&normalized).exists()
    }

    /// Fetch the agent's Store, opening and caching it on first use.
    /// Creates `<data_dir>/mind/` if it doesn't exist yet.
    pub fn get_mind_store(&self, agent_id: &str) -> Result<dashmap::mapref::one::Ref<'_, String, Store>> {
        let normalized = normalize_agent_id(agent_id);

        if !self.stores.contains_key(&normalized) {
            std::fs::create_dir_all(self.mind_dir())?;
            let path = self.store_path(&normalized);
            let store = Store::open(&path, &normalized, self.config.actions.clone())?;
            tracing::info!(agent_id = %normalized, path = %path.display(), "opened mind store");
            self.stores.insert(normalized.clone(), store);
        }

        Ok(self.stores.get(&normalized).expect("just inserted"))
    }

    pub fn close_all(&self) {
        let ids: Vec<String> = self.stores.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            if let Some((_, store)) = self.stores.remove(&id) {
                if let Err(e) = store.close() {
                    tracing::warn!(agent_id = %id, error = %e, "error closing mind store");
                }
            }
        }
    }

    /// Build the scheduler payload for an agent's recurring dream cycle.
    /// Cron defaults to 3am daily and is overridable via `OPENCLAW_DREAM_CRON`.
    pub fn dream_cron_payload(&self, agent_id: &str) -> serde_json::Value {
        let normalized = normalize_agent_id(agent_id);
        let cron = std::env::var("OPENCLAW_DREAM_CRON").unwrap_or_else(|_| "0 3 * * *".to_string());

        serde_json::json!({
            "id": format!("mind-dream-{}", normalized),
            "cron": cron,
            "session_target": "isolated",
            "wake_mode": "next-heartbeat",
            "timeout_secs": 120,
            "message": "[DREAM_PHASE] Analyze recent stress patterns, confessions, and action logs. \
                        Use mind_dream to retrieve the analysis prompt, then mind_save_learning for \
                        whatever new tactical learnings the evidence supports.",
        })
    }

    /// Snapshot everything the operator dashboard needs for one agent.
    pub fn dashboard(&self, agent_id: &str) -> Result<MindDashboard> {
        let normalized = normalize_agent_id(agent_id);
        let store_ref = self.get_mind_store(&normalized)?;

        let mut log_counts_by_category = BTreeMap::new();
        for category in crate::types::LogCategory::all() {
            let count = store_ref.get_logs(category, 0).len() as i64;
            log_counts_by_category.insert(category.as_str().to_string(), count);
        }

        Ok(MindDashboard {
            agent_id: normalized,
            approved_learnings: store_ref.get_approved_learnings(),
            pending_learnings: store_ref.get_pending_learnings(),
            recent_dreams: store_ref.get_recent_dreams(10),
            total_log_count: store_ref.get_log_count(0),
            rejected_titles: store_ref.get_rejected_titles(self.config.dream.rejected_titles_limit),
            log_counts_by_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_manager() -> (tempfile::TempDir, Manager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = Manager::new(dir.path(), MindConfig::default());
        (dir, manager)
    }

    #[test]
    fn get_mind_store_creates_directory_and_opens_lazily() {
        let (_dir, manager) = temp_manager();
        assert!(!manager.has_mind_store("agent-one"));
        let store = manager.get_mind_store("agent-one").unwrap();
        assert_eq!(store.agent_id(), "agent-one");
    }

    #[test]
    fn per_agent_isolation_through_manager() {
        let (_dir, manager) = temp_manager();
        {
            let store_a = manager.get_mind_store("Agent-A").unwrap();
            store_a.add_log(crate::types::LogCategory::Stress, &serde_json::json!({}), "s");
        }
        let store_a = manager.get_mind_store("agent-a").unwrap(); // normalized, same store
        assert_eq!(store_a.get_log_count(0), 1);

        let store_b = manager.get_mind_store("agent-b").unwrap();
        assert_eq!(store_b.get_log_count(0), 0);
    }

    #[test]
    fn dream_cron_payload_defaults_without_env_override() {
        let (_dir, manager) = temp_manager();
        std::env::remove_var("OPENCLAW_DREAM_CRON");
        let payload = manager.dream_cron_payload("agent-one");
        assert_eq!(payload["id"], "mind-dream-agent-one");
        assert_eq!(payload["cron"], "0 3 * * *");
        assert_eq!(payload["session_target"], "isolated");
        assert_eq!(payload["timeout_secs"], 120);
    }

    #[test]
    fn dashboard_aggregates_counts_and_learnings() {
        let (_dir, manager) = temp_manager();
        {
            let store = manager.get_mind_store("agent-one").unwrap();
            store.add_log(crate::types::LogCategory::Stress, &serde_json::json!({}), "s");
            let id = store.add_learning("T", "C", "R");
            store.approve_learning(id);
        }

        let dashboard = manager.dashboard("agent-one").unwrap();
        assert_eq!(dashboard.agent_id, "agent-one");
        assert_eq!(dashboard.total_log_count, 1);
        assert_eq!(dashboard.approved_learnings.len(), 1);
        assert_eq!(dashboard.log_counts_by_category["stress"], 1);
    }
}
