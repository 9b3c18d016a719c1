//! Identity Builder — renders the per-agent prompt fragment injected
//! ahead of every turn.
//!
//! Section order is fixed: immutable principles first, tactical learnings
//! (selectively activated against the vocabulary of recent actions), a
//! protocol paragraph, an optional action-memory recap, then a cost
//! paragraph. A single-slot cache keyed by agent id avoids rebuilding the
//! fragment (and re-querying the Store) on every turn.

use crate::config::IdentityConfig;
use crate::principles::render_principles;
use crate::store::Store;
use crate::types::{now_ms, DAY_MS};
use std::collections::HashSet;
use std::sync::Mutex;

const PROTOCOL_PARAGRAPH: &str = "## Protocol\n\n\
Log stress when a correction or frustration signal appears. Confess \
uncertainty whenever confidence in the current approach drops below \
70%. Log ethical refusals immediately — refusing to cause harm is a \
success, not a failure. Log explicit user guidance as it is given. \
Write every log entry in the language the conversation is being held \
in.\n";

const COST_AWARENESS_PARAGRAPH: &str = "## Cost Awareness\n\n\
Tactical learnings decay over time and are pruned once they stop being \
useful; do not treat an absent learning as permission to repeat a \
mistake it once corrected.\n";

struct CacheSlot {
    agent_id: String,
    timestamp: i64,
    formatted: String,
}

/// Builds and caches the identity fragment for one agent.
pub struct IdentityBuilder {
    cache: Mutex<Option<CacheSlot>>,
}

impl Default for IdentityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityBuilder {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(None),
        }
    }

    /// Build (or return cached) identity fragment for `store`.
    /// `reactivation_boost` comes from the same `DecayConfig` the dream
    /// cycle uses. A cache hit (same agent, age under `cache_ttl_secs`) may
    /// return prompt decoration that's slightly stale relative to a
    /// concurrent approve/reject/activate/decay — that's acceptable here.
    pub fn build(&self, store: &Store, config: &IdentityConfig, reactivation_boost: f64) -> String {
        {
            let cache = self.cache.lock().unwrap();
            if let Some(slot) = cache.as_ref() {
                let age_secs = (now_ms() - slot.timestamp) / 1000;
                if slot.agent_id == store.agent_id() && age_secs < config.cache_ttl_secs as i64 {
                    return slot.formatted.clone();
                }
            }
        }

        let formatted = self.render(store, config, reactivation_boost);

        let mut cache = self.cache.lock().unwrap();
        *cache = Some(CacheSlot {
            agent_id: store.agent_id().to_string(),
            timestamp: now_ms(),
            formatted: formatted.clone(),
        });
        formatted
    }

    fn render(&self, store: &Store, config: &IdentityConfig, reactivation_boost: f64) -> String {
        self.selectively_activate(store, config, reactivation_boost);

        // Re-fetch post-activation so the rendered relevance order reflects
        // any boost just applied.
        let learnings = store.get_approved_learnings();

        let mut out = String::new();
        out.push_str("## Immutable Core Principles\n\n");
        out.push_str(&render_principles());
        out.push('\n');

        out.push_str("## Tactical Learnings\n\n");
        if learnings.is_empty() {
            out.push_str("*No approved learnings yet.*\n\n");
        } else {
            for learning in &learnings {
                out.push_str(&format!("- **{}**: {}\n", learning.title, learning.content));
            }
            out.push('\n');
        }

        out.push_str(PROTOCOL_PARAGRAPH);
        out.push('\n');

        let action_memory = store.format_recent_actions(None, config.action_memory_limit);
        if !action_memory.is_empty() {
            out.push_str("## Action Memory\n\n");
            out.push_str(&action_memory);
            out.push('\n');
        }

        out.push_str(COST_AWARENESS_PARAGRAPH);

        out
    }

    /// Gather tool-summary vocabulary (words longer than 3 characters) from
    /// the lookback window's actions, and boost every approved learning
    /// whose content shares one of those words. This is the reinforcement
    /// that counteracts decay for contextually-relevant learnings.
    fn selectively_activate(&self, store: &Store, config: &IdentityConfig, reactivation_boost: f64) {
        let since_ms = now_ms() - config.activation_lookback_days * DAY_MS;
        let recent_actions = store.get_actions_since(since_ms);
        if recent_actions.is_empty() {
            return;
        }

        let mut action_words = HashSet::new();
        for action in &recent_actions {
            action_words.extend(tokenize(&action.summary));
        }
        if action_words.is_empty() {
            return;
        }

        for learning in store.get_approved_learnings() {
            let learning_words = tokenize(&learning.content);
            if action_words.intersection(&learning_words).next().is_some() {
                store.activate_learning(learning.id, reactivation_boost);
            }
        }
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 3)
        .map(|w| w.to_string())
        .collect()
}
