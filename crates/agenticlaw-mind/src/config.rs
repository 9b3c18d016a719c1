//! Mind Engine configuration
//!
//! All tunable parameters in one place, loaded from TOML at startup and
//! falling back to the constants fixed by the design when no config file
//! exists. Mirrors `agenticlaw-consciousness::config::ConsciousnessConfig`.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MindConfig {
    pub decay: DecayConfig,
    pub stress: StressConfig,
    pub dream: DreamConfig,
    pub actions: ActionsConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Multiplicative shrinkage applied to every approved learning's
    /// relevance at each dream cycle.
    pub decay_factor: f64,
    /// Approved learnings below this relevance are pruned at decay time.
    pub min_relevance: f64,
    /// Additive boost applied on activation, capped at 1.0.
    pub reactivation_boost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Cosine-similarity threshold above which the semantic pass reports
    /// a stressed utterance.
    pub semantic_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DreamConfig {
    /// Default lookback window, in days, when a dream call omits it.
    pub default_days: i64,
    /// Clamp bounds for days_to_analyze.
    pub min_days: i64,
    pub max_days: i64,
    /// Max chars of the composed dream prompt after sanitization.
    pub max_prompt_chars: usize,
    /// How many rejected titles to surface as the "do not re-propose" appendix.
    pub rejected_titles_limit: usize,
    /// How many recent actions to include in the dream's "Recent Actions" sub-section.
    pub recent_actions_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Cap on rows returned by get_recent_actions.
    pub recent_actions_cap: usize,
    /// Max length of a generated action summary.
    pub summary_max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Prompt-fragment cache lifetime, in seconds.
    pub cache_ttl_secs: u64,
    /// format_recent_actions limit used when building the Action Memory section.
    pub action_memory_limit: usize,
    /// Lookback window, in days, for selective-activation vocabulary gathering.
    pub activation_lookback_days: i64,
}

impl Default for MindConfig {
    fn default() -> Self {
        Self {
            decay: DecayConfig::default(),
            stress: StressConfig::default(),
            dream: DreamConfig::default(),
            actions: ActionsConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            decay_factor: 0.95,
            min_relevance: 0.1,
            reactivation_boost: 0.15,
        }
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            semantic_threshold: 0.75,
        }
    }
}

impl Default for DreamConfig {
    fn default() -> Self {
        Self {
            default_days: 7,
            min_days: 1,
            max_days: 30,
            max_prompt_chars: 30_000,
            rejected_titles_limit: 100,
            recent_actions_limit: 30,
        }
    }
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            recent_actions_cap: 100,
            summary_max_chars: 100,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            action_memory_limit: 10,
            activation_lookback_days: 1,
        }
    }
}

impl MindConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded mind config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} — using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {} — using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
