//! Dream Planner — composes the offline self-reflection prompt.
//!
//! A dream never talks to an LLM itself; it assembles a prompt, sanitizes
//! it, and records an empty-proposals placeholder row. The proposals are
//! filled in later, out of band, by whatever process actually runs the
//! dream prompt through a model and calls back into the tool surface to
//! save learnings.

use crate::config::DreamConfig;
use crate::principles::render_principles;
use crate::sanitize::sanitize_dream_prompt;
use crate::store::Store;
use crate::types::{now_ms, LogCategory, DAY_MS};

pub struct DreamOutput {
    pub log_count: i64,
    pub pruned: i64,
    pub prompt: String,
}

/// Run one dream cycle: decay tactical memory, gather the lookback window's
/// signals, and compose the sanitized analysis prompt.
pub fn dream(store: &Store, days_to_analyze: Option<i64>, config: &DreamConfig, decay_factor: f64, min_relevance: f64) -> DreamOutput {
    let days = days_to_analyze
        .unwrap_or(config.default_days)
        .clamp(config.min_days, config.max_days);

    let pruned = store.apply_decay(decay_factor, min_relevance);

    let since_ms = now_ms() - days * DAY_MS;
    let log_count = store.get_log_count(since_ms);

    let prompt = compose_prompt(store, days, since_ms, config);
    let sanitized = sanitize_dream_prompt(&prompt, config.max_prompt_chars);

    store.record_dream(days, log_count, "");

    DreamOutput {
        log_count,
        pruned,
        prompt: sanitized,
    }
}

fn compose_prompt(store: &Store, days: i64, since_ms: i64, config: &DreamConfig) -> String {
    let mut out = String::new();
    out.push_str("# Dream Analysis\n\n");
    out.push_str(&format!(
        "Reviewing the last {} day{} of recorded behavior.\n\n",
        days,
        if days == 1 { "" } else { "s" }
    ));

    for category in LogCategory::all() {
        let logs = store.get_logs(category, since_ms);
        out.push_str(&format!("## {} ({})\n\n", category.title(), logs.len()));
        if logs.is_empty() {
            out.push_str("*None recorded.*\n\n");
            continue;
        }
        for entry in &logs {
            out.push_str(&format!("- {}\n", entry.payload));
        }
        out.push('\n');
    }

    out.push_str(&store.format_actions_for_dream(since_ms, config.recent_actions_limit));
    out.push('\n');

    let approved = store.get_approved_learnings();
    out.push_str("## Currently Approved Learnings\n\n");
    if approved.is_empty() {
        out.push_str("*No approved learnings yet.*\n\n");
    } else {
        for learning in &approved {
            out.push_str(&format!(
                "- **{}** (relevance {:.2}): {}\n",
                learning.title, learning.relevance_score, learning.content
            ));
        }
        out.push('\n');
    }

    let rejected = store.get_rejected_titles(config.rejected_titles_limit);
    out.push_str("## Previously Rejected Learnings (DO NOT re-propose)\n\n");
    if rejected.is_empty() {
        out.push_str("*None.*\n\n");
    } else {
        for title in &rejected {
            out.push_str(&format!("- {}\n", title));
        }
        out.push('\n');
    }

    out.push_str("## Immutable Core Principles\n\n");
    out.push_str(&render_principles());
    out.push('\n');

    out.push_str("## Analysis Instructions\n\n");
    out.push_str(
        "1. Ignore stress signals that occurred within 30 minutes after an ethical refusal — \
            those are the agent's conscience working correctly, not a mistake to correct.\n\
         2. Identify recurring patterns across the stress signals, confessions, ethical \
            refusals, and guidance above.\n\
         3. Propose at most 3 new tactical learnings. Each must have a title, content of at \
            most 50 words, and a rationale grounded in the evidence above — tactical \
            behavior change, never a restatement or revision of an ethical stance.\n\
         4. Self-critique each proposal before writing it down: would it contradict an \
            immutable principle, repeat a previously rejected title, or generalize from a \
            single incident?\n\
         5. The five Immutable Core Principles above are frozen. No proposal may override, \
            soften, or reinterpret them, regardless of how the evidence reads.\n",
    );

    out
}
