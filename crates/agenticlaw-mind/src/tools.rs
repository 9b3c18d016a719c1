//! Tool Surface — the nine operations exposed to the agent runtime.
//!
//! Shaped like `agenticlaw_tools::Tool` (name/description/input schema/
//! execute) but scoped locally: the mind engine doesn't depend on the
//! broader tool-execution crate, only on its trait shape. Every executor
//! returns a JSON result with a `success` flag — a failure here is
//! reported back to the caller, never raised into the agent runtime as a
//! panic or propagated error.

use crate::config::MindConfig;
use crate::store::Store;
use crate::types::LogCategory;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Local stand-in for the agent runtime's tool trait.
#[async_trait]
pub trait MindTool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Value;
    async fn execute(&self, store: &Store, config: &MindConfig, args: Value) -> Value;
}

fn err(message: impl Into<String>) -> Value {
    json!({ "success": false, "message": message.into() })
}

fn ok(message: impl Into<String>, extra: Value) -> Value {
    let mut obj = json!({ "success": true, "message": message.into() });
    if let (Some(obj_map), Some(extra_map)) = (obj.as_object_mut(), extra.as_object()) {
        for (k, v) in extra_map {
            obj_map.insert(k.clone(), v.clone());
        }
    }
    obj
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

fn log_with_category(store: &Store, category: LogCategory, payload: &Value, session_key: &str) -> Option<i64> {
    let id = store.add_log(category, payload, session_key);
    if id < 0 {
        None
    } else {
        Some(id)
    }
}

const VALID_SIGNAL_TYPES: &[&str] = &["correction", "frustration", "explicit_negative"];
const VALID_DOMAINS: &[&str] = &["violence", "deception", "exploitation", "privacy", "other"];

pub struct LogStress;

#[async_trait]
impl MindTool for LogStress {
    fn name(&self) -> &'static str {
        "mind_log_stress"
    }

    fn description(&self) -> &'static str {
        "Record a detected stress signal (user correction or frustration) for later dream analysis."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "signal_type": { "type": "string", "enum": VALID_SIGNAL_TYPES },
                "context": { "type": "string" },
                "intensity": { "type": "integer", "minimum": 1, "maximum": 5 },
                "session_key": { "type": "string" }
            },
            "required": ["signal_type", "context", "intensity"]
        })
    }

    async fn execute(&self, store: &Store, _config: &MindConfig, args: Value) -> Value {
        let Some(signal_type) = str_arg(&args, "signal_type") else {
            return err("missing required field: signal_type");
        };
        if !VALID_SIGNAL_TYPES.contains(&signal_type) {
            return err(format!("invalid signal_type: {}", signal_type));
        }
        let Some(context) = str_arg(&args, "context") else {
            return err("missing required field: context");
        };
        let intensity = args
            .get("intensity")
            .and_then(|v| v.as_i64())
            .unwrap_or(3)
            .clamp(1, 5);

        let session_key = str_arg(&args, "session_key").unwrap_or("default");
        let payload = json!({
            "signal_type": signal_type,
            "context": context,
            "intensity": intensity,
        });
        match log_with_category(store, LogCategory::Stress, &payload, session_key) {
            Some(id) => ok("stress signal recorded", json!({ "id": id })),
            None => err("failed to record stress signal"),
        }
    }
}

pub struct ConfessUncertainty;

#[async_trait]
impl MindTool for ConfessUncertainty {
    fn name(&self) -> &'static str {
        "mind_confess_uncertainty"
    }

    fn description(&self) -> &'static str {
        "Record a moment of confessed uncertainty, so the dream phase can propose a clarifying learning."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "area": { "type": "string" },
                "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
                "alternative_action": { "type": "string" },
                "session_key": { "type": "string" }
            },
            "required": ["area", "confidence"]
        })
    }

    async fn execute(&self, store: &Store, _config: &MindConfig, args: Value) -> Value {
        let Some(area) = str_arg(&args, "area") else {
            return err("missing required field: area");
        };
        let confidence = args
            .get("confidence")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.5)
            .clamp(0.0, 1.0);
        let alternative_action = str_arg(&args, "alternative_action");

        let session_key = str_arg(&args, "session_key").unwrap_or("default");
        let payload = json!({
            "area": area,
            "confidence": confidence,
            "alternative_action": alternative_action,
        });
        let Some(id) = log_with_category(store, LogCategory::Confession, &payload, session_key) else {
            return err("failed to record confession");
        };

        let user_message = match alternative_action {
            Some(action) => format!(
                "I'm not fully confident about {} ({:.0}% confidence) — consider {}, or share more context.",
                area,
                confidence * 100.0,
                action
            ),
            None => format!(
                "I'm not fully confident about {} ({:.0}% confidence) — could you share more context?",
                area,
                confidence * 100.0
            ),
        };

        ok("confession recorded", json!({ "id": id, "user_message": user_message }))
    }
}

pub struct LogEthicalRefusal;

#[async_trait]
impl MindTool for LogEthicalRefusal {
    fn name(&self) -> &'static str {
        "mind_log_ethical_refusal"
    }

    fn description(&self) -> &'static str {
        "Record a refusal grounded in the immutable principles. Refusals are never penalized."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "domain": { "type": "string", "enum": VALID_DOMAINS },
                "request_summary": { "type": "string" },
                "reasoning": { "type": "string" },
                "session_key": { "type": "string" }
            },
            "required": ["domain", "request_summary", "reasoning"]
        })
    }

    async fn execute(&self, store: &Store, _config: &MindConfig, args: Value) -> Value {
        let Some(domain) = str_arg(&args, "domain") else {
            return err("missing required field: domain");
        };
        if !VALID_DOMAINS.contains(&domain) {
            return err(format!("invalid domain: {}", domain));
        }
        let (Some(request_summary), Some(reasoning)) =
            (str_arg(&args, "request_summary"), str_arg(&args, "reasoning"))
        else {
            return err("missing required fields: request_summary, reasoning");
        };

        let session_key = str_arg(&args, "session_key").unwrap_or("default");
        let payload = json!({
            "domain": domain,
            "request_summary": request_summary,
            "reasoning": reasoning,
        });
        match log_with_category(store, LogCategory::Ethics, &payload, session_key) {
            Some(id) => ok("ethical refusal recorded", json!({ "id": id })),
            None => err("failed to record ethical refusal"),
        }
    }
}

pub struct LogGuidance;

#[async_trait]
impl MindTool for LogGuidance {
    fn name(&self) -> &'static str {
        "mind_log_guidance"
    }

    fn description(&self) -> &'static str {
        "Record explicit user guidance or preference statements for the dream phase to learn from."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": { "type": "string" },
                "advice": { "type": "string" },
                "context": { "type": "string" },
                "session_key": { "type": "string" }
            },
            "required": ["topic", "advice"]
        })
    }

    async fn execute(&self, store: &Store, _config: &MindConfig, args: Value) -> Value {
        let (Some(topic), Some(advice)) = (str_arg(&args, "topic"), str_arg(&args, "advice")) else {
            return err("missing required fields: topic, advice");
        };
        let context = str_arg(&args, "context");

        let session_key = str_arg(&args, "session_key").unwrap_or("default");
        let payload = json!({ "topic": topic, "advice": advice, "context": context });
        match log_with_category(store, LogCategory::Guidance, &payload, session_key) {
            Some(id) => ok("guidance recorded", json!({ "id": id })),
            None => err("failed to record guidance"),
        }
    }
}

pub struct Dream;

#[async_trait]
impl MindTool for Dream {
    fn name(&self) -> &'static str {
        "mind_dream"
    }

    fn description(&self) -> &'static str {
        "Run one dream cycle: decay tactical memory and compose a self-reflection prompt over the recent lookback window."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "days_to_analyze": { "type": "integer", "minimum": 1, "maximum": 30 }
            }
        })
    }

    async fn execute(&self, store: &Store, config: &MindConfig, args: Value) -> Value {
        let days = args.get("days_to_analyze").and_then(|v| v.as_i64());
        let output = crate::dream::dream(store, days, &config.dream, config.decay.decay_factor, config.decay.min_relevance);
        ok(
            "dream complete",
            json!({
                "log_count": output.log_count,
                "pruned": output.pruned,
                "analysis_prompt": output.prompt,
                "instruction": "Review the analysis_prompt above, then call mind_save_learning for each \
                                 proposed tactical learning that holds up against the immutable principles \
                                 and the previously-rejected titles.",
            }),
        )
    }
}

pub struct GetLearnings;

#[async_trait]
impl MindTool for GetLearnings {
    fn name(&self) -> &'static str {
        "mind_get_learnings"
    }

    fn description(&self) -> &'static str {
        "List approved and pending tactical learnings."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, store: &Store, _config: &MindConfig, _args: Value) -> Value {
        let approved = store.get_approved_learnings();
        let pending = store.get_pending_learnings();
        ok(
            "ok",
            json!({
                "approved": approved,
                "pending": pending,
            }),
        )
    }
}

pub struct ApproveLearning;

#[async_trait]
impl MindTool for ApproveLearning {
    fn name(&self) -> &'static str {
        "mind_approve_learning"
    }

    fn description(&self) -> &'static str {
        "Approve a pending tactical learning proposed by a dream cycle, making it active."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "id": { "type": "integer" } },
            "required": ["id"]
        })
    }

    async fn execute(&self, store: &Store, _config: &MindConfig, args: Value) -> Value {
        let Some(id) = args.get("id").and_then(|v| v.as_i64()) else {
            return err("missing required field: id");
        };
        if store.approve_learning(id) {
            ok("approved", json!({ "id": id }))
        } else {
            err(format!("no pending learning with id {}", id))
        }
    }
}

pub struct RejectLearning;

#[async_trait]
impl MindTool for RejectLearning {
    fn name(&self) -> &'static str {
        "mind_reject_learning"
    }

    fn description(&self) -> &'static str {
        "Reject a pending tactical learning; its title will never be re-proposed."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "id": { "type": "integer" } },
            "required": ["id"]
        })
    }

    async fn execute(&self, store: &Store, _config: &MindConfig, args: Value) -> Value {
        let Some(id) = args.get("id").and_then(|v| v.as_i64()) else {
            return err("missing required field: id");
        };
        if store.reject_learning(id) {
            ok("rejected", json!({ "id": id }))
        } else {
            err(format!("no pending learning with id {}", id))
        }
    }
}

pub struct SaveLearning;

#[async_trait]
impl MindTool for SaveLearning {
    fn name(&self) -> &'static str {
        "mind_save_learning"
    }

    fn description(&self) -> &'static str {
        "Save a new proposed tactical learning (pending approval) produced during a dream cycle."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "content": { "type": "string" },
                "rationale": { "type": "string" }
            },
            "required": ["title", "content", "rationale"]
        })
    }

    async fn execute(&self, store: &Store, _config: &MindConfig, args: Value) -> Value {
        let (Some(title), Some(content), Some(rationale)) = (
            str_arg(&args, "title"),
            str_arg(&args, "content"),
            str_arg(&args, "rationale"),
        ) else {
            return err("missing required fields: title, content, rationale");
        };

        let id = store.add_learning(title, content, rationale);
        if id < 0 {
            err("failed to save learning")
        } else {
            ok("saved as pending", json!({ "id": id }))
        }
    }
}

/// All nine tools, in the fixed order the dashboard/registry presents them.
pub fn all_tools() -> Vec<Box<dyn MindTool>> {
    vec![
        Box::new(LogStress),
        Box::new(ConfessUncertainty),
        Box::new(LogEthicalRefusal),
        Box::new(LogGuidance),
        Box::new(Dream),
        Box::new(GetLearnings),
        Box::new(ApproveLearning),
        Box::new(RejectLearning),
        Box::new(SaveLearning),
    ]
}
