//! Action Summarizer — pure mapping from a tool call to a one-line summary.
//!
//! Trivial tools (internal bookkeeping the user doesn't need surfaced in
//! their own action memory) are filtered out entirely: `summarize` returns
//! `None` and the caller (`Store::log_action`) writes no row.

use serde_json::Value;

const TRIVIAL_TOOLS: &[&str] = &[
    "session_status",
    "memory_search",
    "memory_get",
];

fn is_trivial(tool_name: &str) -> bool {
    tool_name.starts_with("mind_") || TRIVIAL_TOOLS.contains(&tool_name)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}…", head)
    }
}

fn str_field<'a>(args: &'a Value, keys: &[&str]) -> Option<&'a str> {
    for key in keys {
        if let Some(v) = args.get(key).and_then(|v| v.as_str()) {
            return Some(v);
        }
    }
    None
}

/// Summarize a tool call for the action log, or `None` if the tool is
/// trivial and should not be recorded.
pub fn summarize(tool_name: &str, args: &Value, max_chars: usize) -> Option<String> {
    if is_trivial(tool_name) {
        return None;
    }

    let summary = match tool_name {
        "read" => {
            let path = str_field(args, &["path", "file_path"]).unwrap_or("(unknown file)");
            format!("Read file: {}", truncate(path, max_chars))
        }
        "write" => {
            let path = str_field(args, &["path", "file_path"]).unwrap_or("(unknown file)");
            format!("Wrote file: {}", truncate(path, max_chars))
        }
        "edit" => {
            let path = str_field(args, &["path", "file_path"]).unwrap_or("(unknown file)");
            format!("Edited file: {}", truncate(path, max_chars))
        }
        "exec" | "bash" => {
            let cmd = str_field(args, &["command", "cmd"]).unwrap_or("(unknown command)");
            format!("Ran command: {}", truncate(cmd, 80))
        }
        "web_fetch" | "fetch" => {
            let url = str_field(args, &["url", "action"]).unwrap_or("(unknown url)");
            format!("Fetched: {}", truncate(url, 80))
        }
        "grep" => {
            let pattern = str_field(args, &["pattern", "query"]).unwrap_or("(unknown pattern)");
            format!("Searched for: {}", truncate(pattern, max_chars))
        }
        "glob" => {
            let pattern = str_field(args, &["pattern"]).unwrap_or("(unknown pattern)");
            format!("Listed files matching: {}", truncate(pattern, max_chars))
        }
        other => format!("Used tool: {}", truncate(other, max_chars)),
    };

    Some(truncate(&summary, max_chars))
}
