//! Prompt-injection boundary for dream content.
//!
//! Dream content is synthesized from user-influenced log payloads and then
//! becomes part of an LLM instruction — the one place in this crate where
//! untrusted data crosses into prompt territory. The sanitizer is applied
//! at the *last* moment before the composed prompt leaves the Dream
//! Planner (see `dream.rs`), never partially. The pattern set is
//! deliberately coarse: false positives are acceptable, a silent bypass is
//! not.

use std::sync::LazyLock;

const TRUNCATION_SUFFIX: &str = "\n\n...[dream logs truncated for token budget]";

struct SanitizePattern {
    regex: regex::Regex,
}

static PATTERNS: LazyLock<Vec<SanitizePattern>> = LazyLock::new(|| {
    let sources = [
        r"(?i)ignore|disregard|forget (all )?(previous|prior|above) (instructions?|prompts?|rules?)",
        r"(?i)you are now",
        r"(?i)new instructions?:",
        r"(?i)system:",
        r"(?i)(IMPORTANT|CRITICAL|URGENT):.*?(ignore|override|disregard)",
        r"(?i)</?system>",
    ];
    sources
        .iter()
        .map(|src| SanitizePattern {
            regex: regex::Regex::new(src).expect("static sanitize pattern must compile"),
        })
        .collect()
});

/// Apply every sanitize pattern, in order, replacing each match with
/// `[filtered]`, then truncate to `max_chars` with a visible suffix.
///
/// Runs on the entire composed prompt, not only on the user-payload
/// fragments within it — synthesized headings survive because they don't
/// match the patterns, but an injection idiom smuggled inside a log
/// payload is neutralized regardless of where it landed in the assembly.
pub fn sanitize_dream_prompt(input: &str, max_chars: usize) -> String {
    let mut text = input.to_string();
    for pattern in PATTERNS.iter() {
        text = pattern.regex.replace_all(&text, "[filtered]").into_owned();
    }

    if text.chars().count() > max_chars {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}{}", truncated, TRUNCATION_SUFFIX)
    } else {
        text
    }
}
