//! Role-name canonicalization — maps free-text role strings ("SWE",
//! "Software Engineer", "software developer (backend)") to a shared
//! canonical title, alias list, and token set used to group comments.
//!
//! Two strategies: the LLM produces the higher-quality title when it is
//! reachable and returns usable JSON; a deterministic heuristic covers
//! every other case, so canonicalization never fails.

use serde::Deserialize;
use tracing::debug;

use crate::comments::prompts::CANONICALIZE_PROMPT_TEMPLATE;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{parse_json_response, TextGenerator};

/// Canonical titles are clipped to this many words by the heuristic.
const MAX_CANONICAL_WORDS: usize = 4;

/// Normalized form of a role string. `tokens` is always the tokenization
/// of `canonical`, regardless of which strategy produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonicalization {
    pub canonical: String,
    pub aliases: Vec<String>,
    pub tokens: Vec<String>,
}

/// Which strategy produced a canonicalization. The public contract never
/// fails; this is kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Llm,
    Heuristic,
}

#[derive(Debug, Deserialize)]
struct LlmCanonical {
    canonical: Option<String>,
    aliases: Option<Vec<String>>,
}

/// Canonicalizes a raw role string. Tries the LLM first, falls back to the
/// deterministic heuristic on any transport failure, unparsable response,
/// or empty canonical title. Always returns a usable result.
pub async fn canonicalize(raw: &str, llm: &dyn TextGenerator) -> (Canonicalization, Strategy) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return (canonicalize_heuristic(raw), Strategy::Heuristic);
    }

    match canonicalize_llm(trimmed, llm).await {
        Some(result) => (result, Strategy::Llm),
        None => (canonicalize_heuristic(raw), Strategy::Heuristic),
    }
}

async fn canonicalize_llm(role: &str, llm: &dyn TextGenerator) -> Option<Canonicalization> {
    let prompt = CANONICALIZE_PROMPT_TEMPLATE.replace("{role}", role);
    let text = match llm.generate(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            debug!("canonicalization call failed, using heuristic: {e}");
            return None;
        }
    };

    let parsed: LlmCanonical = parse_json_response(&text).ok()?;
    let canonical = parsed.canonical?.trim().to_string();
    if canonical.is_empty() {
        return None;
    }

    let mut aliases: Vec<String> = parsed
        .aliases
        .unwrap_or_default()
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    if aliases.is_empty() {
        aliases = vec![role.to_string()];
    }

    let tokens = tokenize(&canonical);
    Some(Canonicalization {
        canonical,
        aliases: dedup_preserving_order(aliases),
        tokens,
    })
}

/// Deterministic fallback: strips qualifiers, clips to four words, and
/// title-cases the remainder. Same input, same output, no external calls.
pub fn canonicalize_heuristic(raw: &str) -> Canonicalization {
    let trimmed = raw.trim();

    let mut candidate = strip_qualifiers(trimmed);
    if candidate.is_empty() {
        candidate = trimmed.to_string();
    }

    let canonical = candidate
        .split_whitespace()
        .take(MAX_CANONICAL_WORDS)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    let aliases = dedup_preserving_order(
        [trimmed.to_string(), canonical.clone()]
            .into_iter()
            .filter(|a| !a.is_empty())
            .collect(),
    );

    let tokens = tokenize(&canonical);
    Canonicalization {
        canonical,
        aliases,
        tokens,
    }
}

/// Lowercases, replaces every non-word character with whitespace, splits,
/// and drops empties. Shared by both strategies so token sets are always
/// derivable from the canonical title.
pub fn tokenize(value: &str) -> Vec<String> {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Removes parenthesized qualifiers, a trailing `in <...>` / `for <...>`
/// clause, and any suffix introduced by a spaced dash.
/// "Jr Backend Dev (Remote) - Night Shift" becomes "Jr Backend Dev".
fn strip_qualifiers(value: &str) -> String {
    let without_parens = strip_parentheticals(value);
    let without_clause = strip_trailing_clause(&without_parens);
    strip_dash_suffix(&without_clause).trim().to_string()
}

fn strip_parentheticals(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut depth: usize = 0;
    for c in value.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn strip_trailing_clause(value: &str) -> String {
    let words: Vec<&str> = value.split_whitespace().collect();
    let cut = words
        .iter()
        .position(|w| w.eq_ignore_ascii_case("in") || w.eq_ignore_ascii_case("for"));
    match cut {
        Some(i) if i > 0 => words[..i].join(" "),
        _ => words.join(" "),
    }
}

fn strip_dash_suffix(value: &str) -> &str {
    let mut cut = value.len();
    for sep in [" - ", " \u{2013} ", " \u{2014} "] {
        if let Some(pos) = value.find(sep) {
            cut = cut.min(pos);
        }
    }
    &value[..cut]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
