//! Comment matching — scores every stored comment against a canonicalized
//! query role and returns the ranked subset above a fixed threshold. When
//! nothing matches, a single synthetic seed comment is generated so a new
//! role page is never blank; the seed is never persisted.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::comments::canonical::{canonicalize, Canonicalization};
use crate::comments::models::CommentRecord;
use crate::comments::prompts::SEED_COMMENT_PROMPT_TEMPLATE;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{parse_json_response, TextGenerator};

/// Records scoring at or below this are dropped (strictly-greater keeps).
pub const SCORE_THRESHOLD: f64 = 0.15;

// Empirical scoring weights. The absolute values matter less than the
// relative ordering they produce: an exact canonical match plus full token
// overlap must always outrank partial matches.
const EXACT_MATCH_WEIGHT: f64 = 2.0;
const OVERLAP_WEIGHT: f64 = 2.0;
const SUBSTRING_WEIGHT: f64 = 0.5;
const RECENCY_WEIGHT: f64 = 0.1;

const YEAR_MS: f64 = 365.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Default author name for seed comments whose generation omitted one.
const SEED_NAME: &str = "Pro Tip";
const SEED_TEXT_MAX_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct LlmSeed {
    name: Option<String>,
    text: Option<String>,
}

/// Scores and ranks `corpus` against `query_role`, descending. Ties break
/// toward the newer comment. An empty result set falls back to one
/// generated seed comment (`auto = true`); if that generation fails too,
/// the result is simply empty — this function never errors.
pub async fn find_matches(
    query_role: &str,
    corpus: &[CommentRecord],
    llm: &dyn TextGenerator,
    now_ms: i64,
) -> Vec<CommentRecord> {
    let (query, strategy) = canonicalize(query_role, llm).await;
    debug!(
        "matching against {} comments (canonical: {:?}, via {:?})",
        corpus.len(),
        query.canonical,
        strategy
    );

    let mut scored: Vec<(f64, &CommentRecord)> = corpus
        .iter()
        .map(|c| (score_comment(query_role, &query, c, now_ms), c))
        .filter(|(score, _)| *score > SCORE_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.1.timestamp.cmp(&a.1.timestamp))
    });

    if scored.is_empty() {
        return match synthesize_seed(query_role, &query, llm, now_ms).await {
            Some(seed) => vec![seed],
            None => Vec::new(),
        };
    }

    scored.into_iter().map(|(_, c)| c.clone()).collect()
}

/// Relevance of one comment to the canonicalized query.
///
/// Components: exact canonical equality (+2.0), token-overlap ratio
/// (`|q∩c| / max(|q|,|c|)`, weighted 2.0), raw-query substring presence
/// (+0.5), and a recency boost that decays linearly to zero over a year
/// (max +0.1). A query that canonicalized to the empty string skips the
/// equality component and carries no tokens, degenerating to
/// substring-and-recency scoring.
pub fn score_comment(
    raw_query: &str,
    query: &Canonicalization,
    comment: &CommentRecord,
    now_ms: i64,
) -> f64 {
    let mut score = 0.0;

    if !query.canonical.is_empty()
        && comment.canonical_role.to_lowercase() == query.canonical.to_lowercase()
    {
        score += EXACT_MATCH_WEIGHT;
    }

    score += token_overlap(&query.tokens, &comment.tokens) * OVERLAP_WEIGHT;

    let needle = raw_query.trim().to_lowercase();
    if comment.role.to_lowercase().contains(&needle)
        || comment.canonical_role.to_lowercase().contains(&needle)
    {
        score += SUBSTRING_WEIGHT;
    }

    let age_ms = (now_ms - comment.timestamp).max(0) as f64;
    score += (1.0 - (age_ms / YEAR_MS).min(1.0)).max(0.0) * RECENCY_WEIGHT;

    score
}

/// Shared-token ratio between two token sets, divided by the larger set's
/// size. Zero when either side is empty.
fn token_overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_set: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b_set: HashSet<&str> = b.iter().map(String::as_str).collect();
    let shared = a_set.intersection(&b_set).count();
    shared as f64 / a_set.len().max(b_set.len()) as f64
}

/// Generates one placeholder comment for a role nobody has written about
/// yet. Best-effort: any failure just means no seed.
async fn synthesize_seed(
    query_role: &str,
    query: &Canonicalization,
    llm: &dyn TextGenerator,
    now_ms: i64,
) -> Option<CommentRecord> {
    let topic = if query.canonical.is_empty() {
        query_role.trim().to_string()
    } else {
        query.canonical.clone()
    };
    let prompt = SEED_COMMENT_PROMPT_TEMPLATE.replace("{role}", &topic);

    let generated = match llm.generate(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            debug!("seed comment generation failed: {e}");
            return None;
        }
    };

    let parsed: LlmSeed = parse_json_response(&generated).ok()?;
    let text = parsed
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| generated.trim().chars().take(SEED_TEXT_MAX_CHARS).collect());
    if text.is_empty() {
        return None;
    }

    Some(CommentRecord {
        id: format!("seed-{}", Uuid::new_v4()),
        name: parsed
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| SEED_NAME.to_string()),
        text,
        role: query_role.trim().to_string(),
        canonical_role: query.canonical.clone(),
        aliases: query.aliases.clone(),
        tokens: query.tokens.clone(),
        timestamp: now_ms,
        auto: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    const NOW: i64 = 1_700_000_000_000;
    const TWO_YEARS_MS: i64 = 2 * 365 * 24 * 60 * 60 * 1000;

    struct StubGenerator {
        reply: Option<String>,
    }

    impl StubGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
            }
        }

        fn failing() -> Self {
            Self { reply: None }
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.reply.clone().ok_or(LlmError::EmptyContent)
        }
    }

    fn record(role: &str, canonical: &str, tokens: &[&str], timestamp: i64) -> CommentRecord {
        CommentRecord {
            id: "c1".to_string(),
            name: "Tester".to_string(),
            text: "some comment".to_string(),
            role: role.to_string(),
            canonical_role: canonical.to_string(),
            aliases: vec![role.to_string()],
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            timestamp,
            auto: false,
        }
    }

    fn query(canonical: &str, tokens: &[&str]) -> Canonicalization {
        Canonicalization {
            canonical: canonical.to_string(),
            aliases: vec![canonical.to_string()],
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_exact_match_outscores_unrelated_by_at_least_two() {
        let q = query("Backend Developer", &["backend", "developer"]);
        let exact = record(
            "Backend Developer",
            "Backend Developer",
            &["backend", "developer"],
            NOW - TWO_YEARS_MS,
        );
        let unrelated = record("Chef", "Chef", &["chef"], NOW - TWO_YEARS_MS);

        let exact_score = score_comment("Backend Developer", &q, &exact, NOW);
        let unrelated_score = score_comment("Backend Developer", &q, &unrelated, NOW);
        assert!(exact_score - unrelated_score >= 2.0);
    }

    #[test]
    fn test_half_token_overlap_contributes_one_point() {
        // "backend dev" vs stored ["backend","developer"]: 1 shared of
        // max 2 => overlap 0.5 => +1.0. Canonical order is flipped so no
        // substring or equality component interferes.
        let q = query("Backend Dev", &["backend", "dev"]);
        let stored = record(
            "developer backend",
            "Developer Backend",
            &["backend", "developer"],
            NOW - TWO_YEARS_MS,
        );
        let score = score_comment("backend dev", &q, &stored, NOW);
        assert!((score - 1.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_overlap_is_zero_when_either_side_empty() {
        let q = query("Mystery Role", &[]);
        let stored = record("chef", "Chef", &["chef"], NOW - TWO_YEARS_MS);
        let score = score_comment("mystery role", &q, &stored, NOW);
        assert!(score < 1e-9, "score was {score}");
    }

    #[test]
    fn test_substring_match_adds_half_point() {
        let q = query("Dev", &["dev"]);
        let stored = record(
            "Senior Backend Developer",
            "Senior Backend Developer",
            &["senior", "backend", "developer"],
            NOW - TWO_YEARS_MS,
        );
        // No exact match, no shared token ("dev" != "developer"), but the
        // raw query is a substring of the stored role.
        let score = score_comment("Dev", &q, &stored, NOW);
        assert!((score - 0.5).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_recency_boost_saturates_for_future_timestamps() {
        let q = query("Quantum Gardener", &["quantum", "gardener"]);
        let stored = record("chef", "Chef", &["chef"], NOW + 10_000);
        let score = score_comment("quantum gardener", &q, &stored, NOW);
        assert!((score - 0.1).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_empty_query_degenerates_to_substring_and_recency() {
        let q = query("", &[]);
        let stored = record("chef", "Chef", &["chef"], NOW - TWO_YEARS_MS);
        // The empty raw query occurs in every string, so only the
        // substring component fires.
        let score = score_comment("", &q, &stored, NOW);
        assert!((score - 0.5).abs() < 1e-9, "score was {score}");
    }

    #[tokio::test]
    async fn test_results_sorted_descending_by_score() {
        let llm = StubGenerator::failing();
        let corpus = vec![
            record("chef", "Chef", &["chef"], NOW - TWO_YEARS_MS),
            record(
                "backend engineer",
                "Backend Engineer",
                &["backend", "engineer"],
                NOW - TWO_YEARS_MS,
            ),
            record(
                "backend developer",
                "Backend Developer",
                &["backend", "developer"],
                NOW - TWO_YEARS_MS,
            ),
        ];

        let matches = find_matches("backend developer", &corpus, &llm, NOW).await;
        assert_eq!(matches.len(), 2, "unrelated comment should be dropped");
        assert_eq!(matches[0].canonical_role, "Backend Developer");
        assert_eq!(matches[1].canonical_role, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_equal_scores_break_ties_by_newer_timestamp() {
        let llm = StubGenerator::failing();
        let older = record(
            "backend developer",
            "Backend Developer",
            &["backend", "developer"],
            NOW - TWO_YEARS_MS - 5_000,
        );
        let newer = record(
            "backend developer",
            "Backend Developer",
            &["backend", "developer"],
            NOW - TWO_YEARS_MS,
        );

        let matches =
            find_matches("backend developer", &[older.clone(), newer.clone()], &llm, NOW).await;
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].timestamp, newer.timestamp);
        assert_eq!(matches[1].timestamp, older.timestamp);
    }

    #[tokio::test]
    async fn test_score_at_threshold_is_excluded() {
        // 3 shared tokens against a 40-token canonical: overlap 3/40,
        // weighted to exactly 0.15 — at the threshold, so excluded and the
        // matcher falls through to the seed path.
        let canonical_words: Vec<String> =
            (0..40).map(|i| format!("word{i}")).collect();
        let reply = format!(
            r#"{{"canonical": "{}", "aliases": ["q"]}}"#,
            canonical_words.join(" ")
        );
        let llm = StubGenerator::replying(&reply);

        let stored = record(
            "unrelated",
            "Unrelated Title Here",
            &["word0", "word1", "word2"],
            NOW - TWO_YEARS_MS,
        );
        let q = query(
            &canonical_words.join(" "),
            &canonical_words
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
        );
        let score = score_comment("zzz", &q, &stored, NOW);
        assert!((score - 0.15).abs() < 1e-12, "score was {score}");
        assert!(score <= SCORE_THRESHOLD);

        let matches = find_matches("zzz", &[stored], &llm, NOW).await;
        // The at-threshold record is excluded; the only possible result is
        // a synthetic seed.
        assert!(matches.iter().all(|m| m.auto));
    }

    #[tokio::test]
    async fn test_score_just_above_threshold_is_included() {
        let canonical_words: Vec<String> =
            (0..39).map(|i| format!("word{i}")).collect();
        let reply = format!(
            r#"{{"canonical": "{}", "aliases": ["q"]}}"#,
            canonical_words.join(" ")
        );
        let llm = StubGenerator::replying(&reply);

        let stored = record(
            "unrelated",
            "Unrelated Title Here",
            &["word0", "word1", "word2"],
            NOW - TWO_YEARS_MS,
        );

        let matches = find_matches("zzz", &[stored], &llm, NOW).await;
        assert_eq!(matches.len(), 1);
        assert!(!matches[0].auto);
    }

    #[tokio::test]
    async fn test_empty_corpus_generates_single_seed() {
        let llm = StubGenerator::replying(
            r#"{"name": "Mentor", "text": "Product sense beats tool mastery. Read 'Inspired' and ship a tiny roadmap for an app you use daily."}"#,
        );
        let matches = find_matches("Product Manager", &[], &llm, NOW).await;
        assert_eq!(matches.len(), 1);
        let seed = &matches[0];
        assert!(seed.auto);
        assert_eq!(seed.name, "Mentor");
        assert!(seed.id.starts_with("seed-"));
        assert_eq!(seed.timestamp, NOW);
    }

    #[tokio::test]
    async fn test_empty_corpus_returns_empty_when_seed_fails() {
        let llm = StubGenerator::failing();
        let matches = find_matches("Product Manager", &[], &llm, NOW).await;
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_seed_name_defaults_when_missing() {
        let llm =
            StubGenerator::replying(r#"{"text": "Start with spreadsheets, then learn SQL."}"#);
        let matches = find_matches("Business Analyst", &[], &llm, NOW).await;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Pro Tip");
    }

    #[tokio::test]
    async fn test_seed_carries_query_canonical_metadata() {
        let llm = StubGenerator::replying(r#"{"name": "Guide", "text": "Useful tip."}"#);
        let matches = find_matches("product manager (fmcg)", &[], &llm, NOW).await;
        assert_eq!(matches.len(), 1);
        let seed = &matches[0];
        // Stub output parses as a seed but not as a canonicalization, so
        // the heuristic canonical applies.
        assert_eq!(seed.canonical_role, "Product Manager");
        assert_eq!(seed.tokens, vec!["product", "manager"]);
        assert_eq!(seed.role, "product manager (fmcg)");
    }
}
