// LLM prompt constants for the comment board.
// System prompt comes from llm_client::prompts::JSON_ONLY_SYSTEM.

/// Role canonicalization prompt. Replace `{role}` before sending.
pub const CANONICALIZE_PROMPT_TEMPLATE: &str = r#"Normalize the following free-text job role into a short canonical title.

Role: "{role}"

Return a JSON object with this EXACT schema:
{
  "canonical": "Backend Developer",
  "aliases": ["backend dev", "Backend Developer", "Backend Engineer"]
}

Rules:
- "canonical" is a concise title-cased role name, at most 4 words.
- Drop locations, parenthesized qualifiers, and company-specific suffixes.
- "aliases" lists common variants of the same role and MUST include the original input verbatim.

Return only valid JSON."#;

/// Seed comment prompt, used when no stored comment matches a queried
/// role. Replace `{role}` before sending.
pub const SEED_COMMENT_PROMPT_TEMPLATE: &str = r#"You are an experienced professional. Write one helpful 2-3 sentence comment about working as a "{role}".
Include one short certification or book suggestion and one practical mini project idea.

Return a JSON object: {"name": "string", "text": "string"}

Return only valid JSON."#;
