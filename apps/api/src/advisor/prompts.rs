// All LLM prompt constants for the advisor endpoints.

/// System prompt for every advisor call — enforces JSON-only output.
pub const ADVISOR_SYSTEM: &str = "You are an expert career advisor for Indian students. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Role suggestion prompt. Replace `{answers}` with the questionnaire
/// answers as pretty-printed JSON.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Given the following questionnaire answers (JSON), choose the best 3 career roles across any field.

Answers:
{answers}

Return a JSON object with this EXACT schema:
{
  "roles": [
    {
      "title": "string",
      "description": "short 1-2 line description",
      "avg_salary_inr": "entry-level salary estimate in INR, e.g. '3-6 LPA'",
      "scope": "1-line future scope in India",
      "why_fit": "1-2 line reason based on the answers"
    }
  ]
}

Return exactly 3 roles. Return only valid JSON."#;

/// Learning details prompt. Replace `{title}` before sending.
pub const DETAILS_PROMPT_TEMPLATE: &str = r#"You are an expert curriculum designer. For the role "{title}" return a JSON object with this EXACT schema:
{
  "concepts": ["at least 5 concise core concepts or skills to learn"],
  "youtube_queries": ["for each concept, a beginner-friendly YouTube SEARCH query text (not a link)"]
}

Return only valid JSON."#;

/// Roadmap prompt. Replace `{title}` before sending.
pub const PATHWAY_PROMPT_TEMPLATE: &str = r#"Create a practical roadmap for a student in India to become a "{title}" starting from 12th/PUC. Include affordability and realistic steps.

Return a JSON object with this EXACT schema:
{
  "timeline_years": 4,
  "steps": [
    {
      "title": "string",
      "description": "string",
      "skills": ["..."],
      "duration_months": 6,
      "suggested_resources": ["..."]
    }
  ],
  "internship_ideas": ["6-8 ideas"],
  "budget_tips": ["7-8 tips"],
  "higher_education_options": [
    {
      "degree": "string",
      "specialization": "string",
      "avg_salary_inr": "string",
      "typical_exams": ["..."],
      "universities_example": ["..."],
      "benefits": ["..."],
      "cost_note": "string"
    }
  ]
}

Return only valid JSON."#;

/// Stay-ahead tips prompt. Replace `{title}` before sending.
pub const STAY_AHEAD_PROMPT_TEMPLATE: &str = r#"You are an expert career coach. For the role "{title}" produce 6 concise "stay ahead" tips for a student who has completed the basic roadmap.

Include:
- 2-3 short certificate suggestions (affordable/online),
- 2 mini-project ideas to strengthen a portfolio,
- 1 networking tip,
- 1 soft skill to practice.

Return a JSON object: {"tips": ["tip1", "tip2"]}

Return only valid JSON."#;
