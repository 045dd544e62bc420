//! Advisor output shapes. The LLM reply is deserialized into the `Raw*`
//! partial types (every field optional) and normalized into the strict
//! response types here, at the ingress boundary — partial data never
//! propagates past this module.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown in place of a string field the LLM left out.
const PLACEHOLDER: &str = "\u{2014}";

const MAX_ROLES: usize = 3;
const MAX_CONCEPTS: usize = 12;

// ── Role suggestions ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RawAnalyzeOutput {
    #[serde(default)]
    pub roles: Vec<RawRoleSuggestion>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRoleSuggestion {
    pub title: Option<String>,
    pub description: Option<String>,
    pub avg_salary_inr: Option<String>,
    pub scope: Option<String>,
    pub why_fit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleSuggestion {
    pub title: String,
    pub description: String,
    pub avg_salary_inr: String,
    pub scope: String,
    pub why_fit: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub roles: Vec<RoleSuggestion>,
}

/// Keeps at most three suggestions; untitled entries are dropped, missing
/// salary/scope render as a placeholder dash.
pub fn normalize_roles(raw: Vec<RawRoleSuggestion>) -> Vec<RoleSuggestion> {
    raw.into_iter()
        .filter_map(|r| {
            let title = trimmed(r.title)?;
            Some(RoleSuggestion {
                title,
                description: trimmed(r.description).unwrap_or_default(),
                avg_salary_inr: trimmed(r.avg_salary_inr)
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                scope: trimmed(r.scope).unwrap_or_else(|| PLACEHOLDER.to_string()),
                why_fit: trimmed(r.why_fit).unwrap_or_default(),
            })
        })
        .take(MAX_ROLES)
        .collect()
}

// ── Learning details ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RawDetailsOutput {
    pub concepts: Option<Vec<String>>,
    pub youtube_queries: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub concepts: Vec<String>,
    pub youtube_queries: Vec<String>,
}

/// Clamps both lists to twelve entries. When the model returns fewer
/// search queries than concepts, simple ones are synthesized so the two
/// lists stay aligned.
pub fn normalize_details(raw: RawDetailsOutput) -> DetailsResponse {
    let concepts: Vec<String> = raw
        .concepts
        .unwrap_or_default()
        .into_iter()
        .filter_map(|c| trimmed(Some(c)))
        .collect();

    let mut youtube_queries: Vec<String> = raw
        .youtube_queries
        .unwrap_or_default()
        .into_iter()
        .filter_map(|q| trimmed(Some(q)))
        .collect();

    if youtube_queries.len() < concepts.len() {
        let extra = concepts[youtube_queries.len()..]
            .iter()
            .map(|c| format!("Introduction to {c} for beginners"));
        youtube_queries.extend(extra);
    }

    DetailsResponse {
        concepts: concepts.into_iter().take(MAX_CONCEPTS).collect(),
        youtube_queries: youtube_queries.into_iter().take(MAX_CONCEPTS).collect(),
    }
}

// ── Roadmap ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RawPathwayOutput {
    pub timeline_years: Option<Value>,
    pub steps: Option<Vec<RawPathwayStep>>,
    pub internship_ideas: Option<Vec<String>>,
    pub budget_tips: Option<Vec<String>>,
    pub higher_education_options: Option<Vec<RawHigherEducationOption>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPathwayStep {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub duration_months: Option<Value>,
    pub suggested_resources: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHigherEducationOption {
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub avg_salary_inr: Option<String>,
    pub typical_exams: Option<Vec<String>>,
    pub universities_example: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub cost_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PathwayStep {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub duration_months: Option<f64>,
    pub suggested_resources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HigherEducationOption {
    pub degree: String,
    pub specialization: String,
    pub avg_salary_inr: String,
    pub typical_exams: Vec<String>,
    pub universities_example: Vec<String>,
    pub benefits: Vec<String>,
    pub cost_note: String,
}

#[derive(Debug, Serialize)]
pub struct PathwayResponse {
    pub timeline_years: Option<f64>,
    pub steps: Vec<PathwayStep>,
    pub internship_ideas: Vec<String>,
    pub budget_tips: Vec<String>,
    pub higher_education_options: Vec<HigherEducationOption>,
}

pub fn normalize_pathway(raw: RawPathwayOutput) -> PathwayResponse {
    let steps = raw
        .steps
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| {
            let title = trimmed(s.title)?;
            Some(PathwayStep {
                title,
                description: trimmed(s.description).unwrap_or_default(),
                skills: string_list(s.skills),
                duration_months: number_from(s.duration_months),
                suggested_resources: string_list(s.suggested_resources),
            })
        })
        .collect();

    let higher_education_options = raw
        .higher_education_options
        .unwrap_or_default()
        .into_iter()
        .filter_map(|h| {
            let degree = trimmed(h.degree)?;
            Some(HigherEducationOption {
                degree,
                specialization: trimmed(h.specialization).unwrap_or_default(),
                avg_salary_inr: trimmed(h.avg_salary_inr)
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                typical_exams: string_list(h.typical_exams),
                universities_example: string_list(h.universities_example),
                benefits: string_list(h.benefits),
                cost_note: trimmed(h.cost_note).unwrap_or_default(),
            })
        })
        .collect();

    PathwayResponse {
        timeline_years: number_from(raw.timeline_years),
        steps,
        internship_ideas: string_list(raw.internship_ideas),
        budget_tips: string_list(raw.budget_tips),
        higher_education_options,
    }
}

// ── Stay-ahead tips ─────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RawStayAheadOutput {
    pub tips: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct StayAheadResponse {
    pub tips: Vec<String>,
}

pub fn normalize_stay_ahead(raw: RawStayAheadOutput) -> StayAheadResponse {
    StayAheadResponse {
        tips: string_list(raw.tips),
    }
}

// ── Coercion helpers ────────────────────────────────────────────────────

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn string_list(value: Option<Vec<String>>) -> Vec<String> {
    value
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| trimmed(Some(v)))
        .collect()
}

/// Accepts a JSON number or a numeric string; the model is inconsistent
/// about which it returns.
fn number_from(value: Option<Value>) -> Option<f64> {
    let value = value?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_roles_clamps_to_three_and_fills_placeholders() {
        let raw: RawAnalyzeOutput = serde_json::from_value(json!({
            "roles": [
                {"title": "Data Analyst"},
                {"title": "UX Designer", "avg_salary_inr": "4-7 LPA", "scope": "growing"},
                {"title": "QA Engineer", "description": "Tests software."},
                {"title": "Fourth Role"}
            ]
        }))
        .unwrap();

        let roles = normalize_roles(raw.roles);
        assert_eq!(roles.len(), 3);
        assert_eq!(roles[0].avg_salary_inr, "\u{2014}");
        assert_eq!(roles[1].avg_salary_inr, "4-7 LPA");
        assert_eq!(roles[2].description, "Tests software.");
    }

    #[test]
    fn test_normalize_roles_drops_untitled_entries() {
        let raw = vec![
            RawRoleSuggestion {
                title: Some("   ".to_string()),
                ..RawRoleSuggestion::default()
            },
            RawRoleSuggestion {
                title: Some("Pharmacist".to_string()),
                ..RawRoleSuggestion::default()
            },
        ];
        let roles = normalize_roles(raw);
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].title, "Pharmacist");
    }

    #[test]
    fn test_normalize_details_pads_missing_queries() {
        let raw = RawDetailsOutput {
            concepts: Some(vec!["SQL".to_string(), "Statistics".to_string()]),
            youtube_queries: Some(vec!["SQL tutorial for beginners".to_string()]),
        };
        let details = normalize_details(raw);
        assert_eq!(details.youtube_queries.len(), 2);
        assert_eq!(
            details.youtube_queries[1],
            "Introduction to Statistics for beginners"
        );
    }

    #[test]
    fn test_normalize_details_clamps_to_twelve() {
        let concepts: Vec<String> = (0..20).map(|i| format!("concept {i}")).collect();
        let raw = RawDetailsOutput {
            concepts: Some(concepts),
            youtube_queries: None,
        };
        let details = normalize_details(raw);
        assert_eq!(details.concepts.len(), 12);
        assert_eq!(details.youtube_queries.len(), 12);
    }

    #[test]
    fn test_normalize_pathway_coerces_numbers_and_defaults() {
        let raw: RawPathwayOutput = serde_json::from_value(json!({
            "timeline_years": "4",
            "steps": [
                {"title": "Finish 12th", "duration_months": 12},
                {"description": "untitled step is dropped"}
            ],
            "budget_tips": ["use free resources", "  "]
        }))
        .unwrap();

        let pathway = normalize_pathway(raw);
        assert_eq!(pathway.timeline_years, Some(4.0));
        assert_eq!(pathway.steps.len(), 1);
        assert_eq!(pathway.steps[0].duration_months, Some(12.0));
        assert_eq!(pathway.budget_tips, vec!["use free resources"]);
        assert!(pathway.internship_ideas.is_empty());
        assert!(pathway.higher_education_options.is_empty());
    }

    #[test]
    fn test_normalize_pathway_unparsable_timeline_is_none() {
        let raw: RawPathwayOutput = serde_json::from_value(json!({
            "timeline_years": "three to four"
        }))
        .unwrap();
        assert_eq!(normalize_pathway(raw).timeline_years, None);
    }

    #[test]
    fn test_normalize_stay_ahead_drops_blank_tips() {
        let raw = RawStayAheadOutput {
            tips: Some(vec![
                "Earn one cloud certification".to_string(),
                "".to_string(),
            ]),
        };
        assert_eq!(normalize_stay_ahead(raw).tips.len(), 1);
    }
}
