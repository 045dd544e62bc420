use axum::{extract::State, Json};
use serde::Deserialize;

use crate::advisor::models::{
    normalize_details, normalize_pathway, normalize_roles, normalize_stay_ahead, AnalyzeResponse,
    DetailsResponse, PathwayResponse, RawAnalyzeOutput, RawDetailsOutput, RawPathwayOutput,
    RawStayAheadOutput, StayAheadResponse,
};
use crate::advisor::prompts::{
    ADVISOR_SYSTEM, ANALYZE_PROMPT_TEMPLATE, DETAILS_PROMPT_TEMPLATE, PATHWAY_PROMPT_TEMPLATE,
    STAY_AHEAD_PROMPT_TEMPLATE,
};
use crate::errors::AppError;
use crate::llm_client::parse_json_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub answers: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: Option<String>,
}

/// POST /api/v1/analyze — questionnaire answers in, up to three suggested
/// roles out.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let answers = serde_json::to_string_pretty(&req.answers)
        .unwrap_or_else(|_| "{}".to_string());
    let prompt = ANALYZE_PROMPT_TEMPLATE.replace("{answers}", &answers);

    let raw: RawAnalyzeOutput = advisor_call(&state, &prompt, "role analysis").await?;
    let roles = normalize_roles(raw.roles);
    if roles.is_empty() {
        return Err(AppError::Llm(
            "role analysis returned no usable roles".to_string(),
        ));
    }
    Ok(Json(AnalyzeResponse { roles }))
}

/// POST /api/v1/details — core concepts and YouTube search queries for a
/// role.
pub async fn handle_details(
    State(state): State<AppState>,
    Json(req): Json<TitleRequest>,
) -> Result<Json<DetailsResponse>, AppError> {
    let title = required_title(req.title)?;
    let prompt = DETAILS_PROMPT_TEMPLATE.replace("{title}", &title);

    let raw: RawDetailsOutput = advisor_call(&state, &prompt, "learning details").await?;
    Ok(Json(normalize_details(raw)))
}

/// POST /api/v1/pathway — a step-by-step roadmap with higher-education
/// options.
pub async fn handle_pathway(
    State(state): State<AppState>,
    Json(req): Json<TitleRequest>,
) -> Result<Json<PathwayResponse>, AppError> {
    let title = required_title(req.title)?;
    let prompt = PATHWAY_PROMPT_TEMPLATE.replace("{title}", &title);

    let raw: RawPathwayOutput = advisor_call(&state, &prompt, "pathway").await?;
    Ok(Json(normalize_pathway(raw)))
}

/// POST /api/v1/stayahead — tips for after the basic roadmap is done.
pub async fn handle_stay_ahead(
    State(state): State<AppState>,
    Json(req): Json<TitleRequest>,
) -> Result<Json<StayAheadResponse>, AppError> {
    let title = required_title(req.title)?;
    let prompt = STAY_AHEAD_PROMPT_TEMPLATE.replace("{title}", &title);

    let raw: RawStayAheadOutput = advisor_call(&state, &prompt, "stay-ahead tips").await?;
    Ok(Json(normalize_stay_ahead(raw)))
}

async fn advisor_call<T: serde::de::DeserializeOwned>(
    state: &AppState,
    prompt: &str,
    operation: &str,
) -> Result<T, AppError> {
    let text = state
        .llm
        .generate(prompt, ADVISOR_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("{operation} failed: {e}")))?;
    parse_json_response(&text)
        .map_err(|e| AppError::Llm(format!("{operation} returned malformed JSON: {e}")))
}

fn required_title(title: Option<String>) -> Result<String, AppError> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("title is required".to_string()))
}
