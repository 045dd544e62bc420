use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::comments::canonical::canonicalize;
use crate::comments::matching::find_matches;
use crate::comments::models::{CommentRecord, StoredComment, ANONYMOUS_NAME};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostCommentResponse {
    pub ok: bool,
    pub comment: CommentRecord,
}

/// GET /api/v1/comments
///
/// Without `role`: the full board, newest first. With `role`: comments
/// ranked by relevance to the canonicalized role, falling back to a single
/// generated seed comment (never persisted) when nothing matches.
pub async fn handle_list_comments(
    State(state): State<AppState>,
    Query(params): Query<CommentsQuery>,
) -> Result<Json<CommentsResponse>, AppError> {
    let stored = state.store.read().await?;
    let mut records: Vec<CommentRecord> = stored
        .into_iter()
        .filter_map(StoredComment::into_record)
        .collect();

    let role = params
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let comments = match role {
        Some(role) => {
            let now_ms = Utc::now().timestamp_millis();
            find_matches(role, &records, state.llm.as_ref(), now_ms).await
        }
        None => {
            records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            records
        }
    };

    Ok(Json(CommentsResponse { comments }))
}

/// POST /api/v1/comments
///
/// Validates, canonicalizes the role (LLM first, heuristic fallback),
/// appends the new record, and replaces the persisted collection.
pub async fn handle_post_comment(
    State(state): State<AppState>,
    Json(req): Json<NewCommentRequest>,
) -> Result<Json<PostCommentResponse>, AppError> {
    let text = required_field(req.text, "text")?;
    let role = required_field(req.role, "role")?;
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| ANONYMOUS_NAME.to_string());

    let (canonical, strategy) = canonicalize(&role, state.llm.as_ref()).await;
    debug!("canonicalized {role:?} -> {:?} via {strategy:?}", canonical.canonical);

    let record = CommentRecord {
        id: Uuid::new_v4().to_string(),
        name,
        text,
        role,
        canonical_role: canonical.canonical,
        aliases: canonical.aliases,
        tokens: canonical.tokens,
        timestamp: Utc::now().timestamp_millis(),
        auto: false,
    };

    let mut stored = state.store.read().await?;
    stored.push(StoredComment::from(&record));
    state.store.replace(stored).await?;

    Ok(Json(PostCommentResponse {
        ok: true,
        comment: record,
    }))
}

fn required_field(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}
