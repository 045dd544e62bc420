pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers as advisor;
use crate::comments::handlers as comments;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Advisory flow
        .route("/api/v1/analyze", post(advisor::handle_analyze))
        .route("/api/v1/details", post(advisor::handle_details))
        .route("/api/v1/pathway", post(advisor::handle_pathway))
        .route("/api/v1/stayahead", post(advisor::handle_stay_ahead))
        // Community comment board
        .route(
            "/api/v1/comments",
            get(comments::handle_list_comments).post(comments::handle_post_comment),
        )
        .with_state(state)
}
