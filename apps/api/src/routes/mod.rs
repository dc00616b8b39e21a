pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Compatibility surface: paths and response shapes are fixed for
        // existing UI clients.
        .route("/questions", get(handlers::handle_list_questions))
        .route("/grade", post(handlers::handle_grade))
        // Session flow
        .route("/api/v1/sessions", post(handlers::handle_start_session))
        .route(
            "/api/v1/sessions/:id/question",
            get(handlers::handle_current_question),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/summary",
            get(handlers::handle_summary),
        )
        .route(
            "/api/v1/sessions/:id/report",
            get(handlers::handle_report_pdf),
        )
        .route(
            "/api/v1/sessions/:id",
            delete(handlers::handle_discard_session),
        )
        .with_state(state)
}
