use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::Question;
use crate::errors::AppError;
use crate::interview::followup;
use crate::interview::session::{
    AnswerRecord, Candidate, InterviewSession, SessionStatus,
};
use crate::report::{self, Report};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct QuestionListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    6
}

/// GET /questions
/// Difficulty-ordered question list; `limit` is clamped to 5..=7.
pub async fn handle_list_questions(
    State(state): State<AppState>,
    Query(params): Query<QuestionListQuery>,
) -> Json<Vec<Question>> {
    Json(state.bank.ordered(params.limit).to_vec())
}

#[derive(Deserialize)]
pub struct GradeRequest {
    pub question: String,
    pub answer: String,
}

/// Response shape fixed for existing UI clients. Do not add fields.
#[derive(Serialize)]
pub struct GradeResponse {
    pub score: u8,
    pub feedback: String,
}

/// POST /grade
/// Stateless grading: forwards question + answer to the grader and returns
/// exactly `{"score": <int>, "feedback": "<string>"}`. Degraded grades are
/// indistinguishable from real zeros except by their feedback text.
pub async fn handle_grade(
    State(state): State<AppState>,
    Json(req): Json<GradeRequest>,
) -> Json<GradeResponse> {
    let grade = state.grader.grade(&req.question, &req.answer).await.into_grade();
    Json(GradeResponse {
        score: grade.score,
        feedback: grade.feedback,
    })
}

#[derive(Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub candidate: Candidate,
    /// How many bank questions this interview covers; clamped to 5..=7.
    #[serde(default = "default_limit")]
    pub question_count: usize,
}

impl Default for StartSessionRequest {
    fn default() -> Self {
        Self {
            candidate: Candidate::default(),
            question_count: default_limit(),
        }
    }
}

/// POST /api/v1/sessions
pub async fn handle_start_session(
    State(state): State<AppState>,
    body: Option<Json<StartSessionRequest>>,
) -> (StatusCode, Json<InterviewSession>) {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let total = state.bank.ordered(req.question_count).len();
    let session = state.sessions.create(req.candidate, total);
    tracing::info!(session_id = %session.id, total, "interview session started");
    (StatusCode::CREATED, Json(session))
}

#[derive(Debug, Serialize)]
pub struct CurrentQuestionResponse {
    /// `null` once the bank is exhausted.
    pub question: Option<Question>,
    pub position: usize,
    pub total_questions: usize,
    pub status: SessionStatus,
}

/// GET /api/v1/sessions/:id/question
pub async fn handle_current_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CurrentQuestionResponse>, AppError> {
    let session = state.sessions.get(id)?;
    let question = if session.position < session.total_questions {
        state.bank.question_at(session.position).cloned()
    } else {
        None
    };
    Ok(Json(CurrentQuestionResponse {
        question,
        position: session.position,
        total_questions: session.total_questions,
        status: session.status,
    }))
}

#[derive(Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub question_id: u32,
    pub score: u8,
    pub feedback: String,
    /// Suggested follow-up question; advisory, never recorded.
    pub follow_up: String,
    pub position: usize,
    pub total_questions: usize,
    pub status: SessionStatus,
}

/// POST /api/v1/sessions/:id/answers
/// Grades the current question's answer, appends the record and advances.
/// Fails with `INVALID_STATE` once the session is completed.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    let snapshot = state.sessions.get(id)?;
    if snapshot.status == SessionStatus::Completed {
        return Err(AppError::InvalidState(
            "interview already completed; no further answers accepted".to_string(),
        ));
    }
    let question = state
        .bank
        .question_at(snapshot.position)
        .ok_or_else(|| {
            AppError::InvalidState("no remaining questions for this session".to_string())
        })?
        .clone();

    // The only awaited external call; bounded by the grader's own timeout.
    let grade = state
        .grader
        .grade(&question.text, &req.answer)
        .await
        .into_grade();

    let record = AnswerRecord {
        question_id: question.id,
        question: question.text.clone(),
        level: question.level,
        answer: req.answer,
        score: grade.score,
        feedback: grade.feedback.clone(),
        answered_at: chrono::Utc::now(),
    };
    let updated = state.sessions.append(id, snapshot.position, record)?;

    Ok(Json(SubmitAnswerResponse {
        question_id: question.id,
        score: grade.score,
        feedback: grade.feedback,
        follow_up: followup::suggest(&question.text, grade.score),
        position: updated.position,
        total_questions: updated.total_questions,
        status: updated.status,
    }))
}

/// GET /api/v1/sessions/:id/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(report::assemble(&session)?))
}

/// GET /api/v1/sessions/:id/report
/// Finalizes the session and streams the rendered PDF as a download.
pub async fn handle_report_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = state.sessions.get(id)?;
    let report = report::assemble(&session)?;
    let bytes = report::pdf::render(&report).map_err(AppError::Internal)?;

    let name = if report.candidate.name.trim().is_empty() {
        "Candidate".to_string()
    } else {
        report.candidate.name.trim().replace(' ', "_")
    };
    let disposition = format!("attachment; filename=\"excel_mock_interview_report_{name}.pdf\"");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(bytes),
    )
        .into_response())
}

/// DELETE /api/v1/sessions/:id
/// Discards a session so the candidate can restart.
pub async fn handle_discard_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    state.sessions.remove(id);
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::config::Config;
    use crate::grading::{Grade, GradeOutcome, Grader};
    use crate::interview::session::SessionStore;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubGrader {
        score: u8,
    }

    #[async_trait]
    impl Grader for StubGrader {
        async fn grade(&self, _question: &str, _answer: &str) -> GradeOutcome {
            GradeOutcome::Scored(Grade {
                score: self.score,
                feedback: "Clear and correct.".to_string(),
            })
        }
    }

    fn test_state(score: u8) -> AppState {
        AppState {
            bank: Arc::new(QuestionBank::builtin()),
            grader: Arc::new(StubGrader { score }),
            sessions: SessionStore::new(),
            config: Config {
                gemini_api_key: None,
                port: 0,
                rust_log: "info".to_string(),
                grader_timeout_secs: 30,
            },
        }
    }

    async fn start(state: &AppState, count: usize) -> InterviewSession {
        let (status, Json(session)) = handle_start_session(
            State(state.clone()),
            Some(Json(StartSessionRequest {
                candidate: Candidate::default(),
                question_count: count,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        session
    }

    async fn submit(state: &AppState, id: Uuid) -> Result<SubmitAnswerResponse, AppError> {
        handle_submit_answer(
            State(state.clone()),
            Path(id),
            Json(SubmitAnswerRequest {
                answer: "An answer.".to_string(),
            }),
        )
        .await
        .map(|Json(r)| r)
    }

    #[tokio::test]
    async fn test_full_flow_all_passing_has_no_weaknesses() {
        let state = test_state(5);
        let session = start(&state, 5).await;

        for i in 0..5 {
            let resp = submit(&state, session.id).await.unwrap();
            assert_eq!(resp.score, 5);
            assert_eq!(resp.position, i + 1);
        }

        let Json(report) = handle_summary(State(state.clone()), Path(session.id))
            .await
            .unwrap();
        assert!(report.weaknesses.is_empty());
        assert_eq!(report.strengths.len(), 5);
        assert_eq!(report.average_score, 5.0);
        assert_eq!(report.rating, "Outstanding");
    }

    #[tokio::test]
    async fn test_submit_after_completion_is_invalid_state() {
        let state = test_state(3);
        let session = start(&state, 5).await;
        for _ in 0..5 {
            submit(&state, session.id).await.unwrap();
        }

        let err = submit(&state, session.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let after = state.sessions.get(session.id).unwrap();
        assert_eq!(after.records.len(), 5);
    }

    #[tokio::test]
    async fn test_summary_before_min_answered_is_invalid_state() {
        let state = test_state(4);
        let session = start(&state, 6).await;
        for _ in 0..4 {
            submit(&state, session.id).await.unwrap();
        }

        let err = handle_summary(State(state.clone()), Path(session.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_question_cursor_follows_submissions() {
        let state = test_state(2);
        let session = start(&state, 5).await;

        let Json(first) = handle_current_question(State(state.clone()), Path(session.id))
            .await
            .unwrap();
        assert_eq!(first.question.as_ref().unwrap().id, 1);

        submit(&state, session.id).await.unwrap();
        let Json(second) = handle_current_question(State(state.clone()), Path(session.id))
            .await
            .unwrap();
        assert_eq!(second.question.as_ref().unwrap().id, 2);

        for _ in 0..4 {
            submit(&state, session.id).await.unwrap();
        }
        let Json(done) = handle_current_question(State(state.clone()), Path(session.id))
            .await
            .unwrap();
        assert!(done.question.is_none());
        assert_eq!(done.status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_grade_endpoint_shape_with_fallback_grader() {
        use crate::grading::{GeminiGrader, NO_KEY_FEEDBACK};

        let mut state = test_state(0);
        state.grader = Arc::new(GeminiGrader::new(None));

        let Json(resp) = handle_grade(
            State(state),
            Json(GradeRequest {
                question: "Explain VLOOKUP".to_string(),
                answer: "Looks up a value in a table".to_string(),
            }),
        )
        .await;
        assert_eq!(resp.score, 0);
        assert_eq!(resp.feedback, NO_KEY_FEEDBACK);
    }

    #[tokio::test]
    async fn test_fallback_session_still_finalizes_with_weaknesses() {
        use crate::grading::GeminiGrader;

        let mut state = test_state(0);
        state.grader = Arc::new(GeminiGrader::new(None));
        let session = start(&state, 5).await;
        for _ in 0..5 {
            let resp = submit(&state, session.id).await.unwrap();
            assert_eq!(resp.score, 0);
        }

        let Json(report) = handle_summary(State(state.clone()), Path(session.id))
            .await
            .unwrap();
        assert!(!report.weaknesses.is_empty());
        assert!(report.strengths.is_empty());
    }

    #[tokio::test]
    async fn test_report_pdf_is_a_download() {
        let state = test_state(4);
        let session = start(&state, 5).await;
        for _ in 0..5 {
            submit(&state, session.id).await.unwrap();
        }

        let response = handle_report_pdf(State(state.clone()), Path(session.id))
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert!(response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("attachment"));
    }

    #[tokio::test]
    async fn test_discard_then_get_is_not_found() {
        let state = test_state(3);
        let session = start(&state, 5).await;

        let status = handle_discard_session(State(state.clone()), Path(session.id)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = handle_current_question(State(state), Path(session.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_questions_clamps_limit() {
        let state = test_state(3);
        let Json(qs) = handle_list_questions(
            State(state.clone()),
            Query(QuestionListQuery { limit: 100 }),
        )
        .await;
        assert_eq!(qs.len(), 7);

        let Json(qs) = handle_list_questions(State(state), Query(QuestionListQuery { limit: 1 })).await;
        assert_eq!(qs.len(), 5);
    }
}
