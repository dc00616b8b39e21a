use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::{AnswerRecord, Candidate, InterviewSession, MIN_ANSWERED};
use crate::interview::summary::summarize;

pub mod pdf;

/// The finalized interview document: derived from a session once, read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub session_id: Uuid,
    pub candidate: Candidate,
    pub started_at: DateTime<Utc>,
    pub answered: usize,
    pub average_score: f64,
    pub rating: String,
    pub breakdown: Vec<AnswerRecord>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub learning_path: Vec<String>,
}

/// Aggregates a session into a `Report`. Rejects sessions with fewer than
/// `MIN_ANSWERED` graded answers.
pub fn assemble(session: &InterviewSession) -> Result<Report, AppError> {
    if session.answered() < MIN_ANSWERED {
        return Err(AppError::InvalidState(format!(
            "at least {MIN_ANSWERED} answered questions are required to finalize; got {}",
            session.answered()
        )));
    }

    let summary = summarize(&session.records);
    Ok(Report {
        session_id: session.id,
        candidate: session.candidate.clone(),
        started_at: session.started_at,
        answered: session.answered(),
        average_score: summary.average_score,
        rating: summary.rating.to_string(),
        breakdown: session.records.clone(),
        strengths: summary.strengths,
        weaknesses: summary.weaknesses,
        learning_path: summary.learning_path,
    })
}
