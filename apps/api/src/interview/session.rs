use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::Difficulty;
use crate::errors::AppError;

/// Fewest answered questions required before a session can be finalized.
pub const MIN_ANSWERED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// Who is being interviewed. Collected at session start; informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_experience")]
    pub experience: String,
}

impl Default for Candidate {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: default_role(),
            experience: default_experience(),
        }
    }
}

fn default_role() -> String {
    "Excel Analyst".to_string()
}

fn default_experience() -> String {
    "0".to_string()
}

/// One graded answer. Created once per submission, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerRecord {
    pub question_id: u32,
    pub question: String,
    pub level: Difficulty,
    pub answer: String,
    pub score: u8,
    pub feedback: String,
    pub answered_at: DateTime<Utc>,
}

/// One candidate's ordered progress through the question bank.
///
/// Invariant: `records.len() == position <= total_questions`, and records
/// correspond 1:1, in order, with the questions consumed so far.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub candidate: Candidate,
    pub started_at: DateTime<Utc>,
    pub total_questions: usize,
    pub position: usize,
    pub status: SessionStatus,
    pub records: Vec<AnswerRecord>,
}

impl InterviewSession {
    fn new(candidate: Candidate, total_questions: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate,
            started_at: Utc::now(),
            total_questions,
            position: 0,
            status: SessionStatus::InProgress,
            records: Vec::new(),
        }
    }

    pub fn answered(&self) -> usize {
        self.records.len()
    }
}

/// In-memory session map. The lock protects the map only; callers must
/// serialize calls per session. `append` validates the expected position,
/// so an interleaved submit is rejected rather than appended out of order.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, InterviewSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, InterviewSession>> {
        // A poisoned lock can only mean a panic mid-read elsewhere; the map
        // itself is still consistent, so recover it.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, InterviewSession>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts a new session and returns its initial snapshot.
    pub fn create(&self, candidate: Candidate, total_questions: usize) -> InterviewSession {
        let session = InterviewSession::new(candidate, total_questions);
        self.write().insert(session.id, session.clone());
        session
    }

    /// Snapshot of a session by id.
    pub fn get(&self, id: Uuid) -> Result<InterviewSession, AppError> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Appends a graded record at `expected_position`, advances the cursor
    /// and flips the session to `Completed` once the bank is exhausted.
    /// Rejects the append (and changes nothing) if the session is already
    /// completed or has moved past `expected_position`.
    pub fn append(
        &self,
        id: Uuid,
        expected_position: usize,
        record: AnswerRecord,
    ) -> Result<InterviewSession, AppError> {
        let mut map = self.write();
        let session = map
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

        if session.status == SessionStatus::Completed {
            return Err(AppError::InvalidState(
                "interview already completed; no further answers accepted".to_string(),
            ));
        }
        if session.position != expected_position {
            return Err(AppError::InvalidState(format!(
                "answer submitted for question {} but session is at question {}",
                expected_position + 1,
                session.position + 1
            )));
        }

        session.records.push(record);
        session.position += 1;
        if session.position >= session.total_questions {
            session.status = SessionStatus::Completed;
        }
        Ok(session.clone())
    }

    /// Discards a session. Idempotent: removing an unknown id is not an error.
    pub fn remove(&self, id: Uuid) {
        self.write().remove(&id);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(question_id: u32, score: u8) -> AnswerRecord {
        AnswerRecord {
            question_id,
            question: format!("Question {question_id}"),
            level: Difficulty::Basic,
            answer: "An answer.".to_string(),
            score,
            feedback: "Clear and correct.".to_string(),
            answered_at: Utc::now(),
        }
    }

    fn run_to_completion(store: &SessionStore, id: Uuid, total: usize) {
        for i in 0..total {
            store.append(id, i, record(i as u32 + 1, 4)).unwrap();
        }
    }

    #[test]
    fn test_append_advances_and_completes() {
        let store = SessionStore::new();
        let session = store.create(Candidate::default(), 5);
        run_to_completion(&store, session.id, 5);

        let done = store.get(session.id).unwrap();
        assert_eq!(done.status, SessionStatus::Completed);
        assert_eq!(done.position, 5);
        assert_eq!(done.records.len(), 5);
    }

    #[test]
    fn test_submit_after_completion_fails_and_appends_nothing() {
        let store = SessionStore::new();
        let session = store.create(Candidate::default(), 5);
        run_to_completion(&store, session.id, 5);

        let err = store.append(session.id, 5, record(6, 4)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let after = store.get(session.id).unwrap();
        assert_eq!(after.records.len(), 5);
    }

    #[test]
    fn test_records_never_exceed_total() {
        let store = SessionStore::new();
        let session = store.create(Candidate::default(), 3);
        for i in 0..10 {
            let _ = store.append(session.id, i, record(i as u32 + 1, 2));
        }
        let after = store.get(session.id).unwrap();
        assert!(after.records.len() <= after.total_questions);
        assert_eq!(after.records.len(), after.position);
    }

    #[test]
    fn test_out_of_order_append_rejected() {
        let store = SessionStore::new();
        let session = store.create(Candidate::default(), 5);
        store.append(session.id, 0, record(1, 3)).unwrap();

        // A stale caller re-submitting position 0 must not reorder records.
        let err = store.append(session.id, 0, record(1, 3)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(store.get(session.id).unwrap().records.len(), 1);
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let store = SessionStore::new();
        let err = store.get(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = SessionStore::new();
        let session = store.create(Candidate::default(), 5);
        store.remove(session.id);
        store.remove(session.id);
        assert!(store.get(session.id).is_err());
    }
}
