use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{LlmClient, LlmError};

pub mod prompts;

/// Bounded scoring scale. The grader clamps whatever the model returns.
pub const MAX_SCORE: u8 = 5;

pub const NO_KEY_FEEDBACK: &str =
    "No API key provided; cannot grade. Provide GEMINI_API_KEY.";
pub const BAD_FORMAT_FEEDBACK: &str = "Grader returned unexpected format.";

/// A graded answer: bounded integer score plus a short feedback sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub score: u8,
    pub feedback: String,
}

/// Result of a grading call. `Degraded` is the deliberate fallback used
/// when the service is misconfigured or unreachable: callers get a usable
/// grade either way, and the degradation is visible in the type rather
/// than hidden behind a caught error.
#[derive(Debug, Clone)]
pub enum GradeOutcome {
    Scored(Grade),
    Degraded(Grade),
}

impl GradeOutcome {
    pub fn grade(&self) -> &Grade {
        match self {
            GradeOutcome::Scored(g) | GradeOutcome::Degraded(g) => g,
        }
    }

    pub fn into_grade(self) -> Grade {
        match self {
            GradeOutcome::Scored(g) | GradeOutcome::Degraded(g) => g,
        }
    }

    fn degraded(feedback: impl Into<String>) -> Self {
        GradeOutcome::Degraded(Grade {
            score: 0,
            feedback: feedback.into(),
        })
    }
}

/// Pluggable grading seam. Production uses `GeminiGrader`; tests swap in
/// stubs via `Arc<dyn Grader>` in `AppState`.
#[async_trait]
pub trait Grader: Send + Sync {
    /// Grades a free-text answer to a question. Never fails: any
    /// configuration or service problem yields `GradeOutcome::Degraded`.
    async fn grade(&self, question: &str, answer: &str) -> GradeOutcome;
}

/// Shape the grader prompt asks the model to return.
#[derive(Debug, Deserialize)]
struct RawGrade {
    #[serde(default)]
    score: i64,
    #[serde(default)]
    feedback: String,
}

/// Grader backed by the Gemini API. `llm` is `None` when no credential is
/// configured, which routes every call to the fallback path.
pub struct GeminiGrader {
    llm: Option<LlmClient>,
}

impl GeminiGrader {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Grader for GeminiGrader {
    async fn grade(&self, question: &str, answer: &str) -> GradeOutcome {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return GradeOutcome::degraded(NO_KEY_FEEDBACK),
        };

        let prompt = prompts::build_grading_prompt(question, answer);
        match llm
            .call_json::<RawGrade>(&prompt, prompts::GRADER_SYSTEM)
            .await
        {
            Ok(raw) => GradeOutcome::Scored(Grade {
                score: raw.score.clamp(0, MAX_SCORE as i64) as u8,
                feedback: raw.feedback,
            }),
            Err(e @ (LlmError::Parse(_) | LlmError::EmptyContent)) => {
                warn!("grader reply unusable: {e}");
                GradeOutcome::degraded(BAD_FORMAT_FEEDBACK)
            }
            Err(e) => {
                warn!("grading call failed: {e}");
                GradeOutcome::degraded(format!("Error grading: {e}"))
            }
        }
    }
}
