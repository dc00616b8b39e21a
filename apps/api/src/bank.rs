use serde::{Deserialize, Serialize};

/// Difficulty tier of an interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// A single interview question. Immutable, defined at process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub level: Difficulty,
    pub text: String,
}

/// The static ordered sequence of interview questions. No runtime mutation.
#[derive(Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// The built-in Excel interview set, in difficulty order.
    pub fn builtin() -> Self {
        let q = |id: u32, level: Difficulty, text: &str| Question {
            id,
            level,
            text: text.to_string(),
        };
        Self {
            questions: vec![
                q(
                    1,
                    Difficulty::Basic,
                    "Can you explain how VLOOKUP works and give a simple example?",
                ),
                q(
                    2,
                    Difficulty::Basic,
                    "How can you use Conditional Formatting to highlight duplicate values?",
                ),
                q(
                    3,
                    Difficulty::Intermediate,
                    "What is the difference between VLOOKUP and INDEX-MATCH?",
                ),
                q(
                    4,
                    Difficulty::Intermediate,
                    "How would you create a PivotTable to summarize monthly sales by product?",
                ),
                q(
                    5,
                    Difficulty::Advanced,
                    "What are Excel Macros, and when would you use them?",
                ),
                q(
                    6,
                    Difficulty::Advanced,
                    "Describe how you would use Power Query to clean and merge data from multiple sources.",
                ),
                q(
                    7,
                    Difficulty::Advanced,
                    "Explain how to use XLOOKUP and its advantages over VLOOKUP.",
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at a session position, or `None` once the bank is exhausted.
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Difficulty-ordered prefix of the bank. The requested limit is
    /// clamped to 5..=7 so an interview always has enough material to
    /// finalize and never runs past the bank.
    pub fn ordered(&self, limit: usize) -> &[Question] {
        let take = limit.clamp(5, 7).min(self.questions.len());
        &self.questions[..take]
    }

    /// Looks a question up by its stable id.
    pub fn by_id(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}
