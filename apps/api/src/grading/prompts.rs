use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Grader persona and rubric. The JSON-only fragment is appended so the
/// reply parses without prose stripping in the common case.
pub const GRADER_SYSTEM: &str = "You are an expert Excel interviewer. \
    Grade the candidate's answer on a 0-5 scale. \
    Be strict but fair. Consider correctness, clarity, and practical understanding. \
    Return ONLY a compact JSON object with fields 'score' (integer 0-5) and \
    'feedback' (short sentence).";

pub fn build_grading_prompt(question: &str, answer: &str) -> String {
    format!(
        "{JSON_ONLY_SYSTEM}\n\nQuestion: {question}\nAnswer: {answer}\nRespond with JSON only."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_question_and_answer() {
        let p = build_grading_prompt("What is XLOOKUP?", "A newer lookup function.");
        assert!(p.contains("Question: What is XLOOKUP?"));
        assert!(p.contains("Answer: A newer lookup function."));
    }
}
