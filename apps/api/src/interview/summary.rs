use serde::Serialize;

use crate::interview::session::AnswerRecord;

/// Score at or above which a question counts as a strength.
pub const PASSING_SCORE: u8 = 3;

/// Aggregated view of a session's graded answers.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub average_score: f64,
    pub rating: &'static str,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub learning_path: Vec<String>,
}

/// Topic tag derived from a question's text, used to key learning-path
/// suggestions and follow-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Topic {
    Lookups,
    ConditionalFormatting,
    PivotTables,
    Macros,
    PowerQuery,
    General,
}

pub fn topic_of(question: &str) -> Topic {
    let q = question.to_lowercase();
    if q.contains("vlookup") || q.contains("xlookup") || q.contains("index-match") {
        Topic::Lookups
    } else if q.contains("conditional formatting") {
        Topic::ConditionalFormatting
    } else if q.contains("pivot") {
        Topic::PivotTables
    } else if q.contains("macro") || q.contains("vba") {
        Topic::Macros
    } else if q.contains("power query") {
        Topic::PowerQuery
    } else {
        Topic::General
    }
}

fn suggestion_for(topic: Topic) -> &'static str {
    match topic {
        Topic::Lookups => {
            "Master lookup functions: VLOOKUP, INDEX/MATCH, XLOOKUP with approximate vs exact."
        }
        Topic::ConditionalFormatting => {
            "Use formula-based Conditional Formatting and manage rule precedence."
        }
        Topic::PivotTables => {
            "Build PivotTables with slicers, top-N filters, and calculated fields."
        }
        Topic::Macros => "Automate workflows with recorded macros and simple VBA refactors.",
        Topic::PowerQuery => "Use Power Query to clean, merge, and append tables robustly.",
        Topic::General => "Start with basic Excel tutorials and practice exercises.",
    }
}

/// Overall rating bands over the 0-5 average.
pub fn overall_rating(avg_score: f64) -> &'static str {
    if avg_score >= 4.5 {
        "Outstanding"
    } else if avg_score >= 3.8 {
        "Strong"
    } else if avg_score >= 3.0 {
        "Competent"
    } else if avg_score >= 2.0 {
        "Developing"
    } else {
        "Needs Improvement"
    }
}

/// Rewrites feedback that should not reach a report verbatim: grader error
/// strings and overly harsh phrasing.
pub fn sanitize_feedback(text: &str) -> String {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();
    if trimmed.is_empty() || lowered.contains("error") {
        return "Evaluation not available due to a system error. Please retry.".to_string();
    }
    const REPLACEMENTS: [(&str, &str); 4] = [
        (
            "completely inadequate",
            "The response does not demonstrate an understanding of the concept.",
        ),
        (
            "terrible",
            "The response does not sufficiently address the question.",
        ),
        ("bad", "The response is incomplete or contains inaccuracies."),
        ("awful", "The explanation lacks clarity or correctness."),
    ];
    for (needle, replacement) in REPLACEMENTS {
        if lowered.contains(needle) {
            return replacement.to_string();
        }
    }
    trimmed.to_string()
}

/// Buckets answered questions into strengths and weaknesses by score
/// threshold, computes the average and derives a learning path from the
/// topics of the weak questions.
pub fn summarize(records: &[AnswerRecord]) -> Summary {
    if records.is_empty() {
        return Summary {
            average_score: 0.0,
            rating: overall_rating(0.0),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            learning_path: vec![suggestion_for(Topic::General).to_string()],
        };
    }

    let total: u32 = records.iter().map(|r| r.score as u32).sum();
    let average_score = round2(total as f64 / records.len() as f64);

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for record in records {
        if record.score >= PASSING_SCORE {
            strengths.push(record.question.clone());
        } else {
            weaknesses.push(record.question.clone());
        }
    }

    let mut weak_topics: Vec<Topic> = records
        .iter()
        .filter(|r| r.score < PASSING_SCORE)
        .map(|r| topic_of(&r.question))
        .collect();
    weak_topics.sort();
    weak_topics.dedup();

    let learning_path: Vec<String> = if weak_topics.is_empty() {
        vec!["Maintain your skills with periodic advanced practice exercises.".to_string()]
    } else {
        weak_topics
            .into_iter()
            .map(|t| suggestion_for(t).to_string())
            .collect()
    };

    Summary {
        average_score,
        rating: overall_rating(average_score),
        strengths,
        weaknesses,
        learning_path,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
