use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::interview::summary::sanitize_feedback;
use crate::report::Report;

// A4 portrait, in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 36.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 9.0;
const LINE_FACTOR: f32 = 1.4;
/// Rough Helvetica average glyph width as a fraction of the font size,
/// used for character-count word wrapping.
const AVG_CHAR_WIDTH: f32 = 0.5;

const ANSWER_EXCERPT_CHARS: usize = 300;
const EMPTY_LIST_PLACEHOLDER: &str = "None noted.";

/// One laid-out line of text at the left margin.
struct Line {
    text: String,
    size: f32,
    bold: bool,
    gap_before: f32,
}

/// Renders a finalized report into PDF bytes.
///
/// Deterministic: the output is a pure function of the `Report` (the only
/// timestamps printed come from the report itself). Arbitrarily long answer
/// text is wrapped and excerpted, never an error.
pub fn render(report: &Report) -> Result<Vec<u8>> {
    let lines = build_story(report);
    let pages = paginate(&lines);
    write_document(&pages)
}

fn build_story(report: &Report) -> Vec<Line> {
    let mut story = Story::default();

    let name = if report.candidate.name.trim().is_empty() {
        "Candidate"
    } else {
        report.candidate.name.trim()
    };
    story.title(format!("Excel Mock Interview Report - {name}"));

    story.heading("Candidate Information");
    story.body(format!("Name: {}", or_na(&report.candidate.name)));
    story.body(format!("Email: {}", or_na(&report.candidate.email)));
    story.body(format!("Target Role: {}", or_na(&report.candidate.role)));
    story.body(format!("Experience: {} years", or_na(&report.candidate.experience)));
    story.body(format!(
        "Date: {}",
        report.started_at.format("%Y-%m-%d %H:%M")
    ));

    story.heading("Summary");
    story.body(format!("Average Score (0-5): {:.2}", report.average_score));
    story.body(format!("Overall Rating: {}", report.rating));
    story.body(format!("Questions Answered: {}", report.answered));

    story.heading("Per-Question Evaluation");
    if report.breakdown.is_empty() {
        story.body(EMPTY_LIST_PLACEHOLDER);
    }
    for (i, rec) in report.breakdown.iter().enumerate() {
        story.subheading(format!(
            "Q{} ({}) - Score {}/5",
            i + 1,
            rec.level.as_str(),
            rec.score
        ));
        story.body(rec.question.clone());
        story.body(format!("Answer: {}", excerpt(&rec.answer, ANSWER_EXCERPT_CHARS)));
        story.body(format!("Feedback: {}", sanitize_feedback(&rec.feedback)));
    }

    story.heading("Strengths");
    story.bullets(&report.strengths);

    story.heading("Areas to Improve");
    // Weakness entries carry raw feedback-adjacent text; keep them neutral.
    let cleaned: Vec<String> = report.weaknesses.iter().map(|w| sanitize_feedback(w)).collect();
    story.bullets(&cleaned);

    story.heading("Suggested Learning Path");
    story.bullets(&report.learning_path);

    story.lines
}

#[derive(Default)]
struct Story {
    lines: Vec<Line>,
}

impl Story {
    fn push(&mut self, text: impl Into<String>, size: f32, bold: bool, gap_before: f32) {
        let max_chars = chars_per_line(size);
        for (i, wrapped) in wrap_text(&ascii_text(&text.into()), max_chars)
            .into_iter()
            .enumerate()
        {
            self.lines.push(Line {
                text: wrapped,
                size,
                bold,
                gap_before: if i == 0 { gap_before } else { 0.0 },
            });
        }
    }

    fn title(&mut self, text: impl Into<String>) {
        self.push(text, TITLE_SIZE, true, 0.0);
    }

    fn heading(&mut self, text: impl Into<String>) {
        self.push(text, HEADING_SIZE, true, 12.0);
    }

    fn subheading(&mut self, text: impl Into<String>) {
        self.push(text, BODY_SIZE, true, 6.0);
    }

    fn body(&mut self, text: impl Into<String>) {
        self.push(text, BODY_SIZE, false, 2.0);
    }

    fn bullets(&mut self, items: &[String]) {
        if items.is_empty() {
            self.body(EMPTY_LIST_PLACEHOLDER);
            return;
        }
        for item in items {
            self.body(format!("- {item}"));
        }
    }
}

fn or_na(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "N/A"
    } else {
        trimmed
    }
}

fn chars_per_line(size: f32) -> usize {
    (((PAGE_WIDTH - 2.0 * MARGIN) / (AVG_CHAR_WIDTH * size)) as usize).max(1)
}

/// Truncates long answer text to a readable excerpt.
fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(no answer given)".to_string();
    }
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

/// Greedy word wrap by character budget. Words longer than a full line are
/// hard-broken so no input can overflow the page.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word = word;
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(max_chars);
            lines.push(head.to_string());
            word = tail;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Maps text onto what the built-in Helvetica encoding can show: common
/// typographic characters are folded to ASCII, the rest become '?'.
fn ascii_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '-',
            c if c.is_ascii_control() => ' ',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

/// Splits lines into pages of content-stream operations, breaking at the
/// bottom margin.
fn paginate(lines: &[Line]) -> Vec<Vec<Operation>> {
    let mut pages: Vec<Vec<Operation>> = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        let advance = line.gap_before + line.size * LINE_FACTOR;
        if y - advance < MARGIN {
            pages.push(std::mem::take(&mut ops));
            y = PAGE_HEIGHT - MARGIN;
        }
        y -= advance;

        let font = if line.bold { "F2" } else { "F1" };
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), line.size.into()]));
        ops.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.clone())],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    pages.push(ops);
    pages
}

fn write_document(pages: &[Vec<Operation>]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_regular,
            "F2" => font_bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for ops in pages {
        let content = Content {
            operations: ops.clone(),
        };
        let stream_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => stream_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Difficulty;
    use crate::interview::session::{AnswerRecord, Candidate};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn fixed_report(answer: &str) -> Report {
        let answered_at = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let breakdown: Vec<AnswerRecord> = (1..=5)
            .map(|i| AnswerRecord {
                question_id: i,
                question: format!("Question number {i} about Excel?"),
                level: Difficulty::Basic,
                answer: answer.to_string(),
                score: (i % 6) as u8,
                feedback: "Mostly clear, missing one detail.".to_string(),
                answered_at,
            })
            .collect();
        Report {
            session_id: Uuid::nil(),
            candidate: Candidate {
                name: "Alex Johnson".to_string(),
                email: "alex.j@example.com".to_string(),
                role: "Senior Excel Analyst".to_string(),
                experience: "5".to_string(),
            },
            started_at: answered_at,
            answered: breakdown.len(),
            average_score: 3.0,
            rating: "Competent".to_string(),
            breakdown,
            strengths: vec!["Good understanding of lookups".to_string()],
            weaknesses: vec!["PivotTable filtering needs practice".to_string()],
            learning_path: vec![
                "Build PivotTables with slicers, top-N filters, and calculated fields.".to_string(),
            ],
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = fixed_report("A reasonable answer covering the basics.");
        let a = render(&report).unwrap();
        let b = render(&report).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render(&fixed_report("answer")).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_survives_very_long_answers() {
        let long = "supercalifragilistic ".repeat(2000) + &"x".repeat(5000);
        let bytes = render(&fixed_report(&long)).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_render_handles_empty_lists_with_placeholders() {
        let mut report = fixed_report("answer");
        report.strengths.clear();
        report.weaknesses.clear();
        report.learning_path.clear();
        assert!(render(&report).is_ok());
    }

    #[test]
    fn test_wrap_text_breaks_long_words() {
        let lines = wrap_text(&"a".repeat(25), 10);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.len() <= 10));
    }

    #[test]
    fn test_wrap_text_wraps_at_word_boundaries() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_text_empty_input() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_excerpt_truncates() {
        let e = excerpt(&"word ".repeat(200), 20);
        assert!(e.ends_with("..."));
        assert_eq!(e.chars().count(), 23);
    }

    #[test]
    fn test_ascii_text_substitution() {
        assert_eq!(ascii_text("\u{201C}caf\u{00E9}\u{201D} \u{2014} ok"), "\"caf?\" - ok");
    }
}
