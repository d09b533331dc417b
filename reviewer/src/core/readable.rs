//! Plain-text rendering of a run's reviews for human reading.

use crate::core::case_format::banner;
use crate::core::types::ReviewRecord;

/// Render one section per record, in record order.
///
/// Each section holds the optional case text, a `review-{task_id}` banner,
/// the free-text review wrapped to `width` columns and the boolean answers.
pub fn render_reviews(records: &[ReviewRecord], include_case: bool, width: usize) -> String {
    let mut lines = Vec::new();
    for record in records {
        if include_case {
            lines.push(String::new());
            lines.push(record.case.trim_end().to_string());
        }
        lines.push(String::new());
        lines.push(banner(&format!("review-{}", record.task_id)));
        lines.extend(wrap_text(&record.content.review, width));
        for (key, value) in record.content.flags() {
            lines.push(format!("{key}: {value}"));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Greedy word wrap on whitespace.
///
/// Existing line breaks are kept. A word longer than `width` gets a line of
/// its own rather than being split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}
