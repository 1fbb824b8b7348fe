//! Inline emphasis markup.
//!
//! Narrative lines use paired `**` markers for emphasis:
//! `"Work on **strategy** first"` yields three spans, the middle one
//! emphasized. An opening marker without a partner is kept as literal text.

use serde::{Deserialize, Serialize};

const MARKER: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub emphasis: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: true,
        }
    }
}

/// Split a line into plain and emphasized spans. Empty spans are dropped.
pub fn parse(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find(MARKER) {
        let after_open = &rest[open + MARKER.len()..];
        let Some(close) = after_open.find(MARKER) else {
            break;
        };
        push(&mut spans, &rest[..open], false);
        push(&mut spans, &after_open[..close], true);
        rest = &after_open[close + MARKER.len()..];
    }
    push(&mut spans, rest, false);
    spans
}

fn push(spans: &mut Vec<Span>, text: &str, emphasis: bool) {
    if text.is_empty() {
        return;
    }
    // merge adjacent plain text so an unmatched marker stays one span
    if let Some(last) = spans.last_mut() {
        if last.emphasis == emphasis && !emphasis {
            last.text.push_str(text);
            return;
        }
    }
    spans.push(Span {
        text: text.to_string(),
        emphasis,
    });
}

/// Drop a leading `"<digits>."` list number and the whitespace after it.
pub fn strip_list_number(line: &str) -> &str {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Concatenate span text, dropping the markup.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_is_one_span() {
        assert_eq!(parse("hello world"), vec![Span::plain("hello world")]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn paired_markers_emphasize() {
        assert_eq!(
            parse("Work on **strategy** and **tools** now"),
            vec![
                Span::plain("Work on "),
                Span::emphasized("strategy"),
                Span::plain(" and "),
                Span::emphasized("tools"),
                Span::plain(" now"),
            ]
        );
    }

    #[test]
    fn leading_emphasis() {
        assert_eq!(
            parse("**Start small:** automate one task."),
            vec![
                Span::emphasized("Start small:"),
                Span::plain(" automate one task."),
            ]
        );
    }

    #[test]
    fn unmatched_marker_is_literal() {
        assert_eq!(
            parse("a **b** c **d"),
            vec![Span::plain("a "), Span::emphasized("b"), Span::plain(" c **d")]
        );
    }

    #[test]
    fn empty_emphasis_is_dropped() {
        assert_eq!(parse("x****y"), vec![Span::plain("xy")]);
    }

    #[test]
    fn strips_list_numbers() {
        assert_eq!(strip_list_number("1. First"), "First");
        assert_eq!(strip_list_number("12.   Twelfth"), "Twelfth");
        assert_eq!(strip_list_number("3 items"), "3 items");
        assert_eq!(strip_list_number("No number"), "No number");
    }

    #[test]
    fn plain_text_drops_markers() {
        assert_eq!(plain_text(&parse("a **b** c")), "a b c");
    }
}
