//! Styled text produced by the renderer
//!
//! A [`StyledText`] is a run of spans with an italic flag plus a
//! hanging-indent marker for the whole entry. Text is appended through
//! [`StyledText::push`], which cleans up the seams between affixes:
//! no leading whitespace or separators, no doubled spaces, and no period
//! right after terminal punctuation.

use serde::{Deserialize, Serialize};

/// A run of text with uniform emphasis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub italic: bool,
}

/// Rendered bibliography entry markup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledText {
    pub spans: Vec<Span>,
    pub hanging_indent: bool,
}

impl StyledText {
    pub fn new(hanging_indent: bool) -> Self {
        Self {
            spans: Vec::new(),
            hanging_indent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }

    fn last_char(&self) -> Option<char> {
        self.spans.iter().rev().find_map(|s| s.text.chars().last())
    }

    fn last_visible_char(&self) -> Option<char> {
        self.spans
            .iter()
            .rev()
            .find_map(|s| s.text.chars().rev().find(|c| !c.is_whitespace()))
    }

    pub fn push_plain(&mut self, text: &str) {
        self.push(text, false);
    }

    pub fn push_italic(&mut self, text: &str) {
        self.push(text, true);
    }

    /// Append text, repairing punctuation where it meets the buffer
    pub fn push(&mut self, text: &str, italic: bool) {
        let mut text = text;

        match self.last_visible_char() {
            None => {
                text = text.trim_start_matches(|c: char| c.is_whitespace() || is_separator(c));
            }
            Some(last) => {
                if matches!(last, '.' | '?' | '!') && text.starts_with('.') {
                    text = &text[1..];
                }
                // A separator is orphaned after an opening bracket, after a
                // finished clause ("Title. "), or right after another comma.
                // "J." followed by ", " is an initial and keeps its comma.
                let trimmed = text.trim_start();
                let ends_with_space = self.last_char().is_some_and(char::is_whitespace);
                let orphaned = trimmed.starts_with(is_separator)
                    && (matches!(last, '(' | '[')
                        || (ends_with_space && matches!(last, '.' | ',' | ';' | ':'))
                        || (last == ',' && trimmed.starts_with(',')));
                if orphaned {
                    text = trimmed
                        .trim_start_matches(is_separator)
                        .trim_start_matches(' ');
                    if !matches!(last, '(' | '[') && !ends_with_space {
                        self.append(" ", false);
                    }
                }
                if self.last_char().is_some_and(char::is_whitespace) {
                    text = text.trim_start_matches(' ');
                }
            }
        }

        if !text.is_empty() {
            self.append(text, italic);
        }
    }

    fn append(&mut self, text: &str, italic: bool) {
        let collapsed = collapse_spaces(text);
        match self.spans.last_mut() {
            Some(last) if last.italic == italic => last.text.push_str(&collapsed),
            _ => self.spans.push(Span {
                text: collapsed,
                italic,
            }),
        }
    }

    /// Trim trailing whitespace and drop empty spans
    pub fn finish(&mut self) {
        while let Some(last) = self.spans.last_mut() {
            let trimmed_len = last.text.trim_end().len();
            last.text.truncate(trimmed_len);
            if last.text.is_empty() {
                self.spans.pop();
            } else {
                break;
            }
        }
    }

    /// Plain text without emphasis
    pub fn to_plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// HTML fragment: a `csl-entry` div with `<i>` spans
    pub fn to_html(&self) -> String {
        let mut html = String::from(if self.hanging_indent {
            "<div class=\"csl-entry hanging-indent\">"
        } else {
            "<div class=\"csl-entry\">"
        });
        for span in &self.spans {
            if span.italic {
                html.push_str("<i>");
                html.push_str(&escape_html(&span.text));
                html.push_str("</i>");
            } else {
                html.push_str(&escape_html(&span.text));
            }
        }
        html.push_str("</div>");
        html
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ',' | ';' | ':' | '.')
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !previous_space {
                out.push(c);
            }
            previous_space = true;
        } else {
            out.push(c);
            previous_space = false;
        }
    }
    out
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(pieces: &[(&str, bool)]) -> StyledText {
        let mut text = StyledText::new(true);
        for (piece, italic) in pieces {
            text.push(piece, *italic);
        }
        text.finish();
        text
    }

    #[test]
    fn test_period_after_initial_is_not_doubled() {
        let text = build(&[("Smith, J.", false), (". ", false), ("Title", false)]);
        assert_eq!(text.to_plain(), "Smith, J. Title");
    }

    #[test]
    fn test_question_mark_swallows_period() {
        let text = build(&[("Why now?", false), (". ", false), ("Journal", true)]);
        assert_eq!(text.to_plain(), "Why now? Journal");
    }

    #[test]
    fn test_leading_separators_are_dropped() {
        let text = build(&[(", 12", false), ("(3)", false)]);
        assert_eq!(text.to_plain(), "12(3)");
    }

    #[test]
    fn test_orphaned_separator_after_period() {
        let text = build(&[("Title. ", false), (", 12", false)]);
        assert_eq!(text.to_plain(), "Title. 12");
    }

    #[test]
    fn test_spaces_collapse() {
        let text = build(&[("Title ", false), (" ", false), (" Journal", false)]);
        assert_eq!(text.to_plain(), "Title Journal");
    }

    #[test]
    fn test_spans_merge_by_emphasis() {
        let text = build(&[("A ", false), ("B", true), (", ", true), ("C", false)]);
        assert_eq!(text.spans.len(), 3);
        assert_eq!(text.to_html(), "<div class=\"csl-entry hanging-indent\">A <i>B, </i>C</div>");
    }

    #[test]
    fn test_html_escaping() {
        let mut text = StyledText::new(false);
        text.push_plain("Tom & Jerry <3");
        assert_eq!(text.to_html(), "<div class=\"csl-entry\">Tom &amp; Jerry &lt;3</div>");
    }
}
