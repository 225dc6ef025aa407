//! Lightweight markup translation into a renderer-agnostic rich text form
//!
//! Only two conventions are recognised: `**bold**` spans and literal newlines.
//! Everything else (list dashes, `#` headers, links) passes through as text.

use serde::{Deserialize, Serialize};

/// An RGB colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// A run of text sharing one style. `color: None` inherits the block colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    Text(Span),
    LineBreak,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    inlines: Vec<Inline>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        let mut rich = Self::new();
        rich.push_span(text, false, None);
        rich
    }

    pub fn bold(text: impl Into<String>) -> Self {
        let mut rich = Self::new();
        rich.push_span(text, true, None);
        rich
    }

    /// Append a span, merging it into the previous one when the style matches.
    /// Empty text is dropped.
    pub fn push_span(&mut self, text: impl Into<String>, bold: bool, color: Option<Color>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Text(last)) = self.inlines.last_mut() {
            if last.bold == bold && last.color == color {
                last.text.push_str(&text);
                return;
            }
        }
        self.inlines.push(Inline::Text(Span { text, bold, color }));
    }

    pub fn push_break(&mut self) {
        self.inlines.push(Inline::LineBreak);
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }

    /// The text content with styling dropped and breaks as `\n`
    pub fn to_plain_string(&self) -> String {
        self.inlines
            .iter()
            .map(|inline| match inline {
                Inline::Text(span) => span.text.as_str(),
                Inline::LineBreak => "\n",
            })
            .collect()
    }
}

/// Translate `**bold**` markers and newlines into rich text.
///
/// A marker pairs with the nearest following marker on the same line; a marker
/// with no partner on its line stays literal.
pub fn translate(text: &str) -> RichText {
    let mut rich = RichText::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            rich.push_break();
        }
        scan_line(line.strip_suffix('\r').unwrap_or(line), &mut rich);
    }
    rich
}

fn scan_line(line: &str, rich: &mut RichText) {
    let mut rest = line;
    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        rich.push_span(&rest[..open], false, None);
        rich.push_span(&after_open[..close], true, None);
        rest = &after_open[close + 2..];
    }
    rich.push_span(rest, false, None);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str, bold: bool) -> Inline {
        Inline::Text(Span {
            text: s.to_string(),
            bold,
            color: None,
        })
    }

    #[test]
    fn test_plain_text_unchanged() {
        let input = "Built distributed systems - 5 years, *not* bold";
        assert_eq!(translate(input), RichText::plain(input));
        assert_eq!(translate(input).to_plain_string(), input);
    }

    #[test]
    fn test_bold_and_line_break() {
        let rich = translate("**A** and\nB");
        assert_eq!(
            rich.inlines(),
            &[text("A", true), text(" and", false), Inline::LineBreak, text("B", false)]
        );
    }

    #[test]
    fn test_non_greedy_pairing() {
        let rich = translate("**one** mid **two**");
        assert_eq!(
            rich.inlines(),
            &[text("one", true), text(" mid ", false), text("two", true)]
        );
    }

    #[test]
    fn test_unmatched_marker_is_literal() {
        let rich = translate("**open ended");
        assert_eq!(rich.inlines(), &[text("**open ended", false)]);

        let rich = translate("**a** then **dangling");
        assert_eq!(
            rich.inlines(),
            &[text("a", true), text(" then **dangling", false)]
        );
    }

    #[test]
    fn test_bold_does_not_cross_lines() {
        let rich = translate("**start\nend**");
        assert_eq!(
            rich.inlines(),
            &[text("**start", false), Inline::LineBreak, text("end**", false)]
        );
    }

    #[test]
    fn test_empty_bold_and_empty_input() {
        assert!(translate("").is_empty());
        assert_eq!(translate("a****b").inlines(), &[text("ab", false)]);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let rich = translate("one\r\n\r\ntwo");
        assert_eq!(
            rich.inlines(),
            &[
                text("one", false),
                Inline::LineBreak,
                Inline::LineBreak,
                text("two", false)
            ]
        );
    }

    #[test]
    fn test_other_markup_passes_through() {
        let input = "- item [link](http://x) # heading";
        assert_eq!(translate(input).to_plain_string(), input);
    }
}
