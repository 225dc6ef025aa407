//! Page layout: places content blocks onto fixed-size pages as positioned text runs.
//!
//! All coordinates are in points. `y` of a fragment is the text baseline measured
//! from the bottom edge of the page, which is what the PDF writer expects.

use crate::error::{Result, ResumeBuilderError};
use crate::output::metrics::{char_width, face_for, sanitize_char, text_width, FontFace};
use crate::processing::blocks::{Alignment, ContentBlock, TableCell, TextStyle};
use crate::processing::markup::{Color, Inline, RichText};
use unicode_segmentation::UnicodeSegmentation;

/// Default cell padding, matching a plain table in most layout engines
const CELL_PADDING_X: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    /// A4 with one-inch margins on every side
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_left: 72.0,
            margin_right: 72.0,
            margin_top: 72.0,
            margin_bottom: 72.0,
        }
    }

    pub fn frame_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn frame_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub face: FontFace,
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub fragments: Vec<PositionedText>,
}

impl PageLayout {
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A styled piece of a wrapped line
#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    face: FontFace,
    color: Color,
    width: f32,
}

#[derive(Debug, Clone, Default)]
struct Line {
    runs: Vec<Run>,
    width: f32,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn push(&mut self, run: Run) {
        self.width += run.width;
        if let Some(last) = self.runs.last_mut() {
            if last.face == run.face && last.color == run.color {
                last.text.push_str(&run.text);
                last.width += run.width;
                return;
            }
        }
        self.runs.push(run);
    }
}

enum Token {
    Word(Vec<Run>),
    Space,
    Break,
}

fn tokenize(text: &RichText, style: &TextStyle) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<Run> = Vec::new();

    fn flush(word: &mut Vec<Run>, tokens: &mut Vec<Token>) {
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(word)));
        }
    }

    for inline in text.inlines() {
        match inline {
            Inline::LineBreak => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::Break);
            }
            Inline::Text(span) => {
                let color = span.color.unwrap_or(style.color);
                for c in span.text.chars().filter_map(sanitize_char) {
                    if c.is_whitespace() {
                        flush(&mut word, &mut tokens);
                        if !matches!(tokens.last(), Some(Token::Space)) {
                            tokens.push(Token::Space);
                        }
                        continue;
                    }
                    let face = face_for(c, span.bold);
                    let width = char_width(face, c) * style.font_size;
                    match word.last_mut() {
                        Some(run) if run.face == face && run.color == color => {
                            run.text.push(c);
                            run.width += width;
                        }
                        _ => word.push(Run {
                            text: c.to_string(),
                            face,
                            color,
                            width,
                        }),
                    }
                }
            }
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

/// Greedy word wrap into lines no wider than `max_width`
fn wrap(text: &RichText, style: &TextStyle, max_width: f32) -> Vec<Line> {
    let space_width = text_width(FontFace::Regular, " ", style.font_size);
    let mut lines = Vec::new();
    let mut current = Line::default();
    let mut pending_space = false;

    for token in tokenize(text, style) {
        match token {
            Token::Space => pending_space = !current.is_empty(),
            Token::Break => {
                lines.push(std::mem::take(&mut current));
                pending_space = false;
            }
            Token::Word(runs) => {
                let word_width: f32 = runs.iter().map(|r| r.width).sum();
                let gap = if pending_space { space_width } else { 0.0 };
                pending_space = false;

                if !current.is_empty() && current.width + gap + word_width > max_width {
                    lines.push(std::mem::take(&mut current));
                } else if !current.is_empty() && gap > 0.0 {
                    let color = current.runs.last().map(|r| r.color).unwrap_or(style.color);
                    let face = current.runs.last().map(|r| r.face).unwrap_or(FontFace::Regular);
                    let face = if face == FontFace::Symbol { FontFace::Regular } else { face };
                    current.push(Run {
                        text: " ".to_string(),
                        face,
                        color,
                        width: gap,
                    });
                }

                if word_width > max_width {
                    break_long_word(runs, style, max_width, &mut current, &mut lines);
                } else {
                    for run in runs {
                        current.push(run);
                    }
                }
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a word wider than the line on grapheme boundaries
fn break_long_word(
    runs: Vec<Run>,
    style: &TextStyle,
    max_width: f32,
    current: &mut Line,
    lines: &mut Vec<Line>,
) {
    for run in runs {
        for grapheme in run.text.graphemes(true) {
            let width = text_width(run.face, grapheme, style.font_size);
            if !current.is_empty() && current.width + width > max_width {
                lines.push(std::mem::take(current));
            }
            current.push(Run {
                text: grapheme.to_string(),
                face: run.face,
                color: run.color,
                width,
            });
        }
    }
}

fn align_offset(alignment: Alignment, available: f32, used: f32) -> f32 {
    let slack = (available - used).max(0.0);
    match alignment {
        Alignment::Left => 0.0,
        Alignment::Center => slack / 2.0,
        Alignment::Right => slack,
    }
}

fn check_dimension(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ResumeBuilderError::Render(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_style(style: &TextStyle) -> Result<()> {
    check_dimension("font size", style.font_size)?;
    check_dimension("leading", style.leading)?;
    check_dimension("space after", style.space_after)?;
    if style.font_size == 0.0 || style.leading == 0.0 {
        return Err(ResumeBuilderError::Render(
            "font size and leading must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Distance from the top of a line box to its baseline
fn baseline_offset(style: &TextStyle) -> f32 {
    (style.leading - style.font_size) / 2.0 + style.font_size * 0.8
}

struct Layouter<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<PageLayout>,
    /// Distance already consumed below the top margin of the current page
    cursor: f32,
}

impl<'a> Layouter<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![PageLayout::default()],
            cursor: 0.0,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.cursor = 0.0;
    }

    /// Start a new page unless `height` still fits on this one
    fn reserve(&mut self, height: f32) -> Result<()> {
        if height > self.geometry.frame_height() {
            return Err(ResumeBuilderError::Render(format!(
                "content of height {:.1}pt does not fit on a page ({:.1}pt available)",
                height,
                self.geometry.frame_height()
            )));
        }
        if self.cursor > 0.0 && self.cursor + height > self.geometry.frame_height() {
            self.new_page();
        }
        Ok(())
    }

    fn page_mut(&mut self) -> &mut PageLayout {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Place a line whose box top sits `top` points below the top margin
    fn place_line(&mut self, line: Line, x: f32, top: f32, style: &TextStyle) {
        let baseline = self.geometry.height - self.geometry.margin_top - top - baseline_offset(style);
        let mut x = x;
        for run in line.runs {
            let width = run.width;
            self.page_mut().fragments.push(PositionedText {
                text: run.text,
                x,
                y: baseline,
                font_size: style.font_size,
                face: run.face,
                color: run.color,
            });
            x += width;
        }
    }

    fn paragraph(&mut self, text: &RichText, style: &TextStyle) -> Result<()> {
        check_style(style)?;
        if text.is_empty() {
            return Ok(());
        }
        let width = self.geometry.frame_width();
        for line in wrap(text, style, width) {
            self.reserve(style.leading)?;
            let x = self.geometry.margin_left + align_offset(style.alignment, width, line.width);
            let top = self.cursor;
            self.place_line(line, x, top, style);
            self.cursor += style.leading;
        }
        self.cursor += style.space_after;
        Ok(())
    }

    fn spacer(&mut self, height: f32) -> Result<()> {
        check_dimension("spacer height", height)?;
        if self.cursor + height > self.geometry.frame_height() {
            self.new_page();
        } else {
            self.cursor += height;
        }
        Ok(())
    }

    fn table(
        &mut self,
        rows: &[Vec<TableCell>],
        column_widths: &[f32],
        style: &TextStyle,
        padding_top: f32,
        padding_bottom: f32,
    ) -> Result<()> {
        check_style(style)?;
        check_dimension("padding", padding_top)?;
        check_dimension("padding", padding_bottom)?;
        for width in column_widths {
            check_dimension("column width", *width)?;
            if *width <= 2.0 * CELL_PADDING_X {
                return Err(ResumeBuilderError::Render(format!(
                    "column width {} leaves no room for text",
                    width
                )));
            }
        }

        let total_width: f32 = column_widths.iter().sum();
        let table_left =
            self.geometry.margin_left + align_offset(Alignment::Center, self.geometry.frame_width(), total_width);

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != column_widths.len() {
                return Err(ResumeBuilderError::Render(format!(
                    "table row {} has {} cells but the table has {} columns",
                    row_index,
                    row.len(),
                    column_widths.len()
                )));
            }

            let wrapped: Vec<Vec<Line>> = row
                .iter()
                .zip(column_widths)
                .map(|(cell, width)| wrap(&cell.text, style, width - 2.0 * CELL_PADDING_X))
                .collect();
            let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
            let row_height = padding_top + line_count as f32 * style.leading + padding_bottom;
            self.reserve(row_height)?;

            let mut cell_left = table_left;
            for ((lines, cell), width) in wrapped.into_iter().zip(row).zip(column_widths) {
                let inner = width - 2.0 * CELL_PADDING_X;
                let mut top = self.cursor + padding_top;
                for line in lines {
                    let x = cell_left + CELL_PADDING_X + align_offset(cell.alignment, inner, line.width);
                    self.place_line(line, x, top, style);
                    top += style.leading;
                }
                cell_left += width;
            }
            self.cursor += row_height;
        }
        Ok(())
    }

    fn block(&mut self, block: &ContentBlock) -> Result<()> {
        match block {
            ContentBlock::Title {
                name,
                job_title,
                style,
            } => {
                self.paragraph(name, style)?;
                self.paragraph(job_title, style)
            }
            ContentBlock::ContactLine {
                email,
                phone,
                style,
                column_widths,
            } => {
                let row = vec![
                    TableCell {
                        text: email.clone(),
                        alignment: Alignment::Left,
                    },
                    TableCell {
                        text: phone.clone(),
                        alignment: Alignment::Right,
                    },
                ];
                self.table(&[row], column_widths, style, 3.0, 6.0)
            }
            ContentBlock::Paragraph { text, style }
            | ContentBlock::SectionHeading { text, style } => self.paragraph(text, style),
            ContentBlock::Table {
                rows,
                column_widths,
                style,
                padding_top,
                padding_bottom,
            } => self.table(rows, column_widths, style, *padding_top, *padding_bottom),
            ContentBlock::Spacer { height } => self.spacer(*height),
        }
    }
}

/// Lay out `blocks` in order onto as many pages as they need. Always yields at least one page.
pub fn layout(blocks: &[ContentBlock], geometry: &PageGeometry) -> Result<Vec<PageLayout>> {
    let mut layouter = Layouter::new(geometry);
    for block in blocks {
        layouter.block(block)?;
    }
    Ok(layouter.pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::blocks::{rating_run, BLACK};
    use crate::processing::markup::translate;

    fn normal() -> TextStyle {
        TextStyle::normal()
    }

    fn line_texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.runs.iter().map(|r| r.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = RichText::plain("alpha beta gamma delta epsilon zeta eta theta");
        let lines = wrap(&text, &normal(), 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 100.0 + 1e-3);
        }
        assert_eq!(
            line_texts(&lines).join(" "),
            "alpha beta gamma delta epsilon zeta eta theta"
        );
    }

    #[test]
    fn test_wrap_honours_line_breaks_and_collapses_spaces() {
        let lines = wrap(&translate("one   two\n\nthree"), &normal(), 400.0);
        assert_eq!(line_texts(&lines), vec!["one two", "", "three"]);
    }

    #[test]
    fn test_bold_run_split_from_regular() {
        let lines = wrap(&translate("**Lead** engineer"), &normal(), 400.0);
        assert_eq!(lines.len(), 1);
        let faces: Vec<FontFace> = lines[0].runs.iter().map(|r| r.face).collect();
        assert_eq!(faces, vec![FontFace::Bold, FontFace::Regular]);
        assert_eq!(lines[0].runs[0].text, "Lead ");
    }

    #[test]
    fn test_long_word_is_broken() {
        let word = "x".repeat(200);
        let lines = wrap(&RichText::plain(word.as_str()), &normal(), 50.0);
        assert!(lines.len() > 1);
        assert_eq!(line_texts(&lines).concat(), word);
    }

    #[test]
    fn test_rating_glyphs_use_symbol_face() {
        let lines = wrap(&rating_run(3), &normal(), 200.0);
        assert_eq!(lines[0].runs.len(), 1);
        assert_eq!(lines[0].runs[0].face, FontFace::Symbol);
        assert_eq!(lines[0].runs[0].text.chars().count(), 3);
        assert!(wrap(&rating_run(0), &normal(), 200.0).is_empty());
    }

    #[test]
    fn test_centered_title_position() {
        let geometry = PageGeometry::a4();
        let style = TextStyle::title();
        let blocks = vec![ContentBlock::Title {
            name: RichText::bold("Jane"),
            job_title: RichText::new(),
            style,
        }];
        let pages = layout(&blocks, &geometry).unwrap();
        let fragment = &pages[0].fragments[0];
        let width = text_width(FontFace::Bold, "Jane", style.font_size);
        let expected_x = geometry.margin_left + (geometry.frame_width() - width) / 2.0;
        assert!((fragment.x - expected_x).abs() < 1e-3);
        assert!(fragment.y < geometry.height - geometry.margin_top);
    }

    #[test]
    fn test_paragraphs_flow_onto_new_pages() {
        let geometry = PageGeometry::a4();
        let blocks: Vec<ContentBlock> = (0..120)
            .map(|i| ContentBlock::Paragraph {
                text: RichText::plain(format!("Line number {}", i)),
                style: normal(),
            })
            .collect();

        let pages = layout(&blocks, &geometry).unwrap();
        assert!(pages.len() >= 3);
        for page in &pages {
            for fragment in &page.fragments {
                assert!(fragment.y >= geometry.margin_bottom);
                assert!(fragment.y <= geometry.height - geometry.margin_top);
            }
        }
        assert!(pages[1].text().contains("Line number"));
    }

    #[test]
    fn test_contact_phone_right_aligned() {
        let geometry = PageGeometry::a4();
        let blocks = vec![ContentBlock::ContactLine {
            email: RichText::plain("E-mail : j@x.com"),
            phone: RichText::plain("Phone : 1"),
            style: normal(),
            column_widths: [200.0, 160.0],
        }];
        let pages = layout(&blocks, &geometry).unwrap();
        let fragments = &pages[0].fragments;
        assert_eq!(fragments.len(), 2);

        let table_left = geometry.margin_left + (geometry.frame_width() - 360.0) / 2.0;
        assert!((fragments[0].x - (table_left + CELL_PADDING_X)).abs() < 1e-3);

        let phone_width = text_width(FontFace::Regular, "Phone : 1", 11.0);
        let phone_right = fragments[1].x + phone_width;
        assert!((phone_right - (table_left + 360.0 - CELL_PADDING_X)).abs() < 1e-2);
    }

    #[test]
    fn test_mismatched_table_row_is_render_error() {
        let blocks = vec![ContentBlock::Table {
            rows: vec![vec![TableCell::left(RichText::plain("only one"))]],
            column_widths: vec![200.0, 150.0],
            style: normal(),
            padding_top: 3.0,
            padding_bottom: 6.0,
        }];
        let err = layout(&blocks, &PageGeometry::a4()).unwrap_err();
        assert!(err.is_render_error());
    }

    #[test]
    fn test_invalid_spacer_is_render_error() {
        let blocks = vec![ContentBlock::Spacer { height: f32::NAN }];
        assert!(layout(&blocks, &PageGeometry::a4()).unwrap_err().is_render_error());
    }

    #[test]
    fn test_colored_span_keeps_color() {
        let mut text = RichText::plain("BS - ");
        text.push_span("MIT", false, Some(Color::rgb(0.0, 0.0, 0.5)));
        let lines = wrap(&text, &normal(), 400.0);
        assert_eq!(lines[0].runs.len(), 2);
        assert_eq!(lines[0].runs[0].color, BLACK);
        assert_eq!(lines[0].runs[1].color, Color::rgb(0.0, 0.0, 0.5));
    }

    #[test]
    fn test_empty_input_yields_one_blank_page() {
        let pages = layout(&[], &PageGeometry::a4()).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].fragments.is_empty());
    }
}
