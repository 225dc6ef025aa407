//! Conversion of a resume record into an ordered sequence of styled content blocks

use crate::processing::markup::{translate, Color, RichText};
use crate::processing::record::{Education, ResumeRecord, WorkExperience};
use serde::{Deserialize, Serialize};

pub const DARK_BLUE: Color = Color::rgb(0.0, 0.0, 0.545);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

/// Symbol repeated once per skill rating point
pub const RATING_GLYPH: char = '★';

pub const CONTACT_COLUMN_WIDTHS: [f32; 2] = [200.0, 160.0];
pub const SKILLS_COLUMN_WIDTHS: [f32; 2] = [200.0, 150.0];

const TITLE_SPACING: f32 = 12.0;
const CONTACT_SPACING: f32 = 12.0;
const SUMMARY_SPACING: f32 = 20.0;
const SKILLS_HEADING_SPACING: f32 = 10.0;
const SKILLS_SPACING: f32 = 20.0;
const SECTION_ITEM_SPACING: f32 = 10.0;
const PROJECT_ITEM_SPACING: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Sizes are in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f32,
    pub leading: f32,
    pub color: Color,
    pub alignment: Alignment,
    pub space_after: f32,
}

impl TextStyle {
    pub fn title() -> Self {
        Self {
            font_size: 18.0,
            leading: 22.0,
            color: DARK_BLUE,
            alignment: Alignment::Center,
            space_after: 10.0,
        }
    }

    pub fn heading() -> Self {
        Self {
            font_size: 14.0,
            leading: 16.0,
            color: DARK_BLUE,
            alignment: Alignment::Left,
            space_after: 8.0,
        }
    }

    /// Titles of the education, work and project sections: body text in dark blue
    pub fn section_title() -> Self {
        Self::normal().with_color(DARK_BLUE)
    }

    pub fn normal() -> Self {
        Self {
            font_size: 11.0,
            leading: 14.0,
            color: BLACK,
            alignment: Alignment::Left,
            space_after: 0.0,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub text: RichText,
    pub alignment: Alignment,
}

impl TableCell {
    pub fn left(text: RichText) -> Self {
        Self {
            text,
            alignment: Alignment::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentBlock {
    Title {
        name: RichText,
        job_title: RichText,
        style: TextStyle,
    },
    /// One row, email cell left-aligned and phone cell right-aligned
    ContactLine {
        email: RichText,
        phone: RichText,
        style: TextStyle,
        column_widths: [f32; 2],
    },
    Paragraph {
        text: RichText,
        style: TextStyle,
    },
    SectionHeading {
        text: RichText,
        style: TextStyle,
    },
    Table {
        rows: Vec<Vec<TableCell>>,
        column_widths: Vec<f32>,
        style: TextStyle,
        /// Extra space above and below each row's text
        padding_top: f32,
        padding_bottom: f32,
    },
    Spacer {
        height: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    ContactLine,
    Paragraph,
    SectionHeading,
    Table,
    Spacer,
}

impl ContentBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Title { .. } => BlockKind::Title,
            ContentBlock::ContactLine { .. } => BlockKind::ContactLine,
            ContentBlock::Paragraph { .. } => BlockKind::Paragraph,
            ContentBlock::SectionHeading { .. } => BlockKind::SectionHeading,
            ContentBlock::Table { .. } => BlockKind::Table,
            ContentBlock::Spacer { .. } => BlockKind::Spacer,
        }
    }
}

/// What a section does when it ends up with no items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WhenEmpty {
    /// Drop the whole section, heading included
    Omit,
    /// The heading is content in its own right (a named project)
    KeepHeading,
}

struct Section {
    title: String,
    items: Vec<RichText>,
    item_spacing: f32,
    when_empty: WhenEmpty,
}

impl Section {
    /// Every section and subsection goes through this one emission rule:
    /// an untitled section is never emitted, and an empty one only keeps its
    /// heading when the heading itself carries the content.
    fn emit(self, blocks: &mut Vec<ContentBlock>) {
        if self.title.is_empty() {
            return;
        }
        if self.items.is_empty() && self.when_empty == WhenEmpty::Omit {
            return;
        }

        blocks.push(ContentBlock::SectionHeading {
            text: RichText::plain(self.title),
            style: TextStyle::section_title(),
        });
        if self.items.is_empty() {
            blocks.push(ContentBlock::Spacer {
                height: self.item_spacing,
            });
            return;
        }
        for item in self.items {
            blocks.push(ContentBlock::Paragraph {
                text: item,
                style: TextStyle::normal(),
            });
            blocks.push(ContentBlock::Spacer {
                height: self.item_spacing,
            });
        }
    }
}

/// Build the block sequence. Order is fixed:
/// title, contact, summary, skills, education, experience, projects.
pub fn build(record: &ResumeRecord) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    push_title(record, &mut blocks);
    push_contact(record, &mut blocks);
    push_summary(record, &mut blocks);
    push_skills(record, &mut blocks);

    Section {
        title: "Education".to_string(),
        items: record.education.iter().map(education_line).collect(),
        item_spacing: SECTION_ITEM_SPACING,
        when_empty: WhenEmpty::Omit,
    }
    .emit(&mut blocks);

    Section {
        title: "Work Experience".to_string(),
        items: record
            .work_experience
            .iter()
            .flat_map(work_lines)
            .collect(),
        item_spacing: SECTION_ITEM_SPACING,
        when_empty: WhenEmpty::Omit,
    }
    .emit(&mut blocks);

    for project in &record.projects {
        let mut items = Vec::new();
        if !project.description.is_empty() {
            items.push(translate(&project.description));
        }
        Section {
            title: project.name.clone(),
            items,
            item_spacing: PROJECT_ITEM_SPACING,
            when_empty: WhenEmpty::KeepHeading,
        }
        .emit(&mut blocks);
    }

    blocks
}

fn push_title(record: &ResumeRecord, blocks: &mut Vec<ContentBlock>) {
    blocks.push(ContentBlock::Title {
        name: RichText::bold(record.name.as_str()),
        job_title: RichText::bold(record.job_title.as_str()),
        style: TextStyle::title(),
    });
    blocks.push(ContentBlock::Spacer {
        height: TITLE_SPACING,
    });
}

fn push_contact(record: &ResumeRecord, blocks: &mut Vec<ContentBlock>) {
    if !record.has_contact() {
        return;
    }
    let labelled = |label: &str, value: &str| {
        if value.is_empty() {
            RichText::new()
        } else {
            RichText::plain(format!("{} : {}", label, value))
        }
    };

    blocks.push(ContentBlock::ContactLine {
        email: labelled("E-mail", &record.email),
        phone: labelled("Phone", &record.phone),
        style: TextStyle::normal().with_color(BLUE),
        column_widths: CONTACT_COLUMN_WIDTHS,
    });
    blocks.push(ContentBlock::Spacer {
        height: CONTACT_SPACING,
    });
}

fn push_summary(record: &ResumeRecord, blocks: &mut Vec<ContentBlock>) {
    if record.summary.is_empty() {
        return;
    }
    blocks.push(ContentBlock::Paragraph {
        text: translate(&record.summary),
        style: TextStyle::normal().with_color(DARK_BLUE),
    });
    blocks.push(ContentBlock::Spacer {
        height: SUMMARY_SPACING,
    });
}

fn push_skills(record: &ResumeRecord, blocks: &mut Vec<ContentBlock>) {
    if record.skills.is_empty() {
        return;
    }

    blocks.push(ContentBlock::SectionHeading {
        text: RichText::bold("Skills"),
        style: TextStyle::heading(),
    });
    blocks.push(ContentBlock::Spacer {
        height: SKILLS_HEADING_SPACING,
    });

    let rows = record
        .skills
        .iter()
        .map(|(skill, rating)| {
            vec![
                TableCell::left(RichText::bold(skill.as_str())),
                TableCell::left(rating_run(*rating)),
            ]
        })
        .collect();

    blocks.push(ContentBlock::Table {
        rows,
        column_widths: SKILLS_COLUMN_WIDTHS.to_vec(),
        style: TextStyle::normal(),
        padding_top: 3.0,
        padding_bottom: 6.0,
    });
    blocks.push(ContentBlock::Spacer {
        height: SKILLS_SPACING,
    });
}

/// A run of `rating` glyphs; zero yields an empty run
pub fn rating_run(rating: u8) -> RichText {
    RichText::plain(RATING_GLYPH.to_string().repeat(rating as usize))
}

fn education_line(education: &Education) -> RichText {
    let mut line = RichText::plain(education.degree.as_str());
    if !education.institution.is_empty() {
        if !education.degree.is_empty() {
            line.push_span(" - ", false, None);
        }
        line.push_span(education.institution.as_str(), false, Some(DARK_BLUE));
    }
    if !education.year.is_empty() {
        line.push_span(format!(" ({})", education.year), false, None);
    }
    line
}

fn work_lines(work: &WorkExperience) -> Vec<RichText> {
    let mut lines = Vec::new();
    if work.has_header() {
        let mut header = RichText::bold(work.job_title.as_str());
        header.push_span(" at ", false, None);
        header.push_span(work.company.as_str(), false, Some(DARK_BLUE));
        if !work.duration.is_empty() {
            header.push_span(format!(" ({})", work.duration), false, None);
        }
        lines.push(header);
    }
    if !work.description.is_empty() {
        lines.push(translate(&work.description));
    }
    lines
}
