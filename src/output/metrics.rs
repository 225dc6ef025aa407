//! Static advance-width tables for the built-in PDF fonts used by the renderer.
//!
//! Widths are in thousandths of an em and cover ASCII 0x20..=0x7E.
//! Index = (char as usize) - 32. Anything else falls back to an average width.

use crate::processing::blocks::RATING_GLYPH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    /// Dingbat font carrying the rating glyph
    Symbol,
}

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp ! " # $ % & ' ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // : ; < = > ? @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [ \ ] ^ _ `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // { | } ~
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // sp ! " # $ % & ' ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // : ; < = > ? @
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [ \ ] ^ _ `
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // { | } ~
];

const AVERAGE_WIDTH: u16 = 556;
const RATING_GLYPH_WIDTH: u16 = 816;

/// Width of one character in em units
pub fn char_width(face: FontFace, c: char) -> f32 {
    let code = c as usize;
    let thousandths = match face {
        FontFace::Symbol => RATING_GLYPH_WIDTH,
        FontFace::Regular if (32..=126).contains(&code) => HELVETICA[code - 32],
        FontFace::Bold if (32..=126).contains(&code) => HELVETICA_BOLD[code - 32],
        _ => AVERAGE_WIDTH,
    };
    thousandths as f32 / 1000.0
}

/// Rendered width of `text` in points at `font_size`
pub fn text_width(face: FontFace, text: &str, font_size: f32) -> f32 {
    text.chars().map(|c| char_width(face, c)).sum::<f32>() * font_size
}

/// Which face a character is drawn with, given the span's weight
pub fn face_for(c: char, bold: bool) -> FontFace {
    if c == RATING_GLYPH {
        FontFace::Symbol
    } else if bold {
        FontFace::Bold
    } else {
        FontFace::Regular
    }
}

/// Map a character onto something the built-in fonts' WinAnsi encoding can show.
/// Control characters are dropped; tabs become spaces.
pub fn sanitize_char(c: char) -> Option<char> {
    match c {
        RATING_GLYPH => Some(c),
        '\t' => Some(' '),
        c if c.is_control() => None,
        ' '..='~' | '\u{A0}'..='\u{FF}' => Some(c),
        // WinAnsi extras
        '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž' | '‘' | '’'
        | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž' | 'Ÿ' => Some(c),
        '\u{2010}' | '\u{2011}' | '\u{2212}' => Some('-'),
        '\u{25CF}' | '\u{25AA}' | '\u{25E6}' => Some('•'),
        '\u{2192}' => Some('>'),
        '\u{2713}' | '\u{2714}' => Some('v'),
        '\u{200B}' | '\u{FEFF}' => None,
        _ => Some('?'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert!((char_width(FontFace::Regular, ' ') - 0.278).abs() < 1e-6);
        assert!((char_width(FontFace::Regular, 'W') - 0.944).abs() < 1e-6);
        assert!((char_width(FontFace::Bold, 'b') - 0.611).abs() < 1e-6);
        assert!((char_width(FontFace::Regular, '~') - 0.584).abs() < 1e-6);
        assert!((char_width(FontFace::Regular, 'é') - 0.556).abs() < 1e-6);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = text_width(FontFace::Regular, "Software Engineer", 11.0);
        let bold = text_width(FontFace::Bold, "Software Engineer", 11.0);
        assert!(bold > regular);
        assert!((text_width(FontFace::Regular, "ab", 10.0) - 11.12).abs() < 1e-3);
    }

    #[test]
    fn test_rating_glyph_uses_symbol_face() {
        assert_eq!(face_for('★', true), FontFace::Symbol);
        assert_eq!(face_for('a', true), FontFace::Bold);
        assert_eq!(face_for('a', false), FontFace::Regular);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_char('a'), Some('a'));
        assert_eq!(sanitize_char('é'), Some('é'));
        assert_eq!(sanitize_char('—'), Some('—'));
        assert_eq!(sanitize_char('\u{25CF}'), Some('•'));
        assert_eq!(sanitize_char('\t'), Some(' '));
        assert_eq!(sanitize_char('\u{7}'), None);
        assert_eq!(sanitize_char('漢'), Some('?'));
    }
}
