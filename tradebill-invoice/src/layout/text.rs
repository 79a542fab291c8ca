//! Width measurement, wrapping and truncation.

use std::fmt;

use tradebill_pdf::truetype::TrueTypeFont;
use tradebill_pdf::FontMetrics;

use super::ops::Face;

const ELLIPSIS: &str = "...";

/// Advance widths for each face: builtin Helvetica unless an embedded
/// TrueType font replaces the regular or bold weight. Italic is always
/// builtin, matching the renderer.
#[derive(Default)]
pub struct TextMetrics {
    regular: Option<TrueTypeFont>,
    bold: Option<TrueTypeFont>,
}

impl TextMetrics {
    pub fn with_fonts(regular: Option<TrueTypeFont>, bold: Option<TrueTypeFont>) -> Self {
        TextMetrics { regular, bold }
    }

    pub fn measure(&self, text: &str, face: Face, size: f64) -> f64 {
        let embedded = match face {
            Face::Regular => self.regular.as_ref(),
            Face::Bold => self.bold.as_ref(),
            Face::Italic => None,
        };
        match embedded {
            Some(font) => font.measure_text(text, size),
            None => FontMetrics::measure_text(text, face.builtin(), size),
        }
    }
}

impl fmt::Debug for TextMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextMetrics")
            .field("regular_embedded", &self.regular.is_some())
            .field("bold_embedded", &self.bold.is_some())
            .finish()
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Explicit newlines always break. Words longer than a whole line are
/// split between characters. Blank input yields no lines.
pub fn wrap(metrics: &TextMetrics, text: &str, face: Face, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if metrics.measure(&candidate, face, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if metrics.measure(word, face, size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(metrics, word, face, size, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Split an overlong word into chunks that each fit `max_width`.
fn break_word(metrics: &TextMetrics, word: &str, face: Face, size: f64, max_width: f64) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if metrics.measure(&current, face, size) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Shorten `text` with a trailing ellipsis so it fits `max_width`.
pub fn truncate(metrics: &TextMetrics, text: &str, face: Face, size: f64, max_width: f64) -> String {
    let text = text.trim();
    if metrics.measure(text, face, size) <= max_width {
        return text.to_string();
    }
    let budget = max_width - metrics.measure(ELLIPSIS, face, size);
    let mut kept = String::new();
    for ch in text.chars() {
        kept.push(ch);
        if metrics.measure(&kept, face, size) > budget {
            kept.pop();
            break;
        }
    }
    format!("{}{ELLIPSIS}", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_line() {
        let m = TextMetrics::default();
        assert_eq!(wrap(&m, "Hello world", Face::Regular, 10.0, 200.0), vec!["Hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let m = TextMetrics::default();
        let lines = wrap(&m, "alpha beta gamma delta", Face::Regular, 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(m.measure(line, Face::Regular, 10.0) <= 60.0, "{line}");
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta");
    }

    #[test]
    fn newlines_force_breaks_and_blank_lines_vanish() {
        let m = TextMetrics::default();
        let lines = wrap(&m, "one\n\ntwo", Face::Regular, 10.0, 500.0);
        assert_eq!(lines, vec!["one", "two"]);
        assert!(wrap(&m, "   ", Face::Regular, 10.0, 500.0).is_empty());
    }

    #[test]
    fn splits_overlong_words() {
        let m = TextMetrics::default();
        let word = "x".repeat(80);
        let lines = wrap(&m, &word, Face::Regular, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(m.measure(line, Face::Regular, 10.0) <= 50.0);
        }
    }

    #[test]
    fn truncate_leaves_fitting_text_alone() {
        let m = TextMetrics::default();
        assert_eq!(truncate(&m, "Widget", Face::Regular, 9.0, 200.0), "Widget");
    }

    #[test]
    fn truncate_adds_ellipsis_within_width() {
        let m = TextMetrics::default();
        let long = "Consulting services for the quarterly infrastructure review and migration";
        let cut = truncate(&m, long, Face::Regular, 9.0, 120.0);
        assert!(cut.ends_with("..."));
        assert!(cut.len() < long.len());
        assert!(m.measure(&cut, Face::Regular, 9.0) <= 120.0);
    }

    #[test]
    fn embedded_font_drives_measurement() {
        let data = std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../tradebill-pdf/tests/fixtures/DejaVuSans.ttf"
        ))
        .unwrap();
        let font = TrueTypeFont::from_bytes(data, "F4".into()).unwrap();
        let expected = font.measure_text("Boiler service", 9.0);
        let m = TextMetrics::with_fonts(Some(font), None);

        assert_eq!(m.measure("Boiler service", Face::Regular, 9.0), expected);
        let builtin = TextMetrics::default();
        assert_ne!(expected, builtin.measure("Boiler service", Face::Regular, 9.0));
        assert_eq!(
            m.measure("Boiler service", Face::Bold, 9.0),
            builtin.measure("Boiler service", Face::Bold, 9.0)
        );

        let long = "Consulting services for the quarterly infrastructure review and migration";
        let cut = truncate(&m, long, Face::Regular, 9.0, 120.0);
        assert!(cut.ends_with("..."));
        assert!(m.measure(&cut, Face::Regular, 9.0) <= 120.0);
    }
}
