//! Positioned drawing operations produced by layout.
//!
//! Coordinates use a top-left origin; the renderer flips them into PDF
//! space.

use tradebill_pdf::{BuiltinFont, Color, Rect};

/// Typeface role. The renderer maps each to a builtin or embedded font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Regular,
    Bold,
    Italic,
}

impl Face {
    /// Builtin font used for measurement and as the default rendering.
    pub fn builtin(self) -> BuiltinFont {
        match self {
            Face::Regular => BuiltinFont::Helvetica,
            Face::Bold => BuiltinFont::HelveticaBold,
            Face::Italic => BuiltinFont::HelveticaOblique,
        }
    }
}

/// Horizontal anchoring of a text op's `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub x: f64,
    pub baseline: f64,
    pub align: Align,
    pub face: Face,
    pub size: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    FillRect { rect: Rect, color: Color },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color },
    /// Logo fitted into `rect`, flush top-right.
    Logo { rect: Rect },
}

/// One finished page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub ops: Vec<DrawOp>,
    /// Indices of the line items whose rows sit on this page.
    pub item_indices: Vec<usize>,
}

impl Page {
    pub(crate) fn new(number: usize) -> Self {
        Page {
            number,
            ops: Vec::new(),
            item_indices: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    /// First text op whose content equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&TextOp> {
        self.texts().find(|t| t.text == text)
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.find_text(text).is_some()
    }

    pub fn has_logo(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Logo { .. }))
    }
}
