//! Page geometry: sizes, margins, column widths and reserved bands.
//!
//! All values are points with the origin at the top-left corner of the
//! page and `y` growing downward.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Leading space above the totals rows.
pub(crate) const TOTALS_GAP: f64 = 12.0;

/// Widths of the four item-table columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnWidths {
    pub description: f64,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        ColumnWidths {
            description: 243.0,
            quantity: 60.0,
            unit_price: 90.0,
            total: 90.0,
        }
    }
}

impl ColumnWidths {
    pub fn sum(&self) -> f64 {
        self.description + self.quantity + self.unit_price + self.total
    }

    fn as_array(&self) -> [f64; 4] {
        [self.description, self.quantity, self.unit_price, self.total]
    }
}

/// Table column, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Description,
    Quantity,
    UnitPrice,
    Total,
}

/// How much space at the bottom of the page a check must leave free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reserve {
    /// Running footer band only.
    Footer,
    /// Footer band plus the totals block, so the last item row and the
    /// totals land on the same page.
    FooterAndTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub columns: ColumnWidths,
    pub row_height: f64,
    pub cell_padding: f64,
    /// Band above the bottom margin holding "Page N of M".
    pub footer_height: f64,
    pub totals_block_height: f64,
    /// Minimum space the footer notes need before they start on a page.
    pub footer_notes_min_height: f64,
    pub logo_width: f64,
    pub logo_height: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::a4()
    }
}

impl Geometry {
    /// A4 portrait with 56pt margins.
    pub fn a4() -> Self {
        Geometry {
            page_width: 595.0,
            page_height: 842.0,
            margin_top: 56.0,
            margin_bottom: 56.0,
            margin_left: 56.0,
            margin_right: 56.0,
            columns: ColumnWidths::default(),
            row_height: 20.0,
            cell_padding: 6.0,
            footer_height: 30.0,
            totals_block_height: 72.0,
            footer_notes_min_height: 40.0,
            logo_width: 90.0,
            logo_height: 50.0,
        }
    }

    pub fn content_left(&self) -> f64 {
        self.margin_left
    }

    pub fn content_right(&self) -> f64 {
        self.page_width - self.margin_right
    }

    pub fn content_width(&self) -> f64 {
        self.content_right() - self.content_left()
    }

    /// Lowest `y` content may reach, keeping the reserved bands free.
    pub fn usable_bottom(&self, reserve: Reserve) -> f64 {
        let bottom = self.page_height - self.margin_bottom - self.footer_height;
        match reserve {
            Reserve::Footer => bottom,
            Reserve::FooterAndTotals => bottom - self.totals_block_height,
        }
    }

    /// Baseline of the running footer caption.
    pub fn footer_baseline(&self) -> f64 {
        self.page_height - self.margin_bottom - self.footer_height / 2.0 + 3.0
    }

    /// Left edge and width of a table column.
    pub fn column(&self, column: Column) -> (f64, f64) {
        let widths = self.columns.as_array();
        let index = column as usize;
        let left = self.content_left() + widths[..index].iter().sum::<f64>();
        (left, widths[index])
    }

    /// Space the totals rows need inside their reserved block.
    pub(crate) fn totals_rows_height(&self) -> f64 {
        TOTALS_GAP + 3.0 * self.row_height
    }

    /// Check that the constants describe a page layout can always make
    /// progress on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("row_height", self.row_height),
            ("footer_height", self.footer_height),
            ("totals_block_height", self.totals_block_height),
            ("footer_notes_min_height", self.footer_notes_min_height),
            ("logo_width", self.logo_width),
            ("logo_height", self.logo_height),
            ("columns.description", self.columns.description),
            ("columns.quantity", self.columns.quantity),
            ("columns.unit_price", self.columns.unit_price),
            ("columns.total", self.columns.total),
        ];
        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::geometry(format!("{name} must be positive, got {value}")));
            }
        }
        let margins = [
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("cell_padding", self.cell_padding),
        ];
        for (name, value) in margins {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::geometry(format!("{name} must not be negative, got {value}")));
            }
        }

        if self.content_width() <= 0.0 {
            return Err(ConfigError::geometry("margins leave no content width"));
        }
        if self.columns.sum() > self.content_width() + 1e-6 {
            return Err(ConfigError::geometry(format!(
                "columns are {}pt wide but content width is {}pt",
                self.columns.sum(),
                self.content_width()
            )));
        }
        if self.logo_width > self.content_width() {
            return Err(ConfigError::geometry("logo box is wider than the content area"));
        }
        if self.totals_block_height < self.totals_rows_height() {
            return Err(ConfigError::geometry(format!(
                "totals_block_height must be at least {}pt",
                self.totals_rows_height()
            )));
        }

        // A fresh page must hold a header row, one item row and the totals.
        let needed = 2.0 * self.row_height + self.totals_block_height;
        let available = self.usable_bottom(Reserve::Footer) - self.margin_top;
        if needed > available {
            return Err(ConfigError::geometry(format!(
                "page too short: table header, one row and totals need {needed}pt, {available}pt available"
            )));
        }
        if self.margin_top + self.footer_notes_min_height > self.usable_bottom(Reserve::Footer) {
            return Err(ConfigError::geometry("page too short for footer notes"));
        }
        Ok(())
    }
}
