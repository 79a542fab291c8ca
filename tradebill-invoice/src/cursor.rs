//! Vertical position tracking across pages.

use tracing::debug;

use crate::geometry::{Geometry, Reserve};

/// Which part of the document the cursor is walking through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Body,
    /// Inside the items table; a page break must repeat the header row.
    Table,
}

/// What a page break asks the caller to do on the new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PageBreak {
    /// Index of the page just started.
    pub page_index: usize,
    /// The break happened inside the items table, so its header row has
    /// to be emitted again before the next row.
    pub repeat_table_header: bool,
}

/// Current page and `y` position (top-left origin) during layout.
///
/// Starts at the top margin of page 0. `would_overflow` compares against
/// the usable bottom for a given reserve; `break_page` starts the next
/// page and resets `y` to the top margin.
#[derive(Debug)]
pub struct PageCursor<'g> {
    geometry: &'g Geometry,
    page_index: usize,
    y: f64,
    region: Region,
    /// True until something is placed on the current page.
    fresh: bool,
}

impl<'g> PageCursor<'g> {
    pub fn new(geometry: &'g Geometry) -> Self {
        PageCursor {
            geometry,
            page_index: 0,
            y: geometry.margin_top,
            region: Region::Body,
            fresh: true,
        }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Returns `true` if nothing has been placed on the current page yet.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn usable_bottom(&self, reserve: Reserve) -> f64 {
        self.geometry.usable_bottom(reserve)
    }

    /// Space left above the usable bottom.
    pub fn remaining(&self, reserve: Reserve) -> f64 {
        self.usable_bottom(reserve) - self.y
    }

    /// Move down by `h` points.
    pub fn advance(&mut self, h: f64) {
        self.y += h;
        self.fresh = false;
    }

    /// Move down to `y` if it lies below the current position.
    pub fn advance_to(&mut self, y: f64) {
        if y > self.y {
            self.advance(y - self.y);
        }
    }

    /// Whether a block of height `h` placed at the current `y` would cross
    /// the usable bottom.
    pub fn would_overflow(&self, h: f64, reserve: Reserve) -> bool {
        self.y + h > self.usable_bottom(reserve)
    }

    pub fn enter_table(&mut self) {
        self.region = Region::Table;
    }

    pub fn leave_table(&mut self) {
        self.region = Region::Body;
    }

    /// Start a new page with `y` at the top margin.
    pub fn break_page(&mut self) -> PageBreak {
        self.page_index += 1;
        self.y = self.geometry.margin_top;
        self.fresh = true;
        debug!(page = self.page_index + 1, region = ?self.region, "page break");
        PageBreak {
            page_index: self.page_index,
            repeat_table_header: self.region == Region::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(usable: f64, row: f64) -> Geometry {
        let mut g = Geometry::a4();
        g.margin_top = 10.0;
        g.margin_bottom = 10.0;
        g.footer_height = 5.0;
        g.row_height = row;
        g.page_height = g.margin_top + usable + g.margin_bottom + g.footer_height;
        g
    }

    /// Rows placed on the first page before the cursor asks for a break.
    fn rows_fitting(g: &Geometry) -> usize {
        let mut cursor = PageCursor::new(g);
        let mut rows = 0;
        while !cursor.would_overflow(g.row_height, Reserve::Footer) {
            cursor.advance(g.row_height);
            rows += 1;
        }
        rows
    }

    #[test]
    fn starts_at_top_margin() {
        let g = Geometry::a4();
        let cursor = PageCursor::new(&g);
        assert_eq!(cursor.page_index(), 0);
        assert_eq!(cursor.y(), 56.0);
        assert!(cursor.is_fresh());
        assert_eq!(cursor.region(), Region::Body);
    }

    #[test]
    fn exact_multiple_fits_every_row() {
        // 16.0 is exact in binary so y lands on the boundary precisely.
        let g = geometry(10.0 * 16.0, 16.0);
        assert_eq!(rows_fitting(&g), 10);
    }

    #[test]
    fn just_short_of_multiple_drops_a_row() {
        let g = geometry(10.0 * 16.0 - 0.001, 16.0);
        assert_eq!(rows_fitting(&g), 9);
    }

    #[test]
    fn fits_floor_of_usable_over_row() {
        for (usable, row) in [(100.0, 20.0), (99.0, 20.0), (101.0, 20.0), (250.0, 24.0)] {
            let g = geometry(usable, row);
            assert_eq!(rows_fitting(&g), (usable / row).floor() as usize, "usable {usable} row {row}");
        }
    }

    #[test]
    fn totals_reserve_is_stricter() {
        let g = Geometry::a4();
        let mut cursor = PageCursor::new(&g);
        cursor.advance_to(g.usable_bottom(Reserve::FooterAndTotals) - 10.0);
        assert!(!cursor.would_overflow(20.0, Reserve::Footer));
        assert!(cursor.would_overflow(20.0, Reserve::FooterAndTotals));
        assert_eq!(cursor.remaining(Reserve::FooterAndTotals), 10.0);
    }

    #[test]
    fn break_resets_and_signals_table_header() {
        let g = Geometry::a4();
        let mut cursor = PageCursor::new(&g);
        cursor.advance(500.0);
        let brk = cursor.break_page();
        assert_eq!(brk, PageBreak { page_index: 1, repeat_table_header: false });
        assert_eq!(cursor.y(), g.margin_top);
        assert!(cursor.is_fresh());

        cursor.enter_table();
        cursor.advance(20.0);
        let brk = cursor.break_page();
        assert!(brk.repeat_table_header);
        assert_eq!(brk.page_index, 2);

        cursor.leave_table();
        assert!(!cursor.break_page().repeat_table_header);
    }

    #[test]
    fn advance_to_never_moves_up() {
        let g = Geometry::a4();
        let mut cursor = PageCursor::new(&g);
        cursor.advance_to(30.0);
        assert_eq!(cursor.y(), 56.0);
        assert!(cursor.is_fresh());
        cursor.advance_to(80.0);
        assert_eq!(cursor.y(), 80.0);
        assert!(!cursor.is_fresh());
    }
}
