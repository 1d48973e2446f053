//! Integer geometry for the play field.
//!
//! Every entity lives on a grid of character cells. Columns grow to the
//! right, rows grow downward; (0, 0) is the top-left cell of the field.

/// Width of the play field in cells.
pub const FIELD_COLS: i32 = 80;
/// Height of the play field in cells, HUD rows excluded.
pub const FIELD_ROWS: i32 = 44;

/// Topmost row a player bullet may occupy before it burns out.
pub const TOP_ROW: i32 = 1;
/// Row the player's cannon sits on.
pub const PLAYER_ROW: i32 = FIELD_ROWS - 2;

/// A cell position on the play field.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    pub col: i32,
    pub row: i32,
}

impl Point {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// True if the cell lies inside the field proper.
    pub fn in_field(self) -> bool {
        self.col >= 0 && self.col < FIELD_COLS && self.row >= 0 && self.row < FIELD_ROWS
    }
}

/// Axis-aligned overlap test between two cell rectangles.
pub fn overlaps(a: Point, aw: i32, ah: i32, b: Point, bw: i32, bh: i32) -> bool {
    a.col < b.col + bw && b.col < a.col + aw && a.row < b.row + bh && b.row < a.row + ah
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_detects_touching_cells() {
        let a = Point::new(10, 10);
        assert!(overlaps(a, 3, 2, Point::new(12, 11), 1, 1));
        assert!(!overlaps(a, 3, 2, Point::new(13, 11), 1, 1));
        assert!(!overlaps(a, 3, 2, Point::new(12, 12), 1, 1));
    }

    #[test]
    fn field_bounds() {
        assert!(Point::new(0, 0).in_field());
        assert!(Point::new(FIELD_COLS - 1, FIELD_ROWS - 1).in_field());
        assert!(!Point::new(FIELD_COLS, 0).in_field());
        assert!(!Point::new(0, -1).in_field());
    }
}
