//! Destructible shield structures.
//!
//! Each barrier is a small bitmap of cells. Bullets, bombs and invaders that
//! touch a cell knock it out; nothing ever grows back within a wave.

use crate::engine::entity::{EntityId, IdGen, Sprite};
use crate::engine::events::{EntityKind, EventBus, Lifecycle};
use crate::engine::grid::{Point, FIELD_ROWS};

pub const BARRIER_W: usize = 8;
pub const BARRIER_H: usize = 4;
/// Number of shields spawned per wave.
pub const BARRIER_COUNT: usize = 4;
/// Row of the top of every barrier.
pub const BARRIER_ROW: i32 = FIELD_ROWS - 8;

/// Initial shape: solid slab with a notched underside for the cannon to
/// shelter in.
const SHAPE: [[bool; BARRIER_W]; BARRIER_H] = [
    [true, true, true, true, true, true, true, true],
    [true, true, true, true, true, true, true, true],
    [true, true, true, true, true, true, true, true],
    [true, true, false, false, false, false, true, true],
];

#[derive(Clone, Debug)]
pub struct Barrier {
    pub at: Point,
    cells: [[bool; BARRIER_W]; BARRIER_H],
    ids: [[EntityId; BARRIER_W]; BARRIER_H],
}

impl Barrier {
    /// Build a fresh shield at `at`, announcing every intact cell.
    pub fn spawn(at: Point, ids: &mut IdGen, bus: &mut EventBus) -> Self {
        let mut cell_ids = [[EntityId(0); BARRIER_W]; BARRIER_H];
        for (r, row) in SHAPE.iter().enumerate() {
            for (c, &occupied) in row.iter().enumerate() {
                let id = ids.next();
                cell_ids[r][c] = id;
                if occupied {
                    bus.render(
                        id,
                        EntityKind::BarrierCell,
                        Sprite::BarrierCell,
                        Point::new(at.col + c as i32, at.row + r as i32),
                        Lifecycle::Spawned,
                    );
                }
            }
        }
        Self {
            at,
            cells: SHAPE,
            ids: cell_ids,
        }
    }

    /// Column positions for a full rank of barriers, evenly spread.
    pub fn rank_positions() -> [Point; BARRIER_COUNT] {
        // 4 shields of 8 cells across an 80-cell field: 12-cell gaps with
        // 10-cell margins on either side.
        let mut out = [Point::new(0, BARRIER_ROW); BARRIER_COUNT];
        for (i, p) in out.iter_mut().enumerate() {
            p.col = 10 + (i as i32) * (BARRIER_W as i32 + 12);
        }
        out
    }

    fn local(&self, at: Point) -> Option<(usize, usize)> {
        let c = at.col - self.at.col;
        let r = at.row - self.at.row;
        if c >= 0 && (c as usize) < BARRIER_W && r >= 0 && (r as usize) < BARRIER_H {
            Some((r as usize, c as usize))
        } else {
            None
        }
    }

    /// True if an intact cell occupies the given field position.
    pub fn cell_at(&self, at: Point) -> bool {
        self.local(at).is_some_and(|(r, c)| self.cells[r][c])
    }

    /// Knock out the cell at the given field position. Returns true if an
    /// intact cell was destroyed.
    pub fn erode(&mut self, at: Point, bus: &mut EventBus) -> bool {
        let Some((r, c)) = self.local(at) else {
            return false;
        };
        if !self.cells[r][c] {
            return false;
        }
        self.cells[r][c] = false;
        bus.render(
            self.ids[r][c],
            EntityKind::BarrierCell,
            Sprite::BarrierCell,
            at,
            Lifecycle::Destroyed,
        );
        true
    }

    /// Count of intact cells.
    pub fn integrity(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barrier() -> (Barrier, EventBus) {
        let mut bus = EventBus::default();
        let mut ids = IdGen::default();
        let b = Barrier::spawn(Point::new(10, BARRIER_ROW), &mut ids, &mut bus);
        bus.clear();
        (b, bus)
    }

    #[test]
    fn erode_removes_exactly_one_cell() {
        let (mut b, mut bus) = barrier();
        let before = b.integrity();
        let hit = Point::new(12, BARRIER_ROW + 1);
        assert!(b.cell_at(hit));
        assert!(b.erode(hit, &mut bus));
        assert!(!b.cell_at(hit));
        assert_eq!(b.integrity(), before - 1);
        // eroding a hole is a no-op
        assert!(!b.erode(hit, &mut bus));
        assert_eq!(b.integrity(), before - 1);
    }

    #[test]
    fn notch_is_open_from_the_start() {
        let (b, _) = barrier();
        assert!(!b.cell_at(Point::new(13, BARRIER_ROW + 3)));
        assert!(b.cell_at(Point::new(10, BARRIER_ROW + 3)));
    }

    #[test]
    fn misses_outside_the_bitmap() {
        let (mut b, mut bus) = barrier();
        assert!(!b.cell_at(Point::new(9, BARRIER_ROW)));
        assert!(!b.erode(Point::new(9, BARRIER_ROW), &mut bus));
    }

    #[test]
    fn rank_fits_the_field() {
        let rank = Barrier::rank_positions();
        assert_eq!(rank.len(), BARRIER_COUNT);
        for p in rank {
            assert!(p.col >= 0);
            assert!(p.col + BARRIER_W as i32 <= crate::engine::grid::FIELD_COLS);
        }
    }
}
