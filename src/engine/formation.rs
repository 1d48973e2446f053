//! The invader formation: one grid that sweeps, drops, shoots and shrinks.
//!
//! All invaders move in lockstep. The formation advances one step each time
//! the accumulated tick count reaches the current step interval, which
//! shortens as invaders die. Direction reversal and the row drop happen in
//! the same step, so no invader ever leads the turn.

use rand::Rng;

use crate::engine::entity::{
    EntityId, IdGen, Invader, InvaderKind, Sprite, INVADER_H, INVADER_W,
};
use crate::engine::events::{EntityKind, EventBus, Lifecycle, SoundCue};
use crate::engine::grid::{Point, FIELD_COLS, PLAYER_ROW};

pub const FORMATION_COLS: usize = 11;
pub const FORMATION_ROWS: usize = 5;
/// Horizontal cell pitch between invader columns.
pub const COL_PITCH: i32 = 6;
/// Vertical cell pitch between invader rows.
pub const ROW_PITCH: i32 = 3;
/// Most bombs the formation may have falling at once.
pub const MAX_BOMBS: usize = 3;
/// Hard floor for the step interval, in ticks.
pub const STEP_FLOOR: u32 = 2;

/// Leftmost column an invader may occupy.
const WEST_WALL: i32 = 1;
/// One past the rightmost column an invader may occupy.
const EAST_WALL: i32 = FIELD_COLS - 1;

/// Starting row of the formation's top rank, by wave. Later waves start
/// deeper, exactly as the cabinet does.
const START_ROWS: [i32; 9] = [4, 6, 8, 10, 10, 10, 12, 12, 12];

/// Ticks between formation steps for a given live count and wave.
///
/// Monotonically non-increasing as `alive` falls, shaved 4 ticks per wave,
/// never below [`STEP_FLOOR`].
pub fn step_interval(alive: usize, wave: u32) -> u32 {
    let base: u32 = match alive {
        0 | 1 => 3,
        2..=3 => 5,
        4..=7 => 8,
        8..=15 => 14,
        16..=27 => 22,
        28..=43 => 32,
        _ => 42,
    };
    base.saturating_sub(4 * wave).max(STEP_FLOOR)
}

/// Top-rank start row for a wave.
pub fn start_row(wave: u32) -> i32 {
    START_ROWS[(wave as usize) % START_ROWS.len()]
}

/// Signals a step can raise toward the state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepSignal {
    /// An invader's sprite reached the player's row. Immediate game over.
    Invasion,
}

/// The grid itself, row-major, top rank first. A `None` slot is an invader
/// that has been destroyed.
#[derive(Debug)]
pub struct Formation {
    slots: Vec<Option<Invader>>,
    /// +1 sweeping east, -1 sweeping west.
    pub heading: i32,
    pub wave: u32,
    ticks: u32,
    /// Recorded at spawn; lets a session compare wave difficulty.
    pub initial_interval: u32,
}

impl Formation {
    /// Populate a full formation for `wave`, announcing every invader.
    pub fn spawn(wave: u32, ids: &mut IdGen, bus: &mut EventBus) -> Self {
        let top = start_row(wave);
        let west = (FIELD_COLS - (FORMATION_COLS as i32 - 1) * COL_PITCH - INVADER_W) / 2;
        let mut slots = Vec::with_capacity(FORMATION_COLS * FORMATION_ROWS);
        for row in 0..FORMATION_ROWS {
            let kind = InvaderKind::for_row(row);
            for col in 0..FORMATION_COLS {
                let at = Point::new(
                    west + col as i32 * COL_PITCH,
                    top + row as i32 * ROW_PITCH,
                );
                let inv = Invader {
                    id: ids.next(),
                    at,
                    kind,
                    frame: false,
                };
                bus.render(
                    inv.id,
                    EntityKind::Invader,
                    Sprite::invader(kind, false),
                    at,
                    Lifecycle::Spawned,
                );
                slots.push(Some(inv));
            }
        }
        let initial_interval = step_interval(slots.len(), wave);
        Self {
            slots,
            heading: 1,
            wave,
            ticks: 0,
            initial_interval,
        }
    }

    pub fn alive(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Current ticks-per-step, derived from the live count.
    pub fn interval(&self) -> u32 {
        step_interval(self.alive(), self.wave)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Invader> {
        self.slots.get(row * FORMATION_COLS + col)?.as_ref()
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Invader> {
        self.slots.get_mut(row * FORMATION_COLS + col)?.as_mut()
    }

    /// Live invaders, top rank first.
    pub fn iter_live(&self) -> impl Iterator<Item = &Invader> {
        self.slots.iter().flatten()
    }

    /// The lowest live invader in a formation column, if the column still
    /// has one. Only these may fire: nothing shoots through a dead comrade's
    /// old position.
    pub fn bottom_of_column(&self, col: usize) -> Option<&Invader> {
        (0..FORMATION_ROWS)
            .rev()
            .find_map(|row| self.get(row, col))
    }

    fn occupied_columns(&self) -> Vec<usize> {
        (0..FORMATION_COLS)
            .filter(|&c| self.bottom_of_column(c).is_some())
            .collect()
    }

    /// First live invader whose sprite overlaps the given rectangle,
    /// scanning the bottom rank first, west to east. The deterministic
    /// tie-break for a bullet arriving from below.
    pub fn find_hit(&self, at: Point, w: i32, h: i32) -> Option<(usize, usize)> {
        for row in (0..FORMATION_ROWS).rev() {
            for col in 0..FORMATION_COLS {
                if let Some(inv) = self.get(row, col) {
                    if crate::engine::grid::overlaps(at, w, h, inv.at, INVADER_W, INVADER_H) {
                        return Some((row, col));
                    }
                }
            }
        }
        None
    }

    /// Remove the invader in a slot, announce it, and return its points.
    pub fn destroy(&mut self, row: usize, col: usize, bus: &mut EventBus) -> u32 {
        let slot = &mut self.slots[row * FORMATION_COLS + col];
        let Some(inv) = slot.take() else {
            return 0;
        };
        bus.render(
            inv.id,
            EntityKind::Invader,
            Sprite::invader(inv.kind, inv.frame),
            inv.at,
            Lifecycle::Destroyed,
        );
        bus.sound(SoundCue::InvaderDestroyed);
        inv.kind.points()
    }

    /// Advance the formation clock by one tick, stepping when it elapses.
    ///
    /// Must not be called with an empty formation; the session guards that
    /// as an invariant.
    pub fn tick<R: Rng>(
        &mut self,
        rng: &mut R,
        bombs: &mut Vec<crate::engine::entity::Bullet>,
        ids: &mut IdGen,
        bus: &mut EventBus,
    ) -> Option<StepSignal> {
        self.ticks += 1;
        if self.ticks < self.interval() {
            return None;
        }
        self.ticks = 0;
        let signal = self.step(bus);
        if signal.is_none() {
            self.maybe_drop_bomb(rng, bombs, ids, bus);
        }
        signal
    }

    /// One lockstep move: sweep, or drop-and-reverse if the sweep would
    /// push any live invader into a wall.
    fn step(&mut self, bus: &mut EventBus) -> Option<StepSignal> {
        let dx = self.heading;
        let blocked = self.iter_live().any(|inv| {
            let next = inv.at.col + dx;
            next < WEST_WALL || next + INVADER_W > EAST_WALL
        });

        let mut invasion = false;
        for slot in self.slots.iter_mut() {
            if let Some(inv) = slot {
                if blocked {
                    inv.at.row += 1;
                } else {
                    inv.at.col += dx;
                }
                inv.frame = !inv.frame;
                if inv.at.row + INVADER_H > PLAYER_ROW {
                    invasion = true;
                }
                bus.render(
                    inv.id,
                    EntityKind::Invader,
                    Sprite::invader(inv.kind, inv.frame),
                    inv.at,
                    Lifecycle::Moved,
                );
            }
        }
        if blocked {
            self.heading = -self.heading;
        }
        invasion.then_some(StepSignal::Invasion)
    }

    fn maybe_drop_bomb<R: Rng>(
        &self,
        rng: &mut R,
        bombs: &mut Vec<crate::engine::entity::Bullet>,
        ids: &mut IdGen,
        bus: &mut EventBus,
    ) {
        if bombs.len() >= MAX_BOMBS || !rng.gen_ratio(1, 3) {
            return;
        }
        let columns = self.occupied_columns();
        if columns.is_empty() {
            return;
        }
        let col = columns[rng.gen_range(0..columns.len())];
        let Some(shooter) = self.bottom_of_column(col) else {
            return;
        };
        let at = Point::new(shooter.at.col + INVADER_W / 2, shooter.at.row + INVADER_H);
        let bomb = crate::engine::entity::Bullet {
            id: ids.next(),
            at,
            owner: crate::engine::entity::BulletOwner::Invader,
        };
        bus.render(
            bomb.id,
            EntityKind::Bullet,
            Sprite::Bomb(false),
            at,
            Lifecycle::Spawned,
        );
        bus.sound(SoundCue::InvaderFire);
        bombs.push(bomb);
    }

    /// Entity id of the invader in a slot, for tests and presentation.
    pub fn id_at(&self, row: usize, col: usize) -> Option<EntityId> {
        self.get(row, col).map(|inv| inv.id)
    }
}
