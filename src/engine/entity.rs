//! Entity records for everything that moves or can be shot.

use crate::engine::grid::Point;

/// Width of an invader sprite in cells.
pub const INVADER_W: i32 = 3;
/// Height of an invader sprite in cells.
pub const INVADER_H: i32 = 2;
/// Width of the player cannon in cells.
pub const PLAYER_W: i32 = 3;
pub const PLAYER_H: i32 = 1;
/// Width of the bonus ship in cells.
pub const UFO_W: i32 = 5;
pub const UFO_H: i32 = 1;

/// Opaque identity for a render-event stream entry. Presentation keys its
/// sprite table on this, so moves and destroys land on the right glyph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct EntityId(pub u32);

/// Hands out fresh entity ids for one session.
#[derive(Default, Debug)]
pub struct IdGen {
    next: u32,
}

impl IdGen {
    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// The three invader ranks, top of the formation to bottom.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InvaderKind {
    Squid,
    Crab,
    Octopus,
}

impl InvaderKind {
    /// Score awarded when this rank is destroyed.
    pub fn points(self) -> u32 {
        match self {
            InvaderKind::Squid => 30,
            InvaderKind::Crab => 20,
            InvaderKind::Octopus => 10,
        }
    }

    /// Rank occupying the given formation row (0 = top).
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => InvaderKind::Squid,
            1 | 2 => InvaderKind::Crab,
            _ => InvaderKind::Octopus,
        }
    }
}

/// One member of the formation.
#[derive(Clone, Debug)]
pub struct Invader {
    pub id: EntityId,
    pub at: Point,
    pub kind: InvaderKind,
    /// Animation frame, toggled on every formation step.
    pub frame: bool,
}

/// The player's cannon.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: EntityId,
    pub at: Point,
}

/// Who launched a bullet; decides travel direction and collision set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BulletOwner {
    Player,
    Invader,
}

/// A shot in flight, one cell, one cell per tick.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub id: EntityId,
    pub at: Point,
    pub owner: BulletOwner,
}

/// The bonus ship crossing the top of the field.
#[derive(Clone, Debug)]
pub struct Ufo {
    pub id: EntityId,
    pub at: Point,
    /// +1 travelling east, -1 travelling west.
    pub heading: i32,
}

/// Everything the presentation layer can be asked to draw.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sprite {
    Squid(bool),
    Crab(bool),
    Octopus(bool),
    Player,
    PlayerWreck,
    Bullet,
    Bomb(bool),
    Ufo,
    BarrierCell,
}

impl Sprite {
    pub fn invader(kind: InvaderKind, frame: bool) -> Self {
        match kind {
            InvaderKind::Squid => Sprite::Squid(frame),
            InvaderKind::Crab => Sprite::Crab(frame),
            InvaderKind::Octopus => Sprite::Octopus(frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_points_follow_the_advance_table() {
        assert_eq!(InvaderKind::Squid.points(), 30);
        assert_eq!(InvaderKind::Crab.points(), 20);
        assert_eq!(InvaderKind::Octopus.points(), 10);
    }

    #[test]
    fn ranks_by_formation_row() {
        assert_eq!(InvaderKind::for_row(0), InvaderKind::Squid);
        assert_eq!(InvaderKind::for_row(1), InvaderKind::Crab);
        assert_eq!(InvaderKind::for_row(2), InvaderKind::Crab);
        assert_eq!(InvaderKind::for_row(3), InvaderKind::Octopus);
        assert_eq!(InvaderKind::for_row(4), InvaderKind::Octopus);
    }

    #[test]
    fn ids_are_unique() {
        let mut gen = IdGen::default();
        let a = gen.next();
        let b = gen.next();
        assert_ne!(a, b);
    }
}
