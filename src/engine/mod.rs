//! The authoritative simulation.
//!
//! Everything in this module is pure state-plus-tick: no terminal, no audio
//! device, no clock. The outside world feeds one [`session::InputSample`]
//! per tick and drains the [`events::EventBus`] afterwards.

pub mod barrier;
pub mod collision;
pub mod entity;
pub mod events;
pub mod formation;
pub mod grid;
pub mod session;
pub mod ufo;

use std::error::Error;
use std::fmt;

pub use events::{EventBus, RenderEvent, SoundCue};
pub use session::{GameSession, InputSample, MoveDir, Phase};

/// Logical tick period. The simulation itself only counts ticks; this is
/// what the outer loop paces them at.
pub const TICK_MS: u64 = 16;

/// Rows the HUD adds around the field: score bar, floor line, lives bar.
pub const CHROME_ROWS: u16 = 3;

/// Smallest host surface the game will accept.
pub const MIN_COLS: u16 = grid::FIELD_COLS as u16;
pub const MIN_ROWS: u16 = grid::FIELD_ROWS as u16 + CHROME_ROWS;

/// Fatal engine-side failures. Collaborator hiccups (a missing audio sink,
/// a slow terminal) are not errors here; they are absorbed at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The host surface cannot hold the playable grid. Raised before any
    /// tick runs.
    SurfaceTooSmall { cols: u16, rows: u16 },
    /// A simulation invariant broke. Programming defect; the session must
    /// abort rather than run on corrupted state.
    Invariant(&'static str),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::SurfaceTooSmall { cols, rows } => write!(
                f,
                "terminal is {cols}x{rows}; need at least {MIN_COLS}x{MIN_ROWS}"
            ),
            GameError::Invariant(what) => write!(f, "engine invariant violated: {what}"),
        }
    }
}

impl Error for GameError {}

/// Reject a host surface that cannot hold the field plus HUD.
pub fn check_surface(cols: u16, rows: u16) -> Result<(), GameError> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        return Err(GameError::SurfaceTooSmall { cols, rows });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_check_is_fatal_before_play() {
        assert!(check_surface(MIN_COLS, MIN_ROWS).is_ok());
        assert!(matches!(
            check_surface(MIN_COLS - 1, MIN_ROWS),
            Err(GameError::SurfaceTooSmall { .. })
        ));
        assert!(matches!(
            check_surface(MIN_COLS, MIN_ROWS - 1),
            Err(GameError::SurfaceTooSmall { .. })
        ));
    }
}
