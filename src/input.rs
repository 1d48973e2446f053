//! Keyboard decoding and per-tick input sampling.
//!
//! Terminal input arrives as key-press events on their own schedule; the
//! engine wants exactly one [`InputSample`] per tick. The collector absorbs
//! presses as they come and hands the engine an edge-triggered snapshot:
//! movement is most-recent-wins, fire and start latch at most once per tick.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::{InputSample, MoveDir};

#[derive(Default, Debug)]
pub struct InputCollector {
    dir: Option<MoveDir>,
    fire: bool,
    start: bool,
    quit: bool,
}

impl InputCollector {
    /// Absorb one key press. Never blocks, never queues more than one
    /// edge per tick.
    pub fn key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }
        match key.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.dir = Some(MoveDir::Left);
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.dir = Some(MoveDir::Right);
            }
            KeyCode::Char(' ') => {
                // space both fires and starts; the engine picks by phase
                self.fire = true;
                self.start = true;
            }
            KeyCode::Enter => self.start = true,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
            _ => {}
        }
    }

    /// Take this tick's sample, clearing every latch.
    pub fn sample(&mut self) -> InputSample {
        InputSample {
            dir: self.dir.take(),
            fire: std::mem::take(&mut self.fire),
            start: std::mem::take(&mut self.start),
        }
    }

    /// True once a quit key has been seen. Sticky.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}
