//! Glue between the terminal loop and the engine.
//!
//! The app owns the session and its collaborators. Keys land in the input
//! collector as they arrive; each tick it samples them, advances the
//! engine, and drains the event bus into the screen model and audio sink.

use crossterm::event::KeyEvent;

use crate::audio::{AudioSink, SilentSink};
use crate::engine::{GameError, GameSession, Phase};
use crate::input::InputCollector;
use crate::ui::Screen;

pub struct App {
    pub engine: GameSession,
    pub input: InputCollector,
    pub screen: Screen,
    pub audio: Box<dyn AudioSink>,
    pub should_quit: bool,
}

impl App {
    pub fn new(seed: u64) -> Self {
        Self {
            engine: GameSession::new(seed),
            input: InputCollector::default(),
            screen: Screen::default(),
            audio: Box::new(SilentSink),
            should_quit: false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        self.input.key(key);
    }

    /// One logical tick: sample input, advance the engine, fan the events
    /// out. An engine error here is fatal; quit flushes nothing further.
    pub fn on_tick(&mut self) -> Result<(), GameError> {
        if self.input.quit_requested() {
            self.engine.bus.clear();
            self.should_quit = true;
            return Ok(());
        }

        let was_attract = matches!(self.engine.phase, Phase::Attract);
        self.engine.tick(self.input.sample())?;

        // back on the attract screen: the old field is gone
        if matches!(self.engine.phase, Phase::Attract) && !was_attract {
            self.screen.clear();
        }

        for ev in self.engine.bus.drain_render() {
            self.screen.apply(ev);
        }
        for cue in self.engine.bus.drain_audio() {
            self.audio.play(cue);
        }
        Ok(())
    }
}
