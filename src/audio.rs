//! The audio collaborator boundary.
//!
//! The engine only emits [`SoundCue`]s; whether anything is listening is
//! not its problem. A sink that fails or does not exist must never affect
//! the simulation, so the default implementation simply swallows cues.

use crate::engine::SoundCue;

/// Consumes sound cues, best-effort. No return value: a sink has no way to
/// push failure back into the loop.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// The no-device sink. Used whenever playback is unavailable or unwanted.
#[derive(Default, Debug, Clone, Copy)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, _cue: SoundCue) {}
}

/// A sink that just records what it was asked to play. Test double.
#[derive(Default, Debug)]
pub struct RecordingSink {
    pub played: Vec<SoundCue>,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: SoundCue) {
        self.played.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.play(SoundCue::PlayerFire);
        sink.play(SoundCue::InvaderDestroyed);
        assert_eq!(
            sink.played,
            vec![SoundCue::PlayerFire, SoundCue::InvaderDestroyed]
        );
    }
}
