//! The outbound event bus.
//!
//! The engine never talks to the terminal or an audio device. Everything the
//! outside world needs to know is enqueued here during a tick and drained by
//! the collaborators afterwards; enqueueing can never block or fail.

use std::collections::VecDeque;

use crate::engine::entity::{EntityId, Sprite};
use crate::engine::grid::Point;

/// Broad entity class carried on render events, for consumers that care
/// about kind rather than exact sprite.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntityKind {
    Player,
    Invader,
    Bullet,
    Ufo,
    BarrierCell,
}

/// Lifecycle action of a render event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lifecycle {
    Spawned,
    Moved,
    Destroyed,
}

/// One drawable change. `Moved` also re-states the sprite, which is how
/// animation-frame toggles and the player wreck reach the screen.
#[derive(Clone, Copy, Debug)]
pub struct RenderEvent {
    pub id: EntityId,
    pub kind: EntityKind,
    pub sprite: Sprite,
    pub at: Point,
    pub action: Lifecycle,
}

/// Discrete sound triggers. Best-effort: a missing sink changes nothing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoundCue {
    PlayerFire,
    InvaderFire,
    InvaderDestroyed,
    PlayerDestroyed,
    UfoPresent,
    UfoDestroyed,
}

/// Fire-and-forget queues drained once per tick.
#[derive(Default, Debug)]
pub struct EventBus {
    render: VecDeque<RenderEvent>,
    audio: VecDeque<SoundCue>,
}

impl EventBus {
    pub fn render(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        sprite: Sprite,
        at: Point,
        action: Lifecycle,
    ) {
        self.render.push_back(RenderEvent {
            id,
            kind,
            sprite,
            at,
            action,
        });
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.audio.push_back(cue);
    }

    /// Drain render events in emission order.
    pub fn drain_render(&mut self) -> impl Iterator<Item = RenderEvent> + '_ {
        self.render.drain(..)
    }

    /// Drain sound cues in emission order.
    pub fn drain_audio(&mut self) -> impl Iterator<Item = SoundCue> + '_ {
        self.audio.drain(..)
    }

    /// Discard everything queued, used when the session shuts down.
    pub fn clear(&mut self) {
        self.render.clear();
        self.audio.clear();
    }
}
