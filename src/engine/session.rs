//! The game session: all mutable state, the phase machine, and the
//! fixed-order tick.
//!
//! One `GameSession` value owns every entity. Nothing outside the engine
//! mutates it; the outer loop hands in one sampled input per tick and the
//! session answers through the event bus.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::engine::barrier::Barrier;
use crate::engine::collision;
use crate::engine::entity::{
    Bullet, BulletOwner, IdGen, Player, Sprite, PLAYER_W,
};
use crate::engine::events::{EntityKind, EventBus, Lifecycle, SoundCue};
use crate::engine::formation::{Formation, StepSignal};
use crate::engine::grid::{Point, FIELD_COLS, PLAYER_ROW};
use crate::engine::ufo::UfoControl;
use crate::engine::GameError;

/// Lives at the start of a game.
pub const START_LIVES: u32 = 3;
/// Crossing this score awards one extra life, once per game.
pub const EXTRA_LIFE_AT: u32 = 1500;
/// Ticks the cannon stays cold after a bullet dies.
pub const REFIRE_DELAY: u32 = 20;
/// Ticks the player stays down after a hit.
pub const DEATH_TICKS: u32 = 90;
/// Ticks of pause between clearing a wave and the next one spawning.
pub const WAVE_CLEAR_TICKS: u32 = 75;

const PLAYER_START_COL: i32 = 4;

/// Movement half of an input sample. Most-recent-wins within a tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
}

/// Everything the engine accepts from the outside world in one tick.
/// `fire` and `start` are edge-triggered: at most one of each per tick,
/// however long the key is held.
#[derive(Clone, Copy, Default, Debug)]
pub struct InputSample {
    pub dir: Option<MoveDir>,
    pub fire: bool,
    pub start: bool,
}

impl InputSample {
    /// A tick with no operator at the controls.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Top-level game phases.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Idle screen; waiting for a start press.
    Attract,
    Playing,
    /// Hit animation; simulation frozen until the counter runs out.
    PlayerDying { ticks_left: u32 },
    /// Formation emptied; pause before the next, meaner wave.
    WaveClear { ticks_left: u32 },
    /// Lives exhausted or invasion complete. Start returns to Attract.
    GameOver,
}

/// The whole game in one owned value.
#[derive(Debug)]
pub struct GameSession {
    pub phase: Phase,
    pub score: u32,
    /// Best score this process has seen; nothing is persisted.
    pub high_score: u32,
    pub lives: u32,
    pub wave: u32,
    pub tick_count: u64,

    pub player: Player,
    /// The single player bullet, if one is in flight.
    pub bullet: Option<Bullet>,
    pub refire_delay: u32,
    /// Total shots this game; feeds the bonus-ship scoring quirk.
    pub shots_fired: u32,
    pub bombs: Vec<Bullet>,
    pub formation: Formation,
    pub barriers: Vec<Barrier>,
    pub ufo: UfoControl,

    pub bus: EventBus,
    pub(crate) rng: SmallRng,
    pub(crate) ids: IdGen,
    extra_life_given: bool,
}

impl GameSession {
    /// A fresh session in Attract, with an explicitly seeded random source
    /// so every run of a seed is identical.
    pub fn new(seed: u64) -> Self {
        let mut ids = IdGen::default();
        let mut bus = EventBus::default();
        let formation = Formation::spawn(0, &mut ids, &mut bus);
        let player = Player {
            id: ids.next(),
            at: Point::new(PLAYER_START_COL, PLAYER_ROW),
        };
        // nothing on the attract screen is drawn from entity state
        bus.clear();
        Self {
            phase: Phase::Attract,
            score: 0,
            high_score: 0,
            lives: START_LIVES,
            wave: 0,
            tick_count: 0,
            player,
            bullet: None,
            refire_delay: 0,
            shots_fired: 0,
            bombs: Vec::new(),
            formation,
            barriers: Vec::new(),
            ufo: UfoControl::default(),
            bus,
            rng: SmallRng::seed_from_u64(seed),
            ids,
            extra_life_given: false,
        }
    }

    /// Advance the simulation by one logical tick.
    pub fn tick(&mut self, input: InputSample) -> Result<(), GameError> {
        self.tick_count += 1;
        match self.phase {
            Phase::Attract => {
                if input.start {
                    self.start_game();
                }
            }
            Phase::GameOver => {
                if input.start {
                    self.bus.clear();
                    self.phase = Phase::Attract;
                }
            }
            Phase::WaveClear { ticks_left } => {
                if ticks_left == 0 {
                    self.next_wave();
                } else {
                    self.phase = Phase::WaveClear {
                        ticks_left: ticks_left - 1,
                    };
                }
            }
            Phase::PlayerDying { ticks_left } => {
                if ticks_left == 0 {
                    if self.lives == 0 {
                        self.phase = Phase::GameOver;
                    } else {
                        self.respawn_player();
                        self.phase = Phase::Playing;
                    }
                } else {
                    self.phase = Phase::PlayerDying {
                        ticks_left: ticks_left - 1,
                    };
                }
            }
            Phase::Playing => return self.play_tick(input),
        }
        Ok(())
    }

    /// One tick of live play, in the fixed order: input, movement,
    /// formation step, collisions, bonus ship.
    fn play_tick(&mut self, input: InputSample) -> Result<(), GameError> {
        // input: movement clamps to the field, it never errors
        let mut at = self.player.at;
        match input.dir {
            Some(MoveDir::Left) => at.col -= 1,
            Some(MoveDir::Right) => at.col += 1,
            None => {}
        }
        at.col = at.col.clamp(1, FIELD_COLS - 1 - PLAYER_W);
        if at != self.player.at {
            self.player.at = at;
            self.bus.render(
                self.player.id,
                EntityKind::Player,
                Sprite::Player,
                at,
                Lifecycle::Moved,
            );
        }

        self.refire_delay = self.refire_delay.saturating_sub(1);
        if input.fire {
            self.try_fire();
        }

        // movement: one cell per tick, every active bullet
        if let Some(bullet) = self.bullet.as_mut() {
            bullet.at.row -= 1;
            self.bus.render(
                bullet.id,
                EntityKind::Bullet,
                Sprite::Bullet,
                bullet.at,
                Lifecycle::Moved,
            );
        }
        let bomb_frame = self.tick_count % 8 < 4;
        for bomb in self.bombs.iter_mut() {
            bomb.at.row += 1;
            self.bus.render(
                bomb.id,
                EntityKind::Bullet,
                Sprite::Bomb(bomb_frame),
                bomb.at,
                Lifecycle::Moved,
            );
        }

        // formation step
        if self.formation.alive() == 0 {
            return Err(GameError::Invariant("formation stepped with no invaders"));
        }
        let signal =
            self.formation
                .tick(&mut self.rng, &mut self.bombs, &mut self.ids, &mut self.bus);
        if signal == Some(StepSignal::Invasion) {
            // the landing ends the game whatever the spare-cannon count
            collision::mark_player_down(self);
            self.lives = 0;
            self.phase = Phase::GameOver;
            return Ok(());
        }

        // collisions
        let outcome = collision::resolve(self);
        if outcome.player_hit {
            self.lives = self.lives.saturating_sub(1);
            collision::mark_player_down(self);
            self.phase = Phase::PlayerDying {
                ticks_left: DEATH_TICKS,
            };
            return Ok(());
        }

        // wave clear: exactly one transition per emptied formation
        if self.formation.alive() == 0 {
            self.ufo.dismiss(&mut self.bus);
            self.phase = Phase::WaveClear {
                ticks_left: WAVE_CLEAR_TICKS,
            };
            return Ok(());
        }

        // bonus ship
        self.ufo.tick(
            self.shots_fired,
            self.formation.alive(),
            &mut self.ids,
            &mut self.bus,
        );
        Ok(())
    }

    fn try_fire(&mut self) {
        // one bullet in flight, and a cold cannon stays cold
        if self.bullet.is_some() || self.refire_delay > 0 {
            return;
        }
        let at = Point::new(self.player.at.col + PLAYER_W / 2, PLAYER_ROW - 1);
        let bullet = Bullet {
            id: self.ids.next(),
            at,
            owner: BulletOwner::Player,
        };
        self.bus.render(
            bullet.id,
            EntityKind::Bullet,
            Sprite::Bullet,
            at,
            Lifecycle::Spawned,
        );
        self.bus.sound(SoundCue::PlayerFire);
        self.bullet = Some(bullet);
        self.shots_fired += 1;
    }

    /// Bank points, roll the high score, and hand out the one extra life.
    pub(crate) fn award(&mut self, points: u32) {
        self.score += points;
        if !self.extra_life_given && self.score >= EXTRA_LIFE_AT {
            self.lives += 1;
            self.extra_life_given = true;
        }
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    /// Start the cooldown after a bullet leaves play, however it died.
    pub(crate) fn arm_refire(&mut self) {
        self.refire_delay = REFIRE_DELAY;
    }

    fn start_game(&mut self) {
        self.bus.clear();
        self.score = 0;
        self.lives = START_LIVES;
        self.wave = 0;
        self.shots_fired = 0;
        self.extra_life_given = false;
        self.spawn_wave(0);
        self.player.at = Point::new(PLAYER_START_COL, PLAYER_ROW);
        self.bus.render(
            self.player.id,
            EntityKind::Player,
            Sprite::Player,
            self.player.at,
            Lifecycle::Spawned,
        );
        self.phase = Phase::Playing;
    }

    fn next_wave(&mut self) {
        self.wave += 1;
        self.spawn_wave(self.wave);
        self.player.at = Point::new(PLAYER_START_COL, PLAYER_ROW);
        self.bus.render(
            self.player.id,
            EntityKind::Player,
            Sprite::Player,
            self.player.at,
            Lifecycle::Moved,
        );
        self.phase = Phase::Playing;
    }

    /// Fresh formation and shields; in-flight ordnance is swept away.
    fn spawn_wave(&mut self, wave: u32) {
        if let Some(bullet) = self.bullet.take() {
            self.bus.render(
                bullet.id,
                EntityKind::Bullet,
                Sprite::Bullet,
                bullet.at,
                Lifecycle::Destroyed,
            );
        }
        for bomb in self.bombs.drain(..) {
            self.bus.render(
                bomb.id,
                EntityKind::Bullet,
                Sprite::Bomb(false),
                bomb.at,
                Lifecycle::Destroyed,
            );
        }
        self.refire_delay = 0;
        self.ufo.dismiss(&mut self.bus);
        self.formation = Formation::spawn(wave, &mut self.ids, &mut self.bus);
        self.barriers = Barrier::rank_positions()
            .into_iter()
            .map(|at| Barrier::spawn(at, &mut self.ids, &mut self.bus))
            .collect();
    }

    fn respawn_player(&mut self) {
        self.player.at = Point::new(PLAYER_START_COL, PLAYER_ROW);
        self.bus.render(
            self.player.id,
            EntityKind::Player,
            Sprite::Player,
            self.player.at,
            Lifecycle::Moved,
        );
    }
}
