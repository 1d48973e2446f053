use spaced_invaders::engine::entity::{Bullet, BulletOwner, EntityId};
use spaced_invaders::engine::events::{EntityKind, Lifecycle};
use spaced_invaders::engine::grid::{Point, PLAYER_ROW};
use spaced_invaders::engine::session::{GameSession, InputSample, START_LIVES};
use spaced_invaders::engine::ufo::{bonus, UFO_COUNTDOWN, UFO_ROW};
use spaced_invaders::engine::{Phase, SoundCue};

fn started(seed: u64) -> GameSession {
    let mut s = GameSession::new(seed);
    s.tick(InputSample {
        start: true,
        ..InputSample::idle()
    })
    .expect("start tick");
    s.bus.clear();
    s
}

fn fire() -> InputSample {
    InputSample {
        fire: true,
        ..InputSample::idle()
    }
}

/// Tick with no input, sweeping bombs away so the scripted scenario is not
/// interrupted by random fire.
fn idle_tick(s: &mut GameSession) {
    s.tick(InputSample::idle()).expect("tick");
    s.bombs.clear();
}

// ── start flow ────────────────────────────────────────────────────────────────

#[test]
fn start_takes_attract_to_a_fresh_game() {
    let mut s = GameSession::new(2);
    assert_eq!(s.phase, Phase::Attract);
    s.tick(fire()).expect("tick");
    assert_eq!(s.phase, Phase::Attract, "only start leaves attract");
    s.tick(InputSample {
        start: true,
        ..InputSample::idle()
    })
    .expect("tick");
    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(s.lives, START_LIVES);
    assert_eq!(s.score, 0);
    assert_eq!(s.wave, 0);
}

// ── shooting an invader ───────────────────────────────────────────────────────

#[test]
fn a_hit_scores_and_announces_exactly_once() {
    let mut s = started(7);
    s.tick(fire()).expect("fire tick");

    // walk the bullet to just under a bottom-rank octopus
    let target = s.formation.get(4, 5).expect("slot live").at;
    s.bullet.as_mut().expect("bullet in flight").at =
        Point::new(target.col + 1, target.row + 2);
    s.bus.clear();

    idle_tick(&mut s);

    assert_eq!(s.score, 10, "octopus pays 10");
    assert!(s.bullet.is_none(), "the shot is spent");
    assert!(s.refire_delay > 0, "cooldown armed");
    assert_eq!(s.formation.alive(), 54);

    let destroyed = s
        .bus
        .drain_render()
        .filter(|e| e.kind == EntityKind::Invader && e.action == Lifecycle::Destroyed)
        .count();
    assert_eq!(destroyed, 1);
    let cues: Vec<_> = s.bus.drain_audio().collect();
    assert_eq!(cues, vec![SoundCue::InvaderDestroyed]);
}

#[test]
fn the_cannon_holds_one_bullet() {
    let mut s = started(7);
    s.tick(fire()).expect("tick");
    let first = s.bullet.as_ref().expect("bullet in flight").id;
    for _ in 0..5 {
        s.tick(fire()).expect("tick");
        s.bombs.clear();
    }
    assert_eq!(s.shots_fired, 1);
    assert_eq!(s.bullet.as_ref().map(|b| b.id), Some(first));
}

// ── losing the last life ──────────────────────────────────────────────────────

#[test]
fn last_life_runs_the_death_animation_into_game_over() {
    let mut s = started(13);
    s.lives = 1;

    // a bomb one row above the cannon connects on the next tick
    s.bombs.push(Bullet {
        id: EntityId(9_999),
        at: Point::new(s.player.at.col + 1, PLAYER_ROW - 1),
        owner: BulletOwner::Invader,
    });
    s.bus.clear();
    s.tick(InputSample::idle()).expect("tick");

    assert_eq!(s.phase, Phase::PlayerDying { ticks_left: 90 });
    assert_eq!(s.lives, 0);
    let cues: Vec<_> = s.bus.drain_audio().collect();
    assert!(cues.contains(&SoundCue::PlayerDestroyed));

    // the wreck holds for the full animation, then the game is over
    for _ in 0..90 {
        s.tick(InputSample::idle()).expect("tick");
        assert!(matches!(s.phase, Phase::PlayerDying { .. }));
    }
    s.tick(InputSample::idle()).expect("tick");
    assert_eq!(s.phase, Phase::GameOver);

    // nothing but start means anything now
    s.tick(fire()).expect("tick");
    assert_eq!(s.phase, Phase::GameOver);
    assert!(s.bullet.is_none());
    s.tick(InputSample {
        start: true,
        ..InputSample::idle()
    })
    .expect("tick");
    assert_eq!(s.phase, Phase::Attract);
}

#[test]
fn spare_lives_buy_a_respawn() {
    let mut s = started(13);
    s.bombs.push(Bullet {
        id: EntityId(9_998),
        at: Point::new(s.player.at.col + 1, PLAYER_ROW - 1),
        owner: BulletOwner::Invader,
    });
    s.tick(InputSample::idle()).expect("tick");
    assert_eq!(s.lives, START_LIVES - 1);
    assert!(matches!(s.phase, Phase::PlayerDying { .. }));
    for _ in 0..91 {
        s.tick(InputSample::idle()).expect("tick");
    }
    assert_eq!(s.phase, Phase::Playing);
}

// ── invasion ──────────────────────────────────────────────────────────────────

#[test]
fn formation_landing_ends_the_game_despite_spare_lives() {
    let mut s = started(31);
    assert_eq!(s.lives, START_LIVES);

    // drag one invader to the east wall, so the next blocked step drops the
    // formation past the cannon line
    s.formation.get_mut(4, 0).expect("slot live").at = Point::new(75, PLAYER_ROW - 2);

    for _ in 0..200 {
        idle_tick(&mut s);
        assert!(
            matches!(s.phase, Phase::Playing | Phase::GameOver),
            "a landing must not detour through the death animation"
        );
        if s.phase == Phase::GameOver {
            break;
        }
    }
    assert_eq!(s.phase, Phase::GameOver);
    assert_eq!(s.lives, 0, "spare cannons do not survive a landing");
    let cues: Vec<_> = s.bus.drain_audio().collect();
    assert!(cues.contains(&SoundCue::PlayerDestroyed));
}

// ── the bonus ship ────────────────────────────────────────────────────────────

#[test]
fn odd_shot_count_brings_the_ship_in_from_the_east() {
    let mut s = started(29);
    s.shots_fired = 23;

    for _ in 0..UFO_COUNTDOWN {
        idle_tick(&mut s);
        assert_eq!(s.phase, Phase::Playing);
    }
    let ship = s.ufo.ufo.as_ref().expect("ship is crossing");
    assert_eq!(ship.heading, -1);
    assert_eq!(ship.at.row, UFO_ROW);

    // let it drift into the open field
    for _ in 0..20 {
        idle_tick(&mut s);
    }
    let ship_at = s.ufo.ufo.as_ref().expect("still crossing").at;

    // the 24th shot downs it on the jackpot slot
    s.tick(fire()).expect("fire tick");
    assert_eq!(s.shots_fired, 24);
    s.bullet.as_mut().expect("bullet in flight").at =
        Point::new(ship_at.col + 2, UFO_ROW + 1);
    s.bus.clear();
    idle_tick(&mut s);

    assert_eq!(bonus(24), 300);
    assert_eq!(s.score, 300);
    assert!(s.ufo.ufo.is_none());
    // the window restarted this tick and has already counted one down
    assert_eq!(s.ufo.countdown(), UFO_COUNTDOWN - 1);
    let cues: Vec<_> = s.bus.drain_audio().collect();
    assert!(cues.contains(&SoundCue::UfoDestroyed));
}
