//! Per-tick collision resolution.
//!
//! Runs once per tick, after movement and the formation step. Scan order is
//! fixed and identical every tick. Each bullet gets exactly one outcome: a
//! shot that chews into a shield never also reaches the invader behind it.
//!
//! Player bullet: field top, then barrier cells, then invaders (bottom rank
//! first, west to east), then the bonus ship. Bombs: field floor, then the
//! player, then barrier cells. Finally, invaders that have descended into a
//! shield grind its cells away.

use crate::engine::entity::{
    Bullet, Sprite, INVADER_H, INVADER_W, PLAYER_H, PLAYER_W, UFO_H, UFO_W,
};
use crate::engine::events::{EntityKind, Lifecycle, SoundCue};
use crate::engine::grid::{overlaps, Point, FIELD_ROWS, TOP_ROW};
use crate::engine::session::GameSession;

/// What the resolver needs to tell the state machine.
#[derive(Clone, Copy, Default, Debug)]
pub struct Resolution {
    pub player_hit: bool,
}

pub(crate) fn resolve(s: &mut GameSession) -> Resolution {
    let mut out = Resolution::default();
    resolve_player_bullet(s);
    out.player_hit = resolve_bombs(s);
    erode_under_invaders(s);
    out
}

fn retire(s: &mut GameSession, bullet: &Bullet, sprite: Sprite) {
    s.bus.render(
        bullet.id,
        EntityKind::Bullet,
        sprite,
        bullet.at,
        Lifecycle::Destroyed,
    );
}

fn resolve_player_bullet(s: &mut GameSession) {
    let Some(bullet) = s.bullet.take() else {
        return;
    };

    // burned out at the top of the field, no damage
    if bullet.at.row < TOP_ROW {
        retire(s, &bullet, Sprite::Bullet);
        s.arm_refire();
        return;
    }

    // shields soak the shot before anything behind them
    for i in 0..s.barriers.len() {
        if s.barriers[i].erode(bullet.at, &mut s.bus) {
            retire(s, &bullet, Sprite::Bullet);
            s.arm_refire();
            return;
        }
    }

    // formation scan, bottom rank first
    if let Some((row, col)) = s.formation.find_hit(bullet.at, 1, 1) {
        let points = s.formation.destroy(row, col, &mut s.bus);
        retire(s, &bullet, Sprite::Bullet);
        s.arm_refire();
        s.award(points);
        return;
    }

    // the bonus ship
    let ufo_hit = s
        .ufo
        .ufo
        .as_ref()
        .is_some_and(|u| overlaps(bullet.at, 1, 1, u.at, UFO_W, UFO_H));
    if ufo_hit {
        let bonus = s.ufo.shoot_down(s.shots_fired, &mut s.bus);
        retire(s, &bullet, Sprite::Bullet);
        s.arm_refire();
        s.award(bonus);
        return;
    }

    s.bullet = Some(bullet);
}

fn resolve_bombs(s: &mut GameSession) -> bool {
    let mut player_hit = false;
    let bombs = std::mem::take(&mut s.bombs);
    for bomb in bombs {
        // splashed on the floor, no damage
        if bomb.at.row >= FIELD_ROWS - 1 {
            retire(s, &bomb, Sprite::Bomb(false));
            continue;
        }

        // the player, unless another bomb already connected this tick
        if !player_hit && overlaps(bomb.at, 1, 1, s.player.at, PLAYER_W, PLAYER_H) {
            player_hit = true;
            retire(s, &bomb, Sprite::Bomb(false));
            continue;
        }

        // shield cells
        let mut soaked = false;
        for i in 0..s.barriers.len() {
            if s.barriers[i].erode(bomb.at, &mut s.bus) {
                retire(s, &bomb, Sprite::Bomb(false));
                soaked = true;
                break;
            }
        }
        if !soaked {
            s.bombs.push(bomb);
        }
    }
    player_hit
}

/// Invaders that reach shield height plough straight through the cells
/// their sprites cover.
fn erode_under_invaders(s: &mut GameSession) {
    let mut trampled: Vec<Point> = Vec::new();
    for inv in s.formation.iter_live() {
        for dr in 0..INVADER_H {
            for dc in 0..INVADER_W {
                let p = Point::new(inv.at.col + dc, inv.at.row + dr);
                if s.barriers.iter().any(|b| b.cell_at(p)) {
                    trampled.push(p);
                }
            }
        }
    }
    for p in trampled {
        for i in 0..s.barriers.len() {
            if s.barriers[i].erode(p, &mut s.bus) {
                break;
            }
        }
    }
}

/// Emit the player-death presentation for a hit resolved this tick.
pub(crate) fn mark_player_down(s: &mut GameSession) {
    s.bus.render(
        s.player.id,
        EntityKind::Player,
        Sprite::PlayerWreck,
        s.player.at,
        Lifecycle::Moved,
    );
    s.bus.sound(SoundCue::PlayerDestroyed);
}
