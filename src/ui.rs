//! Presentation collaborator.
//!
//! The engine never hands out entity references; it narrates through render
//! events. [`Screen`] replays that narration into a sprite table, and
//! [`render`] paints the table (plus HUD and overlays) with ratatui each
//! frame. The engine is never consulted mid-draw for entity state.

use std::collections::BTreeMap;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::engine::entity::{EntityId, Sprite};
use crate::engine::grid::{Point, FIELD_COLS, FIELD_ROWS};
use crate::engine::{Phase, RenderEvent, MIN_COLS, MIN_ROWS};
use crate::engine::events::Lifecycle;

/// Sprite table rebuilt from the render-event stream.
#[derive(Default, Debug)]
pub struct Screen {
    sprites: BTreeMap<EntityId, (Sprite, Point)>,
}

impl Screen {
    /// Replay one render event.
    pub fn apply(&mut self, ev: RenderEvent) {
        match ev.action {
            Lifecycle::Spawned | Lifecycle::Moved => {
                self.sprites.insert(ev.id, (ev.sprite, ev.at));
            }
            Lifecycle::Destroyed => {
                self.sprites.remove(&ev.id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Sprite, &Point)> {
        self.sprites.values().map(|(s, p)| (s, p))
    }
}

/// Glyph rows and color for each sprite.
fn glyph(sprite: Sprite) -> (&'static [&'static str], Color) {
    match sprite {
        Sprite::Squid(false) => (&["▗█▖", "▞ ▚"], Color::Cyan),
        Sprite::Squid(true) => (&["▗█▖", "▚ ▞"], Color::Cyan),
        Sprite::Crab(false) => (&["▙█▟", "▘ ▝"], Color::Cyan),
        Sprite::Crab(true) => (&["▙█▟", "▝ ▘"], Color::Cyan),
        Sprite::Octopus(false) => (&["▟█▙", "▝▘▝"], Color::Cyan),
        Sprite::Octopus(true) => (&["▟█▙", "▘▝▘"], Color::Cyan),
        Sprite::Player => (&["▄█▄"], Color::Yellow),
        Sprite::PlayerWreck => (&["▘▙▁"], Color::Red),
        Sprite::Bullet => (&["╿"], Color::White),
        Sprite::Bomb(false) => (&["┇"], Color::Magenta),
        Sprite::Bomb(true) => (&["┋"], Color::Magenta),
        Sprite::Ufo => (&["▞▀▄▀▚"], Color::Red),
        Sprite::BarrierCell => (&["█"], Color::Green),
    }
}

/// Draw the whole frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    if area.width < MIN_COLS || area.height < MIN_ROWS {
        render_too_small(frame, area);
        return;
    }

    // center the fixed arena in whatever the terminal gives us
    let arena = Rect {
        x: area.x + (area.width - MIN_COLS) / 2,
        y: area.y + (area.height - MIN_ROWS) / 2,
        width: MIN_COLS,
        height: MIN_ROWS,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                 // score bar
            Constraint::Length(FIELD_ROWS as u16), // play field
            Constraint::Length(1),                 // floor
            Constraint::Length(1),                 // lives bar
        ])
        .split(arena);

    render_score_bar(frame, chunks[0], app);
    match app.engine.phase {
        Phase::Attract => render_attract(frame, chunks[1], app),
        _ => render_field(frame, chunks[1], app),
    }
    render_floor(frame, chunks[2]);
    render_lives_bar(frame, chunks[3], app);
}

fn render_too_small(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal must be at least {MIN_COLS}x{MIN_ROWS}. Resize to continue, Q to quit."
    );
    let line = Line::from(Span::styled(msg, Style::default().fg(Color::Red)));
    let y = area.height / 2;
    let row = Rect {
        x: area.x,
        y: area.y + y,
        width: area.width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(line).centered(), row);
}

fn render_score_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled("SCORE: ", Style::default().fg(Color::Blue)),
        Span::styled(
            format!("{:04}", app.engine.score),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("WAVE: ", Style::default().fg(Color::Blue)),
        Span::styled(
            format!("{}", app.engine.wave + 1),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("HIGH SCORE: ", Style::default().fg(Color::Blue)),
        Span::styled(
            format!("{:04}", app.engine.high_score),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_floor(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "▀".repeat(FIELD_COLS as usize),
        Style::default().fg(Color::Green),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_lives_bar(frame: &mut Frame, area: Rect, app: &App) {
    let spares = app.engine.lives.saturating_sub(1);
    let cannons = (0..spares).map(|_| "▄█▄ ").collect::<String>();
    let line = Line::from(Span::styled(cannons, Style::default().fg(Color::Yellow)));
    frame.render_widget(Paragraph::new(line), area);
}

/// Paint the sprite table into a character grid and emit it as lines.
fn render_field(frame: &mut Frame, area: Rect, app: &App) {
    let w = FIELD_COLS as usize;
    let h = FIELD_ROWS as usize;
    let mut grid: Vec<Vec<(char, Color)>> = vec![vec![(' ', Color::Reset); w]; h];

    for (&sprite, &at) in app.screen.iter() {
        let (rows, color) = glyph(sprite);
        for (dr, text) in rows.iter().enumerate() {
            let row = at.row + dr as i32;
            if row < 0 || row >= FIELD_ROWS {
                continue;
            }
            for (dc, ch) in text.chars().enumerate() {
                let col = at.col + dc as i32;
                if ch == ' ' || col < 0 || col >= FIELD_COLS {
                    continue;
                }
                grid[row as usize][col as usize] = (ch, color);
            }
        }
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|(ch, color)| {
                        Span::styled(String::from(ch), Style::default().fg(color))
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);

    if matches!(app.engine.phase, Phase::GameOver) {
        let y = area.y + 4;
        let row = Rect { x: area.x, y, width: area.width, height: 1 };
        let line = Line::from(vec![
            Span::styled(
                "G A M E   O V E R",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   press SPACE", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), row);
    }
}

/// The idle screen: title, flashing start prompt, score advance table.
fn render_attract(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = vec![Line::raw(""); 6];
    lines.push(
        Line::from(Span::styled(
            "S P A C E D   I N V A D E R S",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .centered(),
    );
    lines.push(Line::raw(""));

    // flash roughly once a second
    if app.engine.tick_count % 60 < 40 {
        lines.push(
            Line::from(vec![
                Span::styled("PRESS ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    "SPACE",
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" TO PLAY", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        );
    } else {
        lines.push(Line::raw(""));
    }

    lines.push(Line::raw(""));
    lines.push(
        Line::from(Span::styled(
            "SCORE ADVANCE TABLE",
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        ))
        .centered(),
    );
    let table = [
        ("▞▀▄▀▚", Color::Red, "?  MYSTERY"),
        ("▗█▖  ", Color::Cyan, "30 POINTS"),
        ("▙█▟  ", Color::Cyan, "20 POINTS"),
        ("▟█▙  ", Color::Cyan, "10 POINTS"),
    ];
    for (icon, color, points) in table {
        lines.push(
            Line::from(vec![
                Span::styled(icon, Style::default().fg(color)),
                Span::raw("   "),
                Span::styled(points, Style::default().fg(Color::White)),
            ])
            .centered(),
        );
    }
    lines.push(Line::raw(""));
    lines.push(
        Line::from(Span::styled(
            "←/→ or A/D move · SPACE fire · Q quit",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    );

    frame.render_widget(Paragraph::new(lines), area);
}
