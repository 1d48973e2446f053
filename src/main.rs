use std::error::Error;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use spaced_invaders::app::App;
use spaced_invaders::engine;
use spaced_invaders::event::{Event, EventPump};
use spaced_invaders::ui;

fn main() -> Result<(), Box<dyn Error>> {
    // refuse a surface that can't hold the arena, before any tick runs
    let (cols, rows) = crossterm::terminal::size()?;
    engine::check_surface(cols, rows)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut app = App::new(seed);
    let pump = EventPump::new(engine::TICK_MS);

    let result = run(&mut terminal, &mut app, &pump);

    // Restore terminal whatever happened inside the loop
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    pump: &EventPump,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match pump.next()? {
            Event::Tick => app.on_tick()?,
            Event::Key(key) => app.on_key(key),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
