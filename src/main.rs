mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use tui_roads::config::{Args, Config};
use tui_roads::data;

/// Keyboard pan step in Braille pixels
const PAN_STEP_X: f64 = 20.0;
const PAN_STEP_Y: f64 = 12.0;

fn main() -> Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config)?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, config);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(ref err) = result {
        tracing::error!(error = %err, "exiting with error");
    }
    result
}

/// Log to a file; the terminal belongs to the UI. Level comes from `RUST_LOG`.
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_initial(app: &mut App, config: &Config) {
    match &config.file {
        Some(path) => match data::load_file(path) {
            Ok(network) => app.load(network),
            Err(err) => app.load_failed(format!("{}: {err}", path.display())),
        },
        None => app.load(data::generate_demo_city()),
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.wheel_at(mouse.column, mouse.row, true, now),
        MouseEventKind::ScrollDown => app.wheel_at(mouse.column, mouse.row, false, now),
        // Horizontal scroll pans (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-PAN_STEP_X, 0.0, now),
        MouseEventKind::ScrollRight => app.pan(PAN_STEP_X, 0.0, now),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row, now);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: Config) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config.clone(), size.width as usize, size.height as usize);
    load_initial(&mut app, &config);

    loop {
        let now = Instant::now();
        app.tick(now);
        app.update_plan();
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps; polling also drives the settle and resize timers
        if event::poll(Duration::from_millis(16))? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    KeyCode::Left | KeyCode::Char('h') => app.pan(-PAN_STEP_X, 0.0, now),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(PAN_STEP_X, 0.0, now),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0.0, -PAN_STEP_Y, now),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0.0, PAN_STEP_Y, now),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(now),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(now),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
                    KeyCode::Char('c') | KeyCode::Char('C') => app.clear(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse, now),
                Event::Resize(width, height) => app.resize(width as usize, height as usize, now),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
