mod app;
mod event;
mod tree;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;

use crate::store::Store;
use crate::watch;
use app::App;
use event::KeyAction;

pub fn run(store: &Store, subject: Option<&str>, poll_interval: u64) -> Result<()> {
    let mut app = App::new(store, subject)?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, store, poll_interval);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &Store,
    poll_interval: u64,
) -> Result<()> {
    let poll_duration = Duration::from_millis(poll_interval);

    // Refresh when another process writes the store
    let (_watcher, rx) = watch::watch_store(store.path())?;

    loop {
        terminal.draw(|frame| tree::render(frame, app))?;

        if ct_event::poll(poll_duration)? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    match event::handle_key(key, app.pending_delete.is_some()) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Up => app.move_up(),
                        KeyAction::Down => app.move_down(),
                        KeyAction::ToggleCollapse => app.toggle_collapse(),
                        KeyAction::ToggleDone => app.toggle_done(store),
                        KeyAction::Delete => app.request_delete(),
                        KeyAction::Confirm => app.confirm_delete(store),
                        KeyAction::Cancel => app.cancel_delete(),
                        KeyAction::CycleFilter => app.cycle_filter(),
                        KeyAction::ToggleMode => app.toggle_mode(),
                        KeyAction::Refresh => app.refresh(store),
                        KeyAction::Continue => {}
                    }
                }
            }
        }

        // Check for store changes (non-blocking)
        if watch::wait_for_change(&rx, Duration::ZERO) {
            watch::drain_events(&rx);
            app.refresh(store);
        }
    }
}
