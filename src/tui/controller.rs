use crate::tui::app::AppState;
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    poll_rate: Duration,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                if handle_key(app, key.code) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if app.prompt().is_some() {
        match code {
            KeyCode::Esc => app.prompt_cancel(),
            KeyCode::Enter => app.prompt_enter(),
            KeyCode::Backspace => app.prompt_backspace(),
            KeyCode::Char(c) => app.prompt_char(c),
            _ => {}
        }
        return false;
    }

    match code {
        KeyCode::Up => app.menu_prev(),
        KeyCode::Down => app.menu_next(),
        KeyCode::Enter => return app.menu_select(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
