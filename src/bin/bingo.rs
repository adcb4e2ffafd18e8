use bingo_rs::tui::{app::AppState, controller};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> io::Result<()> {
    if !io::stdout().is_terminal() {
        println!(
            "bingo-rs requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            bingo_rs::VERSION
        );
        return Ok(());
    }
    let mut terminal = setup_terminal()?;
    let poll_rate = Duration::from_millis(250);
    let mut app = AppState::load("data");

    let res = controller::run(&mut terminal, &mut app, poll_rate);

    // Checkpoint on the way out, matching the save-on-exit behavior of the
    // menu's manual checkpoint.
    app.save_snapshots();

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    res
}
