use crate::tui::app::{AppState, MENU};
use ratatui::prelude::*;
use ratatui::widgets::*;

pub fn draw(f: &mut Frame, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(14)])
        .split(f.area());
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    draw_roster(f, app, top[0]);
    draw_status(f, app, top[1]);
    draw_menu(f, app, bottom[0]);
    draw_log(f, app, bottom[1]);

    if app.prompt().is_some() {
        draw_prompt(f, app);
    }
}

fn draw_roster(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .title(format!("Players ({})", app.roster.len()))
        .borders(Borders::ALL);
    let mut lines: Vec<Line> = Vec::new();
    for p in app.roster.players() {
        let rec = p.record();
        lines.push(Line::from(format!(
            "ID:{} {} Bal:{:.2} W:{} L:{} D:{} Cards:{}",
            p.id(),
            p.name(),
            p.balance(),
            rec.wins,
            rec.losses,
            rec.draws,
            p.cards_owned()
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "no players yet",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title("bingo-rs").borders(Borders::ALL);
    let s = &app.settings;
    let mut lines = vec![
        Line::from(format!("Total matches: {}", app.ledger.total_matches())),
        Line::from(format!("Saved pot: {:.2}", app.ledger.saved_pot())),
        Line::from(""),
    ];
    if app.game.is_active() {
        lines.push(Line::from(Span::styled(
            format!("Match #{} ({})", app.game.match_number(), app.game.mode().label()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("Card cost: {:.2}", app.game.card_cost())));
        lines.push(Line::from(format!("Pot: {:.2}", app.game.pot())));
        let winners: Vec<String> =
            app.game.winners().iter().map(|id| id.to_string()).collect();
        lines.push(Line::from(format!(
            "Winners: {}",
            if winners.is_empty() { "-".to_string() } else { winners.join(", ") }
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "no active match",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Config: normal {:.2} | full house {:.2} | save {:.0}% | multi {}",
        s.normal_card_cost(),
        s.fullhouse_card_cost(),
        s.saved_pot_percentage() * 100.0,
        if s.allow_multi_winners() { "on" } else { "off" }
    )));
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn draw_menu(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .title("Menu  [↑/↓] Move  [Enter] Select  [Q] Quit")
        .borders(Borders::ALL);
    let visible = block.inner(area).height as usize;
    // Keep the highlighted entry on screen.
    let offset = app.menu_index.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = MENU
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, a)| {
            let style = if i == app.menu_index {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(a.label(), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_log(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title("Log").borders(Borders::ALL);
    let visible = block.inner(area).height as usize;
    let start = app.log().len().saturating_sub(visible);
    let lines: Vec<Line> =
        app.log()[start..].iter().map(|m| Line::from(m.as_str())).collect();
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn draw_prompt(f: &mut Frame, app: &AppState) {
    let Some(p) = app.prompt() else { return };
    let area = centered_rect(50, 30, f.area());
    let block = Block::default()
        .title(p.action.label())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let mut lines: Vec<Line> = Vec::new();
    for (i, label) in p.labels.iter().enumerate() {
        let marker = if i == p.current { "> " } else { "  " };
        let style = if i == p.current {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{label}: {}", p.values[i]),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] Next/Submit  [Esc] Cancel",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
