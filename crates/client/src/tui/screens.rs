use std::time::Instant;

use dingdong::{ConnectionStatus, GameMode, PeerRole};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::CourtPainter;
use crate::app::{App, AppState};
use crate::events::{MatchSetup, MenuScreen};
use crate::game::{Match, Outcome};
use crate::menu::{MAIN_ITEMS, MODE_ITEMS, MULTIPLAYER_ITEMS, MenuState};

pub fn render(frame: &mut Frame, app: &App, painter: &CourtPainter, now: Instant) {
    let area = frame.area();

    let block = Block::default()
        .title(" Ding Dong ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0)])
        .split(area)[0];

    match app.state() {
        AppState::Menu | AppState::Exit => render_menu(frame, inner, app.menu(), app.sound_on()),
        AppState::Connecting(setup) => render_connecting(frame, inner, setup),
        AppState::Playing(game) => render_match(frame, inner, game, painter, now),
    }
}

fn render_menu(frame: &mut Frame, area: Rect, menu: &MenuState, sound_on: bool) {
    match menu.screen {
        MenuScreen::Main => {
            let sound = format!("Sound: {}", if sound_on { "On" } else { "Off" });
            let items: Vec<&str> = MAIN_ITEMS
                .iter()
                .map(|&item| if item == "Sound" { sound.as_str() } else { item })
                .collect();
            render_list(frame, area, " Menu ", &items, menu.selected, menu.error.as_deref());
        }
        MenuScreen::GameModes => {
            render_list(frame, area, " Game Modes ", &MODE_ITEMS, menu.selected, None)
        }
        MenuScreen::MultiplayerOptions => render_list(
            frame,
            area,
            " Online Multiplayer ",
            &MULTIPLAYER_ITEMS,
            menu.selected,
            None,
        ),
        MenuScreen::EndScore => render_prompt(
            frame,
            area,
            " End Score ",
            "Points needed to win:",
            &menu.input,
            menu.error.as_deref(),
        ),
        MenuScreen::Address => render_prompt(
            frame,
            area,
            " Join Game ",
            "Host address:",
            &menu.input,
            menu.error.as_deref(),
        ),
        MenuScreen::Credits => render_credits(frame, area),
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[&str],
    selected: usize,
    error: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

    let logo = r#"
  ___  _           ___
 |   \(_)_ _  __ _|   \ ___ _ _  __ _
 | |) | | ' \/ _` | |) / _ \ ' \/ _` |
 |___/|_|_||_\__, |___/\___/_||_\__, |
"#;
    let logo = Paragraph::new(logo)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(logo, chunks[0]);

    let items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, &label)| {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("  {}", label)).style(style)
        })
        .collect();
    let height = items.len() as u16 + 2;

    let list = List::new(items).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(list, centered_rect(40, height, chunks[2]));

    if let Some(err) = error {
        let error_text = Paragraph::new(err)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(error_text, chunks[3]);
    }

    let help = Paragraph::new("↑↓ Navigate  Enter Select  Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}

fn render_prompt(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    label: &str,
    input: &str,
    error: Option<&str>,
) {
    let dialog_area = centered_rect(50, 9, area);
    frame.render_widget(Clear, dialog_area);

    let dialog = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(dialog, dialog_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(dialog_area);

    let label = Paragraph::new(label.to_string()).style(Style::default().fg(Color::White));
    frame.render_widget(label, inner[0]);

    let input_text = Paragraph::new(format!("{}_", input))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(input_text, inner[1]);

    if let Some(err) = error {
        let error_text = Paragraph::new(err)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(error_text, inner[2]);
    }

    let help = Paragraph::new("Enter Confirm  Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, inner[3]);
}

fn render_credits(frame: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(50, 9, area);
    frame.render_widget(Clear, dialog_area);

    let lines = vec![
        Line::from(Span::styled(
            "Ding Dong",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("A two player paddle game."),
        Line::from("Play on one keyboard or over the network."),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc Back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let credits = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Credits ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(credits, dialog_area);
}

fn render_connecting(frame: &mut Frame, area: Rect, setup: &MatchSetup) {
    let dialog_area = centered_rect(60, 8, area);
    frame.render_widget(Clear, dialog_area);

    let (status, detail) = match setup.mode {
        GameMode::Online(PeerRole::Host) => (
            ConnectionStatus::Awaiting,
            "Awaiting connection, the game may become unresponsive during this time...".to_string(),
        ),
        _ => (
            ConnectionStatus::Connecting,
            format!(
                "Attempting to connect to {}, the game may become unresponsive during this time...",
                setup.address.as_deref().unwrap_or("?")
            ),
        ),
    };

    let dialog = Block::default()
        .title(" Connecting ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Status: {}", status),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(detail, Style::default().fg(Color::Red))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(dialog);
    frame.render_widget(text, dialog_area);
}

fn render_match(frame: &mut Frame, area: Rect, game: &Match, painter: &CourtPainter, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let title = format!(" {} - first to {} ", game.mode().label(), game.court().end_score());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(painter.canvas(game.court(), block), chunks[0]);

    frame.render_widget(status_line(game), chunks[1]);

    if let Some(outcome) = game.outcome() {
        render_game_over(frame, chunks[0], outcome);
    } else if let Some(remaining) = game.countdown_remaining(now) {
        let countdown = Paragraph::new(format!("Ready... {:.1}", remaining.as_secs_f32()))
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        frame.render_widget(countdown, centered_rect(20, 1, chunks[0]));
    }
}

fn status_line(game: &Match) -> Paragraph<'static> {
    let controls = match game.mode() {
        GameMode::LocalMultiplayer => "W/S left  ↑/↓ right  Esc Menu",
        _ => "W/S or ↑/↓ Move  Esc Menu",
    };

    let mut spans = vec![Span::styled(controls, Style::default().fg(Color::DarkGray))];

    if let Some(session) = game.session() {
        let stats = session.stats();
        let color = match session.status() {
            ConnectionStatus::Confirmed => Color::Green,
            ConnectionStatus::Lost => Color::Red,
            _ => Color::Yellow,
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} ", session.status()),
            Style::default().fg(color),
        ));
        spans.push(Span::styled(
            format!(
                "sent {} recv {} stale {}",
                stats.datagrams_sent, stats.datagrams_received, stats.datagrams_discarded
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn render_game_over(frame: &mut Frame, area: Rect, outcome: Outcome) {
    let dialog_area = centered_rect(30, 5, area);
    frame.render_widget(Clear, dialog_area);

    let (text, color) = match outcome {
        Outcome::Won => ("You won!", Color::Green),
        Outcome::Lost => ("You lost", Color::Red),
    };

    let lines = vec![
        Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Enter/Esc Menu",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Game Over ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(dialog, dialog_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
