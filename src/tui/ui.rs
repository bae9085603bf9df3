//! UI rendering using ratatui
//!
//! Screens:
//! - Setup: roster and game options
//! - Playing: letter, timer, players, input and used words
//! - Result: the outcome and a prompt to play again

use crate::app::{App, Screen, SetupItem, Tone};
use crate::game::packs;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

const TITLE: &str = "LAST WORD";

/// Used words shown at once; older ones scroll off
const USED_WORDS_SHOWN: usize = 20;

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, app: &App) {
    match &app.screen {
        Screen::Setup {
            selected,
            player_cursor,
        } => render_setup(frame, app, *selected, *player_cursor),
        Screen::Playing => render_game(frame, app),
        Screen::Result => render_result(frame, app),
    }
}

fn render_setup(frame: &mut Frame, app: &App, selected: usize, player_cursor: usize) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(4),    // Players
            Constraint::Length(12), // Options
            Constraint::Length(1), // Feedback
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let title = Paragraph::new(TITLE)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, layout[0]);

    let on_players = SetupItem::all().get(selected) == Some(&SetupItem::Players);
    let roster = app.game().roster();
    let mut items: Vec<ListItem> = roster
        .players()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let highlighted = on_players && i == player_cursor;
            let prefix = if highlighted { "> " } else { "  " };
            let suffix = if roster.host() == Some(p.name.as_str()) {
                " (host)"
            } else {
                ""
            };
            let style = if highlighted {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{}{}{}", prefix, p.name, suffix)).style(style)
        })
        .collect();
    if on_players {
        items.push(
            ListItem::new(format!("+ {}_", app.input)).style(Style::default().fg(Color::Cyan)),
        );
    }
    let players = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Players ({})", roster.len())),
    );
    frame.render_widget(players, layout[1]);

    let options: Vec<ListItem> = SetupItem::all()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            let value = setup_value(app, *item);
            let text = if value.is_empty() {
                format!("{}{}", prefix, item.label())
            } else {
                format!("{}{:<10} {}", prefix, item.label(), value)
            };
            ListItem::new(text).style(style)
        })
        .collect();
    frame.render_widget(List::new(options).block(Block::default()), layout[2]);

    render_feedback(frame, layout[3], app);

    let footer = Paragraph::new(
        "↑↓ Navigate  ←→ Change  Enter Select  Del Remove player  Esc Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Value shown next to a setup row
fn setup_value(app: &App, item: SetupItem) -> String {
    let settings = app.game().settings();
    match item {
        SetupItem::Players => "type a name, Enter to add".to_string(),
        SetupItem::Pack => match app.current_pack() {
            Some(pack) => format!("< {} > {}", pack.name, pack.description),
            None => format!("< {} >", app.selection().name),
        },
        SetupItem::Language => {
            let code = app.selection().language.as_str();
            let name = packs::language(code).map(|l| l.name).unwrap_or(code);
            format!("< {} >", name)
        }
        SetupItem::Speed => format!("< {} >", settings.speed),
        SetupItem::Timer => on_off(settings.has_timer),
        SetupItem::WordsLeft => on_off(settings.show_words_left),
        SetupItem::UsedWords => on_off(settings.show_used_words),
        SetupItem::Sound => on_off(settings.sound_enabled),
        SetupItem::Start | SetupItem::Quit => String::new(),
    }
}

fn on_off(flag: bool) -> String {
    (if flag { "on" } else { "off" }).to_string()
}

fn render_game(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with letter, timer
            Constraint::Min(0),    // Main content area
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);

    let show_used = app.game().settings().show_used_words;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20),
            Constraint::Min(30),
            Constraint::Length(if show_used { 24 } else { 0 }),
        ])
        .split(layout[1]);

    render_players(frame, columns[0], app);
    render_input_area(frame, columns[1], app);
    if show_used {
        render_used_words(frame, columns[2], app);
    }

    let footer = Paragraph::new("Enter Submit  Tab Leave  Esc Back to setup")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Title, current letter, timer
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(10),
        ])
        .split(inner);

    let title = Paragraph::new(TITLE)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(title, header_layout[0]);

    let letter = app
        .game()
        .current_letter()
        .map(|l| format!("[ {} ]", l))
        .unwrap_or_default();
    let letter = Paragraph::new(letter)
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(letter, header_layout[1]);

    let (text, color) = if app.game().settings().has_timer {
        let timer = app.game().timer();
        (timer.formatted(), timer_color(timer.remaining()))
    } else {
        ("--:--".to_string(), Color::DarkGray)
    };
    let timer = Paragraph::new(text)
        .style(Style::default().fg(color).bold())
        .alignment(Alignment::Right);
    frame.render_widget(timer, header_layout[2]);
}

fn timer_color(remaining: u32) -> Color {
    if remaining <= 10 {
        Color::Red
    } else if remaining <= 30 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn render_players(frame: &mut Frame, area: Rect, app: &App) {
    let current = app.game().current_player();
    let items: Vec<ListItem> = app
        .game()
        .roster()
        .players()
        .iter()
        .map(|p| {
            let is_current = current == Some(p.name.as_str());
            let (marker, style) = if p.eliminated {
                (
                    "✗",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else if is_current {
                ("▶", Style::default().fg(Color::Cyan).bold())
            } else {
                ("●", Style::default().fg(Color::White))
            };
            ListItem::new(format!("{} {}", marker, p.name)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Players"),
    );
    frame.render_widget(list, area);
}

/// Turn line, input, feedback, words left
fn render_input_area(frame: &mut Frame, area: Rect, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Turn
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Input line
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Feedback line
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Words left
            Constraint::Min(0),
        ])
        .split(area);

    let game = app.game();
    let turn = format!(
        "{}'s turn · round {}",
        game.current_player().unwrap_or("?"),
        game.session().current_round
    );
    frame.render_widget(
        Paragraph::new(turn).style(Style::default().fg(Color::Magenta).bold()),
        main_layout[0],
    );

    let input = Paragraph::new(format!("> {}_", app.input)).style(Style::default().fg(Color::White));
    frame.render_widget(input, main_layout[2]);

    render_feedback(frame, main_layout[4], app);

    if game.settings().show_words_left {
        if let Some(letter) = game.current_letter() {
            let left = game.words_left_for_current_letter();
            let text = format!("{} word{} left for {}", left, if left == 1 { "" } else { "s" }, letter);
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                main_layout[6],
            );
        }
    }
}

/// Played words, newest last; a duplicate submission makes its word blink
fn render_used_words(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.game().session();
    let used = session.used_words();
    let pulsing = session.pulsing_word.as_deref();
    let items: Vec<ListItem> = used
        .iter()
        .skip(used.len().saturating_sub(USED_WORDS_SHOWN))
        .map(|word| {
            let style = if pulsing == Some(word.as_str()) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::REVERSED | Modifier::SLOW_BLINK)
            } else {
                Style::default().fg(Color::Green)
            };
            ListItem::new(word.as_str()).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!("Used ({})", used.len())),
    );
    frame.render_widget(list, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, app: &App) {
    let Some(feedback) = &app.feedback else {
        return;
    };
    let color = match feedback.tone {
        Tone::Good => Color::Green,
        Tone::Bad => Color::Red,
        Tone::Warn => Color::Yellow,
        Tone::Info => Color::White,
    };
    frame.render_widget(
        Paragraph::new(feedback.text.as_str()).style(Style::default().fg(color)),
        area,
    );
}

fn render_result(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(2), // Outcome
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Words played
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Instructions
            Constraint::Min(0),
        ])
        .split(area);

    let outcome = Paragraph::new(app.result_message())
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(outcome, layout[1]);

    let session = app.game().session();
    let stats = Paragraph::new(format!(
        "Words played: {}  Rounds: {}",
        session.used_words().len(),
        session.current_round
    ))
    .style(Style::default().fg(Color::Cyan))
    .alignment(Alignment::Center);
    frame.render_widget(stats, layout[3]);

    if let Some(feedback) = &app.feedback {
        let last = Paragraph::new(feedback.text.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(last, layout[4]);
    }

    let instructions = Paragraph::new("Enter Play again  Esc Back to setup")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(instructions, layout[6]);
}
