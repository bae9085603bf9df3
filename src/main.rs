//! Last Word - a local elimination word game
//!
//! Name a pack word that starts with the letter. Too slow and you are out.

mod app;
mod cli;
mod config;
mod game;
mod storage;
mod timer;
mod tui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use cli::{resolve_selection, Cli};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use game::{packs, GameState, Roster};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use storage::Storage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui::Tui;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_packs {
        for pack in packs::all() {
            let languages: Vec<&str> = pack.languages().collect();
            println!(
                "{} [{}] - {}",
                pack.name,
                languages.join(", "),
                pack.description
            );
        }
        return Ok(());
    }

    let data_dir = match &cli.data_dir {
        Some(dir) => Some(dir.clone()),
        None => Storage::data_dir().ok(),
    };
    if let Some(dir) = &data_dir {
        init_logging(dir);
    }
    info!("starting");

    let storage = match &data_dir {
        Some(dir) => Storage::open_in(dir)
            .inspect_err(|e| warn!(error = %e, "storage unavailable, nothing will be saved"))
            .ok(),
        None => None,
    };

    let mut settings = match &storage {
        Some(s) => s.load_settings()?.unwrap_or_default(),
        None => Default::default(),
    };
    cli.apply(&mut settings);

    let roster = if cli.players.is_empty() {
        match &storage {
            Some(s) => s.load_players()?.unwrap_or_default(),
            None => Roster::new(),
        }
    } else {
        Roster::from_names(&cli.players)
    };

    let mut all_packs = packs::all().to_vec();
    let file_pack = cli.load_pack_file()?;
    let requested_pack = file_pack.as_ref().map(|p| p.name.clone()).or(cli.pack.clone());
    if let Some(pack) = file_pack {
        all_packs.retain(|p| !p.name.eq_ignore_ascii_case(&pack.name));
        all_packs.push(pack);
    }

    let saved_selection = match &storage {
        Some(s) => s.load_pack()?,
        None => None,
    };
    let selection = resolve_selection(
        requested_pack.as_deref(),
        cli.language.as_deref(),
        saved_selection.as_ref(),
        &all_packs,
    )?;
    let pack = all_packs
        .iter()
        .find(|p| p.name == selection.name)
        .context("selected pack went missing")?;
    let game = GameState::from_pack(pack, &selection.language, roster, settings)?;
    info!(pack = %selection.name, language = %selection.language, "pack loaded");

    let mut app = App::new(game, all_packs, selection.clone());
    if let Some(storage) = storage {
        storage.save_settings(app.game().settings())?;
        storage.save_players(app.game().roster())?;
        storage.save_pack(&selection)?;
        let saved_game = storage.load_session()?;
        app = app.with_storage(storage);
        if let Some(snapshot) = saved_game {
            app.resume(snapshot);
        }
    }

    run(&mut app)?;
    info!("bye");
    Ok(())
}

/// Log to a file in the data directory so the terminal stays clean
fn init_logging(dir: &Path) {
    if std::fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(log_file) = std::fs::File::create(dir.join("lastword.log")) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lastword=info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
}

fn run(app: &mut App) -> Result<()> {
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let tick_rate = app.game().timer().poll_interval();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.quit();
                        }
                        KeyCode::Esc => app.on_escape(),
                        KeyCode::Enter => app.on_submit(),
                        KeyCode::Backspace => app.on_backspace(),
                        KeyCode::Delete => app.on_delete(),
                        KeyCode::Tab => app.leave_current(),
                        KeyCode::Up => app.on_up(),
                        KeyCode::Down => app.on_down(),
                        KeyCode::Left => app.on_left(),
                        KeyCode::Right => app.on_right(),
                        KeyCode::Char(c) => app.on_char(c),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}
