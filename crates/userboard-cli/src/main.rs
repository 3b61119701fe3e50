//! `userboard` — terminal dashboard over sample user records.
//!
//! # Usage
//!
//! ```
//! userboard
//! userboard --results 25 --seed kittens
//! userboard --config ~/.config/userboard/config.toml
//! ```
//!
//! Diagnostics go to a log file (`$TMPDIR/userboard.log` unless overridden)
//! since the terminal belongs to the UI. `RUST_LOG` sets the level.

mod app;
mod client;
mod config;
mod ui;

#[cfg(test)]
mod test_support;

use std::{fs::OpenOptions, io, path::Path, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::ApiClient;
use config::{Args, ConfigFile, Settings};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let file_cfg = ConfigFile::load(args.config.as_deref())?;
  let settings = Settings::resolve(args, file_cfg);

  init_tracing(&settings.log_file)?;
  tracing::info!(url = %settings.api.base_url, results = settings.results, "starting");

  let client = ApiClient::new(settings.api)?;
  let mut app = App::new(client, settings.results);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Bootstrap: one explicit load; its result arrives through the event loop.
  app.start_load();

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  if let Err(e) = &run_result {
    tracing::error!(error = %e, "event loop failed");
  }
  run_result
}

fn init_tracing(log_file: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(log_file)
    .with_context(|| format!("opening log file {}", log_file.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    // Fetch completions are processed one at a time, between input events.
    app.drain_outcomes();

    let size = terminal.size().context("reading terminal size")?;
    app.columns = ui::card_columns(size.width);
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      // Ignore key releases on terminals that report them.
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Terminal will redraw on next iteration.
      Some(Event::Resize(_, _)) => {}
      _ => {}
    }
  }

  Ok(())
}
