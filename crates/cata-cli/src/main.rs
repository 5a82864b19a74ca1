//! `cata` — terminal front end for recording and reviewing wine tastings.
//!
//! # Usage
//!
//! ```
//! cata
//! cata --seed-file catas.json --export-path ~/catas.csv
//! cata --config ~/.config/cata/cata.toml --quoting standard
//! ```

mod app;
mod ui;

use std::{
  fs::{File, OpenOptions},
  io::{self, BufReader},
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::{App, ExportSettings};
use cata_core::{
  export::{DateZone, EXPORT_FILE_NAME, ExportOptions, Quoting},
  session::SessionState,
};
use chrono::{FixedOffset, Utc};
use clap::{Parser, ValueEnum};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cata", about = "Record and review wine tastings in the terminal")]
struct Args {
  /// Path to a TOML config file. Missing files are ignored.
  #[arg(short, long, value_name = "FILE", default_value = "cata.toml")]
  config: PathBuf,

  /// Where Ctrl-E writes the CSV export (default: ./export_catas.csv).
  #[arg(long, value_name = "FILE")]
  export_path: Option<PathBuf>,

  /// JSON array of tasting records to start the session with.
  #[arg(long, value_name = "FILE")]
  seed_file: Option<PathBuf>,

  /// Log file; the terminal itself is taken by the UI (default: ./cata.log).
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// CSV quoting style.
  #[arg(long, value_enum)]
  quoting: Option<QuotingArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum QuotingArg {
  /// Quote only the aroma notes and notes columns, like the web export.
  Compatible,
  /// Quote any field that needs it.
  Standard,
}

impl From<QuotingArg> for Quoting {
  fn from(arg: QuotingArg) -> Self {
    match arg {
      QuotingArg::Compatible => Self::Compatible,
      QuotingArg::Standard => Self::Standard,
    }
  }
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Values read from the config file and `CATA_*` environment variables.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct Settings {
  export_path: Option<PathBuf>,
  seed_file:   Option<PathBuf>,
  log_file:    Option<PathBuf>,
  quoting:     Option<Quoting>,
  date_format: Option<String>,
  /// Fixed offset such as `+02:00` for dates; the system zone otherwise.
  utc_offset:  Option<String>,
}

impl Settings {
  fn load(path: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CATA"))
      .build()
      .with_context(|| format!("reading config {}", path.display()))?
      .try_deserialize()
      .context("parsing config")
  }
}

fn load_seed(path: &Path) -> Result<SessionState> {
  let file = File::open(path)
    .with_context(|| format!("opening seed file {}", path.display()))?;
  SessionState::from_json_reader(BufReader::new(file))
    .with_context(|| format!("loading seed file {}", path.display()))
}

fn init_tracing(path: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let args = Args::parse();
  let settings = Settings::load(&args.config)?;

  // CLI flags override config/env, which override defaults.
  let log_file = args
    .log_file
    .or(settings.log_file)
    .unwrap_or_else(|| PathBuf::from("cata.log"));
  init_tracing(&log_file)?;

  let session = match args.seed_file.or(settings.seed_file) {
    Some(path) => {
      let session = load_seed(&path)?;
      let count = session.all_records().len();
      info!(count, path = %path.display(), "seed records loaded");
      session
    }
    None => SessionState::new(),
  };

  let zone = match settings.utc_offset {
    Some(text) => DateZone::Fixed(
      text
        .parse::<FixedOffset>()
        .with_context(|| format!("parsing utc_offset {text:?}"))?,
    ),
    None => DateZone::Local,
  };
  let mut options = ExportOptions {
    quoting: args
      .quoting
      .map(Quoting::from)
      .or(settings.quoting)
      .unwrap_or_default(),
    zone,
    ..Default::default()
  };
  if let Some(format) = settings.date_format {
    options.date_format = format;
  }
  let export = ExportSettings {
    path: args
      .export_path
      .or(settings.export_path)
      .unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME)),
    options,
  };

  let mut app = App::new(session, export);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  info!(records = app.session.all_records().len(), "session closed");
  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    // The success banner expires on its own, so redraw on every tick.
    terminal
      .draw(|f| ui::draw(f, app, Utc::now()))
      .context("drawing frame")?;

    if !event::poll(Duration::from_millis(50)).context("polling terminal")? {
      continue;
    }
    match event::read().context("reading terminal event")? {
      Event::Key(key) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key, Utc::now())? {
          break;
        }
      }
      _ => {}
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quoting_flag_parses_value_names() {
    let args = Args::try_parse_from(["cata", "--quoting", "standard"]).unwrap();
    assert_eq!(args.quoting.map(Quoting::from), Some(Quoting::Standard));

    let args = Args::try_parse_from(["cata"]).unwrap();
    assert_eq!(args.quoting, None);

    assert!(Args::try_parse_from(["cata", "--quoting", "loose"]).is_err());
  }
}
