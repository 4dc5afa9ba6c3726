//! `arbol` is a terminal page for the sentence-analysis service.

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use clap::ValueEnum;

use crossbeam::channel;
use crossbeam::channel::RecvTimeoutError;

use crossterm::event::Event;
use crossterm::execute;
use crossterm::terminal;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;

use log::info;
use log::warn;

use sintaxis::messages::Language;
use sintaxis::orchestrator::Outcome;
use sintaxis::orchestrator::Pending;
use sintaxis::orchestrator::Submission;
use sintaxis::Config;
use sintaxis::Orchestrator;

use tui::backend::CrosstermBackend;
use tui::Terminal;

mod logging;
mod region;
mod ui;
mod util;

const TICK: Duration = Duration::from_millis(80);

/// Analyze sentences from the terminal.
#[derive(Parser, Debug)]
#[command(name = "arbol", version)]
struct Args {
  /// Base URL of the analysis service; overrides the config file.
  #[arg(long)]
  url: Option<String>,

  /// Language of the messages; overrides the config file.
  #[arg(long, value_enum)]
  language: Option<LanguageArg>,

  /// Don't send cache-disabling headers.
  #[arg(long)]
  no_cache_control: bool,

  /// Config file to read instead of the default one.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Where to write logs.
  #[arg(long)]
  log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LanguageArg {
  English,
  Spanish,
}

impl From<LanguageArg> for Language {
  fn from(l: LanguageArg) -> Self {
    match l {
      LanguageArg::English => Language::English,
      LanguageArg::Spanish => Language::Spanish,
    }
  }
}

/// Puts the terminal back the way we found it, even on error.
struct RawTerminal;

impl RawTerminal {
  fn enter() -> Result<Self, Box<dyn Error>> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Ok(Self)
  }
}

impl Drop for RawTerminal {
  fn drop(&mut self) {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
  }
}

fn main() -> Result<(), Box<dyn Error>> {
  let args = Args::parse();

  let log_file = args.log_file.clone().unwrap_or_else(logging::default_path);
  logging::init(&log_file)?;

  let mut config = match &args.config {
    Some(path) => Config::load_from(path)?,
    None => Config::load()?,
  };
  if let Some(url) = args.url {
    config.base_url = url;
  }
  if let Some(lang) = args.language {
    config.language = lang.into();
  }
  if args.no_cache_control {
    config.cache_control = false;
  }
  info!("analysis service at {}", config.base_url);

  let (breakdown, mut breakdown_view) = region::region();
  let (tree, mut tree_view) = region::region();
  let orch = Orchestrator::new(config.api(), breakdown, tree)
    .with_messages(config.messages());

  let (events_sink, events) = channel::unbounded();
  thread::spawn(move || loop {
    match crossterm::event::read() {
      Ok(e) => {
        if events_sink.send(e).is_err() {
          break;
        }
      }
      Err(e) => {
        warn!("reading terminal events: {}", e);
        break;
      }
    }
  });

  let _raw = RawTerminal::enter()?;
  let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

  let mut ui = ui::Ui::new();
  let mut in_flight: Vec<Pending> = Vec::new();
  let mut frame_number = 0usize;

  loop {
    reap(&mut in_flight);

    let busy = if in_flight.is_empty() {
      None
    } else {
      Some(frame_number)
    };
    terminal.draw(|f| {
      ui.render(f, breakdown_view.latest(), tree_view.latest(), busy)
    })?;
    frame_number = frame_number.wrapping_add(1);

    let e = match events.recv_timeout(TICK) {
      Ok(e) => e,
      Err(RecvTimeoutError::Timeout) => continue,
      Err(RecvTimeoutError::Disconnected) => return Ok(()),
    };

    if let Event::Key(k) = e {
      match ui.process_key(k) {
        Some(ui::Action::Quit) => return Ok(()),
        Some(ui::Action::Submit(sentence)) => {
          if let Submission::Pending(p) = orch.submit(&sentence) {
            in_flight.push(p);
          }
        }
        None => {}
      }
    }
  }
}

/// Collects requests that have finished rendering, logging how they ended.
fn reap(in_flight: &mut Vec<Pending>) {
  let mut i = 0;
  while i < in_flight.len() {
    if !in_flight[i].is_finished() {
      i += 1;
      continue;
    }

    let p = in_flight.swap_remove(i);
    let id = p.id();
    match p.wait() {
      Outcome::Rendered => info!("request #{} rendered", id),
      Outcome::Failed(e) => info!("request #{} failed: {}", id, e),
    }
  }
}
