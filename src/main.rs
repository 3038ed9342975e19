use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vibera::config::Args;
use vibera::loader;
use vibera::middle::Middle;
use vibera::shared::InputEvent;
use vibera::source::GeminiClient;
use vibera::tui;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let path = args.log_path();
    let file = File::create(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibera=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let params = args.setup_params().context("invalid form presets")?;

    let client = GeminiClient::new(args.gemini_config()).context("failed to build API client")?;
    if args.api_key.is_none() {
        warn!("no GEMINI_API_KEY set, every set will come back empty");
    }
    info!(model = client.model(), "Starting vibera");
    let loader = loader::start_loader(Arc::new(client))?;
    let mut middle = Middle::with_params(params);

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    crossterm::execute!(std::io::stdout(), terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let frame_rate = Duration::from_millis(50); // ~20fps
    let mut last_tick = Instant::now();
    let blink_start = Instant::now();
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let blink_on = (blink_start.elapsed().as_millis() / 400) % 2 == 0;
        let ds = middle.display_state();
        tui_state.sync(&ds);

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, blink_on);
        })?;

        let events = tui::input::poll_input(frame_rate, &tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                info!("Quitting");
                return Ok(());
            }
            for request in middle.handle_input(event) {
                let session_id = request.session_id;
                if let Err(e) = loader.send(request) {
                    middle.on_fetch_failed(session_id, &format!("{e:#}"));
                }
            }
        }

        // a fetch finished on the loader thread
        while let Some(loaded) = loader.poll_completed() {
            middle.on_session_loaded(loaded);
        }

        let elapsed = last_tick.elapsed();
        last_tick = Instant::now();
        middle.tick(elapsed);
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
