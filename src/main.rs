// Defensive programming lints - prevent panics and unsafe patterns
#![deny(clippy::indexing_slicing)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::fallible_impl_from)]
#![warn(clippy::fn_params_excessive_bools)]
// Idiomatic Rust lints
#![warn(clippy::needless_return)]
#![warn(clippy::let_and_return)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::explicit_iter_loop)]

mod app;
mod config;
mod fetch;
mod logging;
mod navigator;
mod ui;

use app::{App, AppMode, Navigable};
use clap::{Parser, Subcommand};
use color_eyre::Result;
use config::{Config, Overrides};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fetch::{ContentFetcher, HttpBlockFetcher};
use navigator::{BlockNavigator, NavigationIntent, ViewState};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, time::Duration};

/// Step through the rendered blocks of a proposal
#[derive(Debug, Parser)]
#[command(name = "blockview", version)]
struct Cli {
    /// Configuration file to use instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Proposal whose blocks are viewed
    #[arg(long, global = true)]
    proposal: Option<String>,

    /// Comma-separated block codes, in navigation order
    #[arg(long, global = true)]
    blocks: Option<String>,

    /// Block to show first
    #[arg(long, global = true)]
    initial: Option<String>,

    /// Base URL of the proposal API
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch every block in order and print it as text
    Dump,
    /// Print the configuration file path
    ConfigPath,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            proposal_code: self.proposal.clone(),
            blocks: self.blocks.clone(),
            initial_block: self.initial.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let cli = Cli::parse();
    if matches!(cli.command, Some(Command::ConfigPath)) {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply(cli.overrides());

    let (_log_guard, log_path) = logging::init(&config.logging)?;
    tracing::info!(log = %log_path.display(), "starting blockview");

    let runtime = tokio::runtime::Runtime::new()?;
    let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpBlockFetcher::new(
        &config.server.base_url,
        &config.server.block_path,
        config.server.timeout(),
    )?);

    // Configuration problems are reported before the terminal is touched
    let navigator = BlockNavigator::mount(config.mount_config(), fetcher, runtime.handle().clone())
        .map_err(|error| {
            color_eyre::eyre::eyre!(
                "{} Set the blocks with --blocks or in [viewer] of the config file.",
                error
            )
        })?;
    tracing::info!(
        proposal = navigator.proposal_code(),
        blocks = navigator.blocks().len(),
        "viewer mounted"
    );

    match cli.command {
        Some(Command::Dump) => dump_blocks(navigator, config.server.timeout()),
        Some(Command::ConfigPath) | None => run_viewer(navigator),
    }
}

fn run_viewer(navigator: BlockNavigator) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(navigator);
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("viewer failed: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn dump_blocks(mut navigator: BlockNavigator, timeout: Duration) -> Result<()> {
    let wait = timeout + Duration::from_secs(1);
    let first = navigator.state().current_index();
    let codes: Vec<String> = navigator.blocks().iter().map(String::from).collect();

    for (index, code) in codes.iter().enumerate() {
        if index > 0 || first != 0 {
            navigator.select_index(index);
        }
        navigator.wait_settled(wait);

        println!("== {} ==", code);
        match navigator.state().view() {
            ViewState::Idle { html } => {
                for line in ui::markup::html_to_text(html) {
                    println!("{}", line);
                }
            }
            ViewState::Error { message } => println!("error: {}", message),
            ViewState::Loading => println!("error: timed out waiting for the block"),
        }
        println!();
    }

    navigator.detach();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.check_fetch_events();
        tick_loading_animation(app);
        app.clear_expired_status_toast();

        terminal.draw(|f| ui::render(f, app))?;

        if app.should_quit {
            break;
        }

        // Poll for events with a timeout
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            // Only handle KeyPress events to avoid duplicate handling
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.quit();
                continue;
            }

            match app.mode {
                AppMode::Viewing => handle_viewing_mode(app, key.code),
                AppMode::Selector => handle_selector_mode(app, key.code),
                AppMode::Help => handle_help_mode(app, key.code),
            }
        }
    }

    Ok(())
}

fn tick_loading_animation(app: &mut App) {
    use std::time::Instant;
    if !app.is_loading() {
        app.loading_frame = 0;
        app.last_loading_tick = None;
        return;
    }

    let now = Instant::now();
    let should_tick = app
        .last_loading_tick
        .is_none_or(|last_tick| now.duration_since(last_tick) >= Duration::from_millis(120));

    if should_tick {
        app.loading_frame = app.loading_frame.wrapping_add(1);
        app.last_loading_tick = Some(now);
    }
}

fn handle_viewing_mode(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Left | KeyCode::Char('h' | 'p') => app.navigate(NavigationIntent::Previous),
        KeyCode::Right | KeyCode::Char('l' | 'n') => app.navigate(NavigationIntent::Next),
        KeyCode::Char('r') => app.navigate(NavigationIntent::Reload),
        KeyCode::Tab | KeyCode::Char('s') => app.open_selector(),
        KeyCode::Char('?') => app.open_help(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_content_up(1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_content_down(1),
        KeyCode::PageUp => app.scroll_content_up_page(),
        KeyCode::PageDown => app.scroll_content_down_page(),
        KeyCode::Home => app.scroll_content_to_top(),
        KeyCode::Char(digit @ '1'..='9') => {
            if let Some(position) = digit.to_digit(10) {
                app.navigate(NavigationIntent::Select(position as usize - 1));
            }
        }
        _ => {}
    }
}

fn handle_selector_mode(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Esc | KeyCode::Tab => app.close_selector(),
        KeyCode::Up | KeyCode::Char('k') => app.previous_item(),
        KeyCode::Down | KeyCode::Char('j') => app.next_item(),
        KeyCode::Home => app.first_item(),
        KeyCode::End => app.last_item(),
        KeyCode::Enter => app.confirm_selector(),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Esc | KeyCode::Char('?' | 'q') => app.close_help(),
        _ => {}
    }
}
