//! Terminal UI for mesero that lets customers browse the menu and send their order over WhatsApp.

mod app;
mod input;
mod ui;

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration as StdDuration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mesero_core::{cache::CustomerCache, config::RestaurantConfig, service::MeseroService};
use mesero_provider_webhook as webhook;
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::input::Action;

#[derive(Debug, Parser)]
#[command(name = "mesero")]
#[command(about = "Browse the menu and send your order over WhatsApp")]
struct Cli {
    /// Restaurant configuration file (TOML); built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the menu webhook URL
    #[arg(long, value_name = "URL")]
    menu_url: Option<String>,

    /// Where the last customer details are remembered
    #[arg(long, value_name = "FILE", default_value = ".mesero/customer.json")]
    cache_file: PathBuf,

    /// Log destination; the terminal belongs to the UI
    #[arg(long, value_name = "FILE", default_value = "mesero.log")]
    log_file: PathBuf,

    /// Do not read or write the customer cache
    #[arg(long)]
    no_cache: bool,
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create log directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mesero=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<RestaurantConfig> {
    let mut config = match &cli.config {
        Some(path) => RestaurantConfig::load(path)
            .with_context(|| format!("cannot load configuration {}", path.display()))?,
        None => RestaurantConfig::default(),
    };
    if let Some(url) = &cli.menu_url {
        config.menu_url.clone_from(url);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = load_config(&cli)?;
    info!(menu_url = %config.menu_url, restaurant = %config.info.name, "starting");

    // HTTP + service setup
    let client = Client::builder()
        .user_agent("mesero/0.1")
        .timeout(StdDuration::from_secs(10))
        .build()?;
    let plugin = webhook::plugin(client, config.menu_url.clone());
    let service = Arc::new(MeseroService::new(Arc::new(config), plugin));

    let menu = service.load_menu().await;
    let cache = (!cli.no_cache).then(|| CustomerCache::new(&cli.cache_file));

    // App state
    let app = App::new(service, menu, cache);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Some(link) = res? {
        print_link(&link);
    }
    Ok(())
}

#[expect(clippy::print_stdout, reason = "the link is the program's output")]
fn print_link(link: &str) {
    println!("Open this link to send your order on WhatsApp:\n{link}");
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<Option<String>> {
    loop {
        app.refresh_availability();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => return Ok(None),
                Action::None => {}
                Action::ReloadMenu => {
                    app.is_loading = true;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let menu = app.service.load_menu().await;

                    app.is_loading = false;
                    app.set_menu(menu);
                }
                Action::SendOrder => {
                    if let Some(link) = app.finish_dispatch() {
                        return Ok(Some(link));
                    }
                }
            }
        }
    }
}
