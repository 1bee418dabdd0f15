mod actions;
mod app;
mod ui;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::actions::{execute_action, AdminWorker, Backend};
use crate::app::App;
use crm_api::{ClientOptions, CustomerSource, FallbackPolicy, FixtureSource, HttpCustomerSource};
use crm_config::{self as config, ApiConfig, FallbackMode};
use crm_core::rules::local_today;
use crm_core::time::{local_offset, now_utc};

#[derive(Debug, Parser)]
#[command(name = "crm-tui", version, about = "crm-dash TUI")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut app_config = config::load(args.config).with_context(|| "load config")?;
    if let Some(raw) = args.api_url {
        app_config.api.base_url = config::parse_base_url(&raw)?;
    }

    let options = client_options(&app_config.api);
    let source: Box<dyn CustomerSource> = if args.offline {
        Box::new(FixtureSource)
    } else {
        Box::new(HttpCustomerSource::new(&options)?)
    };
    let policy = match app_config.list.fallback {
        FallbackMode::Fixtures => FallbackPolicy::Fixtures,
        FallbackMode::Fail => FallbackPolicy::Fail,
    };
    let backend = Backend::new(source, policy);
    let worker = AdminWorker::new(options.with_timeout(app_config.api.admin_timeout()));

    let now = now_utc();
    let today = local_today(now, local_offset())?;
    let mut app = App::new(app_config.list.initial_query(), today, now);

    let mut terminal = TerminalGuard::new()?;
    run_app(&mut terminal, &backend, &worker, &mut app)
}

fn client_options(api: &ApiConfig) -> ClientOptions {
    ClientOptions::new(api.base_url.clone())
        .with_timeout(api.timeout())
        .with_connect_timeout(api.connect_timeout())
        .with_user_agent(api.user_agent.as_str())
}

fn run_app(
    terminal: &mut TerminalGuard,
    backend: &Backend,
    worker: &AdminWorker,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        terminal.terminal_mut().draw(|frame| ui::draw(frame, app))?;

        if app.should_quit {
            break;
        }

        // Actions run after a draw so the loading state is on screen first.
        if app.has_pending_actions() {
            while let Some(action) = app.next_action() {
                if let Err(err) = execute_action(app, backend, worker, action) {
                    app.set_error(format!("{err:#}"));
                }
            }
            continue;
        }

        worker.drain(app);

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_secs(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            let now = now_utc();
            app.advance_clock(local_today(now, local_offset())?, now);
        }
    }

    Ok(())
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal();
            original_hook(info);
        }));

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
