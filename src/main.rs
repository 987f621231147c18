mod app;
mod config;
mod observation;
mod platform;
mod reminder;
mod report;
mod session;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, AppMode};
use config::Config;
use platform::{CommandShare, HtmlFileRenderer, LocalNotifier};
use reminder::ReminderScheduler;
use session::Session;
use ui::Theme;

#[derive(Parser, Debug)]
#[command(name = "plester")]
#[command(about = "Hydrogel patch companion: change reminder, wound log, pain trend, report export")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "~/.config/plester-hydrogel/config.toml")]
    config: String,

    /// Log to stderr instead of the log file
    #[arg(long)]
    log_stderr: bool,

    /// Theme preset, overrides the config
    #[arg(long)]
    theme: Option<String>,
}

fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plester-hydrogel")
        .join("plester.log")
}

/// The TUI owns stdout, so logs go to a file unless asked otherwise
fn init_logging(to_stderr: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "plester=info".into());

    if to_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return Ok(());
    }

    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_stderr)?;

    // Load config
    let config = Config::load(&cli.config)?;

    let notifier = LocalNotifier::new(config.reminder.notifications_enabled);
    let scheduler = ReminderScheduler::new(
        Box::new(notifier.clone()),
        config.reminder.title.clone(),
        config.reminder.body.clone(),
    );
    let mut session = Session::new(scheduler, config.initial_alarm_time());
    session.start().await;

    let mut app = App::new(
        session,
        Box::new(HtmlFileRenderer::new(config.report.export_dir.clone())),
        Box::new(CommandShare::new(config.report.share_command.clone())),
        &config,
    )
    .with_reminder_feed(notifier);

    if let Some(name) = cli.theme.as_deref() {
        match Theme::from_preset(name) {
            Some(theme) => app = app.with_theme(config.apply_accent(theme)),
            None => tracing::warn!("Unknown theme '{}', keeping config theme", name),
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("Session started");

    // Run main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("Session ended with {} observation(s)", app.records().len());
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.poll_reminders(chrono::Local::now().naive_local());
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, key).await;
            }
        }

        if app.should_exit() {
            return Ok(());
        }
    }
}

/// One key press, handled to completion before the next is read
async fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if matches!(app.mode(), AppMode::TimePicker { .. }) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.picker_step(1),
            KeyCode::Down | KeyCode::Char('j') => app.picker_step(-1),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                app.picker_switch_field()
            }
            KeyCode::Enter => app.picker_confirm(),
            KeyCode::Esc | KeyCode::Char('q') => app.picker_dismiss(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        KeyCode::Char('t') => app.open_picker(),
        KeyCode::Char('a') => {
            if let Err(e) = app.confirm_alarm().await {
                app.report_failure("Alarm gagal", &e);
            }
        }
        KeyCode::Char('x') => app.stop_alarm().await,
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => app.focus_previous(),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_selection(1),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_selection(-1),
        KeyCode::Enter | KeyCode::Char('s') => app.save_form(),
        KeyCode::Char('e') => {
            if let Err(e) = app.export().await {
                app.report_failure("Ekspor gagal", &e);
            }
        }
        _ => {}
    }
}
