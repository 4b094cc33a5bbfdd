use mindcanvas::{actions, config, event, export, persist, store, ui};

use actions::Action;
use anyhow::{Context, Result};
use clap::Parser;
use config::{load_config, AppConfig, CliArgs};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use mindcanvas::app::AppState;
use mindcanvas::layout::{ApproxMeasure, Layout};
use persist::FileStorage;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use store::DocumentStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// How long the loop waits for input before checking background work.
const TICK: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    init_tracing(&config);
    info!(state_file = %config.state_file.display(), "starting");

    let store = DocumentStore::open(
        Box::new(FileStorage::new(&config.state_file)),
        config.store_options(),
    );

    // Non-interactive export of the active map
    if let Some(ref path) = config.export_html {
        let layout = Layout::compute(store.active(), &ApproxMeasure);
        let html = export::export_html(store.active(), &layout);
        export::write_export(path, &html)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Exported to {}", path.display());
        return Ok(());
    }

    let mut app = AppState::new(config, store);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    app.key_release_supported = matches!(supports_keyboard_enhancement(), Ok(true));
    if app.key_release_supported {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clear the terminal
    terminal.clear()?;

    // Run the main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    if app.key_release_supported {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Final save regardless of auto-save
    app.into_store().close();

    // Handle any errors from the main loop
    if let Err(err) = res {
        error!(error = %err, "main loop failed");
        eprintln!("Error: {}", err);
    }

    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) {
    if let Some(parent) = config.log_file.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled: {}: {}", config.log_file.display(), e);
            return;
        }
    };
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    let (width, height) = crossterm::terminal::size()?;
    actions::execute_action(event::resize_action(width, height), app)?;

    while app.running {
        // Draw the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        for action in event::handle_events(app, TICK)? {
            if let Err(e) = actions::execute_action(action, app) {
                app.set_message(format!("Error: {e}"));
            }
        }

        // Pick up a finished expansion
        if app.expansion.is_some() {
            actions::execute_action(Action::PollExpansion, app)?;
        }
    }

    Ok(())
}
