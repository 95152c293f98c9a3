mod config;
mod terminal;

use std::{fs, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ControllerOptions, GameController, HttpGameClient, DEFAULT_REQUEST_TIMEOUT};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use storage::{sqlite_url_for_path, Storage};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{load_settings, Args, Settings},
    terminal::TerminalRenderer,
};

enum KeyAction {
    Quit,
    Submit,
    Hint,
    ToggleTheme,
    Restart,
    Edit(Option<char>),
    None,
}

fn classify(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Tab => KeyAction::Hint,
        KeyCode::F(2) => KeyAction::ToggleTheme,
        KeyCode::F(5) => KeyAction::Restart,
        KeyCode::Backspace => KeyAction::Edit(None),
        KeyCode::Char(c) if !c.is_control() => KeyAction::Edit(Some(c)),
        _ => KeyAction::None,
    }
}

fn init_logging(settings: &Settings) -> Result<()> {
    fs::create_dir_all(&settings.data_dir).with_context(|| {
        format!(
            "failed to create data directory '{}'",
            settings.data_dir.display()
        )
    })?;
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(settings.log_path())
        .context("failed to open log file")?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
    Ok(())
}

async fn run(controller: Arc<GameController>, renderer: Arc<TerminalRenderer>) -> Result<()> {
    {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            if let Err(err) = controller.start_round().await {
                debug!(error = %err, "initial round not started");
            }
        });
    }

    let mut events = EventStream::new();
    while let Some(event) = events.next().await {
        let key = match event.context("terminal event stream failed")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            Event::Resize(_, _) => {
                renderer.redraw();
                continue;
            }
            _ => continue,
        };

        let controller = Arc::clone(&controller);
        match classify(key) {
            KeyAction::Quit => break,
            KeyAction::Submit => {
                let guess = renderer.take_command();
                tokio::spawn(async move {
                    if let Err(err) = controller.submit_guess(&guess).await {
                        debug!(error = %err, "guess not applied");
                    }
                });
            }
            KeyAction::Hint => {
                tokio::spawn(async move {
                    if let Err(err) = controller.request_hint().await {
                        debug!(error = %err, "hint not applied");
                    }
                });
            }
            KeyAction::ToggleTheme => {
                tokio::spawn(async move { controller.toggle_theme().await });
            }
            KeyAction::Restart => {
                if renderer.screen(|screen| screen.restart_visible()) {
                    tokio::spawn(async move {
                        if let Err(err) = controller.restart().await {
                            debug!(error = %err, "restart failed");
                        }
                    });
                }
            }
            KeyAction::Edit(ch) => {
                let edited = renderer.edit_command(|command| match ch {
                    Some(c) => command.push(c),
                    None => {
                        command.pop();
                    }
                });
                if edited {
                    tokio::spawn(async move { controller.keystroke().await });
                }
            }
            KeyAction::None => {}
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings().with_args(&args);
    init_logging(&settings)?;
    info!(server_url = %settings.server_url, db = %settings.db_path().display(), "starting breach client");

    let service = Arc::new(HttpGameClient::new(
        &settings.server_url,
        DEFAULT_REQUEST_TIMEOUT,
    )?);
    let storage = Storage::new(&sqlite_url_for_path(&settings.db_path())).await?;
    let renderer = Arc::new(TerminalRenderer::new());
    renderer.init().context("failed to enter terminal mode")?;

    let controller = Arc::new(
        GameController::load(
            service,
            Arc::new(storage.clone()),
            renderer.clone(),
            ControllerOptions {
                reduced_motion: settings.reduced_motion,
                ..ControllerOptions::default()
            },
        )
        .await,
    );

    let result = run(controller, Arc::clone(&renderer)).await;
    renderer.cleanup().context("failed to restore terminal")?;
    storage.close().await;
    info!("breach client stopped");
    result
}
