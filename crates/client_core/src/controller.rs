//! The game controller owns [`ClientState`] and turns user actions into
//! requests, and responses into rendered effects.
//!
//! Requests are never cancelled and may overlap. Each one takes a sequence
//! number when issued; a response older than the last one applied is
//! dropped instead of overwriting newer state.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{domain::FigurePart, protocol::RemoteSnapshot};
use storage::KeyValueStore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    ambient::{ActivityTrigger, AmbientMotionController},
    debounce::DebouncedTask,
    error::ClientError,
    reconciler::{reconcile, UiEffect},
    remote::GameService,
    render::{LogCategory, Renderer},
    scheduler::{EffectScheduler, Timing},
    state::ClientState,
    streak::{RoundOutcome, WinStreak},
    theme::ThemeController,
};

pub const READY_MESSAGE: &str = "SYSTEM INITIALIZED. READY.";
pub const START_FAILED_MESSAGE: &str = "CONNECTION ERROR: SERVER OFFLINE.";
pub const GUESS_FAILED_MESSAGE: &str = "TRANSMISSION ERROR.";
pub const HINT_FAILED_MESSAGE: &str = "HINT RETRIEVAL FAILED.";

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerOptions {
    pub timing: Timing,
    pub reduced_motion: bool,
}

/// What happened to a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    /// A newer response was already applied.
    Stale,
    /// Input was not accepted (round over or empty guess).
    Ignored,
}

pub struct GameController {
    service: Arc<dyn GameService>,
    store: Arc<dyn KeyValueStore>,
    renderer: Arc<dyn Renderer>,
    scheduler: EffectScheduler,
    theme: ThemeController,
    ambient: AmbientMotionController,
    restart_reveal: DebouncedTask,
    state: Mutex<ClientState>,
    next_sequence: AtomicU64,
}

impl GameController {
    /// Hydrates streak and theme from the store and renders them. No round
    /// is started.
    pub async fn load(
        service: Arc<dyn GameService>,
        store: Arc<dyn KeyValueStore>,
        renderer: Arc<dyn Renderer>,
        options: ControllerOptions,
    ) -> Self {
        let win_streak = WinStreak::load(store.as_ref())
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "starting with an empty win streak");
                WinStreak::default()
            });
        let theme = ThemeController::load(Arc::clone(&store), Arc::clone(&renderer)).await;
        renderer.set_streak(win_streak.value());
        renderer.set_input_enabled(false);
        renderer.set_hint_enabled(false);
        renderer.set_restart_visible(false);

        info!(
            streak = win_streak.value(),
            theme = %theme.current(),
            reduced_motion = options.reduced_motion,
            "client state hydrated"
        );

        Self {
            scheduler: EffectScheduler::new(
                Arc::clone(&renderer),
                options.timing,
                options.reduced_motion,
            ),
            ambient: AmbientMotionController::new(
                Arc::clone(&renderer),
                options.timing.ambient_idle,
            ),
            state: Mutex::new(ClientState::hydrated(win_streak, theme.current())),
            theme,
            service,
            store,
            renderer,
            restart_reveal: DebouncedTask::new(),
            next_sequence: AtomicU64::new(1),
        }
    }

    pub async fn state(&self) -> ClientState {
        self.state.lock().await.clone()
    }

    pub fn scheduler(&self) -> &EffectScheduler {
        &self.scheduler
    }

    pub fn ambient_paused(&self) -> bool {
        self.ambient.is_paused()
    }

    fn issue_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn start_round(&self) -> Result<Dispatch, ClientError> {
        self.scheduler.clear_failure();
        let sequence = self.issue_sequence();
        match self.service.start().await {
            Ok(snapshot) => Ok(self.apply(sequence, snapshot, true).await),
            Err(err) => {
                warn!(error = %err, "start request failed");
                self.scheduler.log(START_FAILED_MESSAGE, LogCategory::Error);
                Err(err)
            }
        }
    }

    pub async fn submit_guess(&self, raw: &str) -> Result<Dispatch, ClientError> {
        let guess = raw.trim();
        if guess.is_empty() || self.state.lock().await.is_round_over {
            return Ok(Dispatch::Ignored);
        }

        self.scheduler.log(&format!("> {guess}"), LogCategory::User);
        let sequence = self.issue_sequence();
        match self.service.guess(guess).await {
            Ok(snapshot) => Ok(self.apply(sequence, snapshot, false).await),
            Err(err) => {
                warn!(error = %err, "guess request failed");
                self.scheduler.log(GUESS_FAILED_MESSAGE, LogCategory::Error);
                Err(err)
            }
        }
    }

    pub async fn request_hint(&self) -> Result<Dispatch, ClientError> {
        let theme = {
            let state = self.state.lock().await;
            if state.is_round_over {
                return Ok(Dispatch::Ignored);
            }
            state.theme
        };
        self.ambient
            .register_activity(theme, ActivityTrigger::HintRequest);

        let sequence = self.issue_sequence();
        match self.service.hint().await {
            Ok(snapshot) => Ok(self.apply(sequence, snapshot, false).await),
            Err(err) => {
                warn!(error = %err, "hint request failed");
                self.scheduler.log(HINT_FAILED_MESSAGE, LogCategory::Error);
                Err(err)
            }
        }
    }

    /// Any edit of the command line: finishes running reveals and pauses
    /// ambient motion.
    pub async fn keystroke(&self) {
        self.scheduler.finalize_reveals();
        let theme = self.state.lock().await.theme;
        self.ambient
            .register_activity(theme, ActivityTrigger::Keystroke);
    }

    pub async fn restart(&self) -> Result<Dispatch, ClientError> {
        let theme = self.state.lock().await.theme;
        self.ambient.register_activity(theme, ActivityTrigger::Restart);
        self.start_round().await
    }

    pub async fn toggle_theme(&self) {
        let theme = self.theme.toggle().await;
        self.state.lock().await.theme = theme;
    }

    async fn apply(&self, sequence: u64, snapshot: RemoteSnapshot, fresh_round: bool) -> Dispatch {
        let mut state = self.state.lock().await;
        if sequence < state.last_applied_sequence {
            debug!(
                sequence,
                last_applied = state.last_applied_sequence,
                "dropping stale response"
            );
            return Dispatch::Stale;
        }
        state.last_applied_sequence = sequence;

        let previous = if fresh_round {
            self.begin_round(&mut state);
            None
        } else {
            state.last_snapshot.take()
        };
        let effects = reconcile(previous.as_ref(), &snapshot);
        state.last_snapshot = Some(snapshot);

        for effect in effects {
            self.dispatch(&mut state, effect).await;
        }
        if fresh_round {
            self.scheduler.log(READY_MESSAGE, LogCategory::Info);
            info!("round started");
        }
        Dispatch::Applied
    }

    fn begin_round(&self, state: &mut ClientState) {
        self.restart_reveal.cancel();
        self.scheduler.clear_log();
        state.last_snapshot = None;
        state.is_round_over = false;
        state.figure_level = 0;
        self.renderer.set_input_enabled(true);
        self.renderer.set_hint_enabled(true);
        self.renderer.set_restart_visible(false);
    }

    async fn dispatch(&self, state: &mut ClientState, effect: UiEffect) {
        match effect {
            UiEffect::RenderMaskedWord(slots) => self.renderer.render_masked_word(&slots),
            UiEffect::BreachAlert { level } => {
                self.scheduler.shake();
                self.scheduler
                    .log(&format!("ALERT: BREACH LEVEL {level}"), LogCategory::Error);
            }
            UiEffect::RenderBreachStages(stages) => self.renderer.render_breach_stages(&stages),
            UiEffect::RevealFigure { level } => {
                state.figure_level = state.figure_level.max(level);
                for part in FigurePart::ALL {
                    self.renderer
                        .set_figure_part(part, part.visible_at(state.figure_level));
                }
            }
            UiEffect::UpdateStats(stats) => self.renderer.render_stats(&stats),
            UiEffect::Log { text, category } => {
                self.scheduler.log(&text, category);
            }
            UiEffect::TerminateRound(outcome) => self.terminate_round(state, outcome).await,
        }
    }

    async fn terminate_round(&self, state: &mut ClientState, outcome: RoundOutcome) {
        if state.is_round_over {
            return;
        }
        // Input is closed before the state lock is released.
        state.is_round_over = true;
        self.renderer.set_input_enabled(false);
        self.renderer.set_hint_enabled(false);

        state.win_streak = state.win_streak.after(outcome);
        if let Err(err) = state.win_streak.persist(self.store.as_ref()).await {
            warn!(error = %err, "win streak not persisted");
        }
        self.renderer.set_streak(state.win_streak.value());

        match outcome {
            RoundOutcome::Won => self.scheduler.success_sweep(),
            RoundOutcome::Lost => self.scheduler.fail(),
        }

        let renderer = Arc::clone(&self.renderer);
        self.restart_reveal
            .schedule(self.scheduler.timing().restart_delay, move || {
                renderer.set_restart_visible(true);
            });

        info!(?outcome, streak = state.win_streak.value(), "round terminated");
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
