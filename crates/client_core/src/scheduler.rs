//! Timer-driven presentation effects: typewriter reveals of log lines and
//! transient visual fx. All methods must be called from within a tokio
//! runtime.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use tokio::{
    task::AbortHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::{
    debounce::{lock, DebouncedTask},
    render::{LineId, LogCategory, Renderer, VisualFx},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay between glyphs of a typewriter reveal.
    pub typewriter_step: Duration,
    pub shake_pulse: Duration,
    pub success_sweep: Duration,
    /// Delay between round termination and the restart affordance.
    pub restart_delay: Duration,
    /// Idle window before ambient motion resumes.
    pub ambient_idle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            typewriter_step: Duration::from_millis(20),
            shake_pulse: Duration::from_millis(500),
            success_sweep: Duration::from_millis(1000),
            restart_delay: Duration::from_millis(600),
            ambient_idle: Duration::from_millis(1200),
        }
    }
}

struct ActiveReveal {
    full_text: String,
    task: AbortHandle,
}

type RevealRegistry = Arc<Mutex<HashMap<LineId, ActiveReveal>>>;

pub struct EffectScheduler {
    renderer: Arc<dyn Renderer>,
    timing: Timing,
    reduced_motion: bool,
    next_line: AtomicU64,
    reveals: RevealRegistry,
    shake_revert: DebouncedTask,
}

fn line_text(text: &str) -> String {
    format!("> {text}")
}

impl EffectScheduler {
    pub fn new(renderer: Arc<dyn Renderer>, timing: Timing, reduced_motion: bool) -> Self {
        Self {
            renderer,
            timing,
            reduced_motion,
            next_line: AtomicU64::new(1),
            reveals: Arc::new(Mutex::new(HashMap::new())),
            shake_revert: DebouncedTask::new(),
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Appends a log line. Informational lines are revealed glyph by glyph
    /// unless motion is reduced; everything else renders at once.
    pub fn log(&self, text: &str, category: LogCategory) -> LineId {
        let line = LineId(self.next_line.fetch_add(1, Ordering::Relaxed));
        let animate = category == LogCategory::Info && !self.reduced_motion && !text.is_empty();
        if !animate {
            self.renderer
                .append_log_line(line, category, &line_text(text), false);
            return line;
        }

        self.renderer
            .append_log_line(line, category, &line_text(""), true);

        let glyphs: Vec<char> = text.chars().collect();
        let renderer = Arc::clone(&self.renderer);
        let registry = Arc::clone(&self.reveals);
        let step = self.timing.typewriter_step;

        // Registered before the task can take its first step.
        let mut reveals = lock(&self.reveals);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + step, step);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            for shown in 1..=glyphs.len() {
                ticker.tick().await;
                let mut active = lock(&registry);
                if !active.contains_key(&line) {
                    return;
                }
                let complete = shown == glyphs.len();
                let prefix: String = glyphs[..shown].iter().collect();
                renderer.update_log_line(line, &line_text(&prefix), !complete);
                if complete {
                    active.remove(&line);
                }
            }
        });
        reveals.insert(
            line,
            ActiveReveal {
                full_text: text.to_string(),
                task: task.abort_handle(),
            },
        );
        line
    }

    /// Finishes every running reveal at once: full text, no caret.
    pub fn finalize_reveals(&self) -> usize {
        let mut reveals = lock(&self.reveals);
        let finalized = reveals.len();
        for (line, reveal) in reveals.drain() {
            reveal.task.abort();
            self.renderer
                .update_log_line(line, &line_text(&reveal.full_text), false);
        }
        if finalized > 0 {
            debug!(finalized, "finalized typewriter reveals");
        }
        finalized
    }

    pub fn active_reveals(&self) -> usize {
        lock(&self.reveals).len()
    }

    /// Drops running reveals without finishing them, then empties the log.
    pub fn clear_log(&self) {
        let mut reveals = lock(&self.reveals);
        for (_, reveal) in reveals.drain() {
            reveal.task.abort();
        }
        self.renderer.clear_log();
    }

    /// Restarts the shake pulse; it reverts on its own.
    pub fn shake(&self) {
        self.renderer.set_fx(VisualFx::Shake, false);
        self.renderer.set_fx(VisualFx::Shake, true);
        let renderer = Arc::clone(&self.renderer);
        self.shake_revert.schedule(self.timing.shake_pulse, move || {
            renderer.set_fx(VisualFx::Shake, false);
        });
    }

    pub fn success_sweep(&self) {
        self.renderer.set_fx(VisualFx::SuccessSweep, true);
        let renderer = Arc::clone(&self.renderer);
        let duration = self.timing.success_sweep;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            renderer.set_fx(VisualFx::SuccessSweep, false);
        });
    }

    /// Persists until [`EffectScheduler::clear_failure`].
    pub fn fail(&self) {
        self.renderer.set_fx(VisualFx::Failure, true);
    }

    pub fn clear_failure(&self) {
        self.renderer.set_fx(VisualFx::Failure, false);
    }
}

impl Drop for EffectScheduler {
    fn drop(&mut self) {
        for (_, reveal) in lock(&self.reveals).drain() {
            reveal.task.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/scheduler_tests.rs"]
mod tests;
