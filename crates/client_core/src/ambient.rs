use std::{sync::Arc, time::Duration};

use shared::domain::Theme;
use tracing::trace;

use crate::{debounce::DebouncedTask, render::Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityTrigger {
    Keystroke,
    HintRequest,
    Restart,
}

/// Pauses the cyber theme's background motion while the user is active.
pub struct AmbientMotionController {
    renderer: Arc<dyn Renderer>,
    idle_window: Duration,
    resume: DebouncedTask,
}

impl AmbientMotionController {
    pub fn new(renderer: Arc<dyn Renderer>, idle_window: Duration) -> Self {
        Self {
            renderer,
            idle_window,
            resume: DebouncedTask::new(),
        }
    }

    /// Returns false when the theme has no ambient motion.
    pub fn register_activity(&self, theme: Theme, trigger: ActivityTrigger) -> bool {
        if theme != Theme::Cyber {
            return false;
        }
        trace!(?trigger, "pausing ambient motion");
        self.renderer.set_ambient_paused(true);
        let renderer = Arc::clone(&self.renderer);
        self.resume.schedule(self.idle_window, move || {
            renderer.set_ambient_paused(false);
        });
        true
    }

    pub fn is_paused(&self) -> bool {
        self.resume.is_pending()
    }
}
