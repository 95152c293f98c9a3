use std::sync::{Arc, Mutex};

use shared::domain::Theme;
use storage::{KeyValueStore, THEME_KEY};
use tracing::{info, warn};

use crate::{debounce::lock, render::Renderer};

pub struct ThemeController {
    store: Arc<dyn KeyValueStore>,
    renderer: Arc<dyn Renderer>,
    current: Mutex<Theme>,
}

impl ThemeController {
    /// Hydrates the persisted choice (minimal when absent or unreadable) and
    /// applies it.
    pub async fn load(store: Arc<dyn KeyValueStore>, renderer: Arc<dyn Renderer>) -> Self {
        let theme = match store.get(THEME_KEY).await {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
                warn!(raw, "unknown persisted theme; using default");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!(error = %err, "failed to read persisted theme");
                Theme::default()
            }
        };
        renderer.apply_theme(theme);
        Self {
            store,
            renderer,
            current: Mutex::new(theme),
        }
    }

    pub fn current(&self) -> Theme {
        *lock(&self.current)
    }

    pub async fn toggle(&self) -> Theme {
        let theme = {
            let mut current = lock(&self.current);
            *current = current.toggled();
            *current
        };
        if let Err(err) = self.store.set(THEME_KEY, theme.as_str()).await {
            warn!(error = %err, %theme, "failed to persist theme");
        }
        self.renderer.apply_theme(theme);
        info!(%theme, "theme toggled");
        theme
    }
}
