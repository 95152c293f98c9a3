//! Presentation boundary. The renderer is the only component that touches
//! widgets; everything else talks to it through this trait.

use shared::domain::{FigurePart, Glyph, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// System message; the only category that gets a typewriter reveal.
    Info,
    Win,
    Error,
    /// Echo of what the user submitted.
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSlot {
    pub glyph: Glyph,
    pub pop_in: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Pending,
    Passed,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageView {
    pub name: &'static str,
    pub state: StageState,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundStats {
    pub hints_used: u32,
    pub breach_level: u8,
    /// Server-provided label, or the local stage list entry when absent.
    pub stage_name: String,
    pub guessed_letters: Vec<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualFx {
    Shake,
    SuccessSweep,
    Failure,
}

pub trait Renderer: Send + Sync {
    fn render_masked_word(&self, slots: &[WordSlot]);
    fn append_log_line(&self, line: LineId, category: LogCategory, text: &str, caret: bool);
    fn update_log_line(&self, line: LineId, text: &str, caret: bool);
    fn clear_log(&self);
    fn render_breach_stages(&self, stages: &[StageView]);
    fn set_figure_part(&self, part: FigurePart, visible: bool);
    fn render_stats(&self, stats: &RoundStats);
    fn set_streak(&self, streak: u32);
    fn set_input_enabled(&self, enabled: bool);
    fn set_hint_enabled(&self, enabled: bool);
    fn set_restart_visible(&self, visible: bool);
    fn set_fx(&self, fx: VisualFx, active: bool);
    /// Applies the theme marker and the toggle label.
    fn apply_theme(&self, theme: Theme);
    fn set_ambient_paused(&self, paused: bool);
}
