//! Crossterm front end. [`Screen`] is the model every renderer call mutates;
//! each mutation redraws the whole frame.

use std::{
    collections::HashSet,
    io::{self, BufWriter, Stdout, Write},
    sync::{Mutex, MutexGuard, PoisonError},
};

use client_core::{
    LineId, LogCategory, Renderer, RoundStats, StageState, StageView, VisualFx, WordSlot,
};
use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use shared::domain::{FigurePart, Glyph, Theme, MAX_BREACH_LEVEL};
use tracing::warn;

const CARET: char = '█';
const PROMPT: &str = "CMD> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub color: Color,
}

pub type Row = Vec<Span>;

fn span(text: impl Into<String>, color: Color) -> Span {
    Span {
        text: text.into(),
        color,
    }
}

#[derive(Debug, Clone)]
struct LogEntry {
    id: LineId,
    category: LogCategory,
    text: String,
    caret: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Screen {
    word: Vec<WordSlot>,
    log: Vec<LogEntry>,
    stages: Vec<StageView>,
    figure: [bool; 5],
    stats: RoundStats,
    streak: u32,
    input_enabled: bool,
    hint_enabled: bool,
    restart_visible: bool,
    fx: HashSet<VisualFx>,
    theme: Theme,
    ambient_paused: bool,
    command: String,
}

impl Screen {
    pub fn restart_visible(&self) -> bool {
        self.restart_visible
    }

    fn accent(&self) -> Color {
        if self.fx.contains(&VisualFx::Failure) {
            return Color::Red;
        }
        if self.fx.contains(&VisualFx::SuccessSweep) {
            return Color::Cyan;
        }
        match self.theme {
            Theme::Minimal => Color::White,
            Theme::Cyber => Color::Green,
        }
    }

    fn dim(&self) -> Color {
        match self.theme {
            Theme::Minimal => Color::DarkGrey,
            Theme::Cyber => Color::DarkGreen,
        }
    }

    fn category_color(&self, category: LogCategory) -> Color {
        match category {
            LogCategory::Info => self.accent(),
            LogCategory::Win => Color::Cyan,
            LogCategory::Error => Color::Red,
            LogCategory::User => Color::Yellow,
        }
    }

    /// Lays out a frame `height` rows tall. The log shows its newest lines
    /// in whatever space is left.
    pub fn compose(&self, height: usize) -> Vec<Row> {
        let accent = self.accent();
        let dim = self.dim();
        let indent = if self.fx.contains(&VisualFx::Shake) {
            "  "
        } else {
            ""
        };

        let mut top: Vec<Row> = Vec::new();

        let scanline = match (self.theme, self.ambient_paused) {
            (Theme::Cyber, false) => " ░▒▓",
            _ => "",
        };
        let banner = if self.fx.contains(&VisualFx::Failure) {
            "SYSTEM COMPROMISED"
        } else if self.fx.contains(&VisualFx::SuccessSweep) {
            "ACCESS GRANTED"
        } else {
            "SECURE ACCESS TERMINAL"
        };
        top.push(vec![
            span(format!("BREACH // {banner}{scanline}"), accent),
            span(format!("   [F2] {}", self.theme.label()), dim),
            span(format!("   STREAK: {}", self.streak), accent),
        ]);
        top.push(vec![span("─".repeat(56), dim)]);

        let mut word_row = vec![span("   ", accent)];
        for slot in &self.word {
            let color = match (slot.glyph, slot.pop_in) {
                (Glyph::Revealed(_), true) => Color::Yellow,
                (Glyph::Revealed(_), false) => accent,
                (Glyph::Hidden, _) => dim,
            };
            word_row.push(span(format!("{} ", slot.glyph.as_char()), color));
        }
        top.push(word_row);
        top.push(Vec::new());

        let figure = self.figure_rows();
        let stage_rows = self.stages.len().max(figure.len());
        for idx in 0..stage_rows {
            let mut row = Vec::new();
            match self.stages.get(idx) {
                Some(stage) => {
                    let (marker, color) = match stage.state {
                        StageState::Passed => ("[x]", dim),
                        StageState::Active => ("[>]", accent),
                        StageState::Pending => ("[ ]", dim),
                    };
                    row.push(span(format!("{marker} {:<24}", stage.name), color));
                }
                None => row.push(span(" ".repeat(28), dim)),
            }
            if let Some(line) = figure.get(idx) {
                row.push(span(format!("    {line}"), accent));
            }
            top.push(row);
        }

        let letters: String = self
            .stats
            .guessed_letters
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        top.push(vec![span(
            format!(
                "HINTS: {}   BREACH: {}/{} {}   KEYS: {}",
                self.stats.hints_used,
                self.stats.breach_level,
                MAX_BREACH_LEVEL,
                self.stats.stage_name,
                letters
            ),
            dim,
        )]);
        top.push(vec![span("─".repeat(56), dim)]);

        let mut bottom: Vec<Row> = vec![vec![span("─".repeat(56), dim)]];
        let mut command_row = vec![span(PROMPT, accent)];
        if self.input_enabled {
            command_row.push(span(format!("{}{CARET}", self.command), accent));
        } else {
            command_row.push(span("[LOCKED]", dim));
        }
        let mut keys = Vec::new();
        if self.hint_enabled {
            keys.push("[Tab] hint");
        }
        if self.restart_visible {
            keys.push("[F5] restart");
        }
        keys.push("[Esc] quit");
        command_row.push(span(format!("   {}", keys.join("  ")), dim));
        bottom.push(command_row);

        let log_rows = height.saturating_sub(top.len() + bottom.len());
        let skip = self.log.len().saturating_sub(log_rows);
        let mut rows = top;
        for entry in self.log.iter().skip(skip) {
            let caret = if entry.caret {
                CARET.to_string()
            } else {
                String::new()
            };
            rows.push(vec![span(
                format!("{}{caret}", entry.text),
                self.category_color(entry.category),
            )]);
        }
        rows.extend(bottom);

        if !indent.is_empty() {
            for row in &mut rows {
                row.insert(0, span(indent, accent));
            }
        }
        rows
    }

    fn figure_rows(&self) -> Vec<String> {
        let shown = |part: FigurePart, glyph: &'static str| {
            if self.figure[part.index()] {
                glyph
            } else {
                " "
            }
        };
        vec![
            " +---+".to_string(),
            format!(" |   {}", shown(FigurePart::Head, "O")),
            format!(
                " |  {}{}{}",
                shown(FigurePart::LeftArm, "/"),
                shown(FigurePart::Body, "|"),
                shown(FigurePart::RightArm, "\\")
            ),
            format!(
                " |  {} {}",
                shown(FigurePart::Legs, "/"),
                shown(FigurePart::Legs, "\\")
            ),
            "===".to_string(),
        ]
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Frame {
    screen: Screen,
    writer: BufWriter<Stdout>,
}

impl Frame {
    fn draw(&mut self) -> io::Result<()> {
        let (_, height) = terminal::size().unwrap_or((80, 24));
        let rows = self.screen.compose(usize::from(height));
        queue!(self.writer, Clear(ClearType::All))?;
        for (y, row) in rows.iter().enumerate().take(usize::from(height)) {
            queue!(self.writer, MoveTo(0, y as u16))?;
            for span in row {
                queue!(self.writer, SetForegroundColor(span.color), Print(&span.text))?;
            }
        }
        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }
}

pub struct TerminalRenderer {
    frame: Mutex<Frame>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            frame: Mutex::new(Frame {
                screen: Screen::default(),
                writer: BufWriter::with_capacity(16384, io::stdout()),
            }),
        }
    }

    pub fn init(&self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut frame = lock(&self.frame);
        execute!(
            frame.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        frame.draw()
    }

    pub fn cleanup(&self) -> io::Result<()> {
        let mut frame = lock(&self.frame);
        execute!(
            frame.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn redraw(&self) {
        if let Err(err) = lock(&self.frame).draw() {
            warn!(error = %err, "frame draw failed");
        }
    }

    pub fn screen<T>(&self, read: impl FnOnce(&Screen) -> T) -> T {
        read(&lock(&self.frame).screen)
    }

    fn mutate(&self, change: impl FnOnce(&mut Screen)) {
        let mut frame = lock(&self.frame);
        change(&mut frame.screen);
        if let Err(err) = frame.draw() {
            warn!(error = %err, "frame draw failed");
        }
    }

    /// Edits the command line; ignored while input is locked.
    pub fn edit_command(&self, edit: impl FnOnce(&mut String)) -> bool {
        let mut applied = false;
        self.mutate(|screen| {
            if screen.input_enabled {
                edit(&mut screen.command);
                applied = true;
            }
        });
        applied
    }

    pub fn take_command(&self) -> String {
        let mut taken = String::new();
        self.mutate(|screen| taken = std::mem::take(&mut screen.command));
        taken
    }
}

impl Renderer for TerminalRenderer {
    fn render_masked_word(&self, slots: &[WordSlot]) {
        self.mutate(|screen| screen.word = slots.to_vec());
    }

    fn append_log_line(&self, line: LineId, category: LogCategory, text: &str, caret: bool) {
        self.mutate(|screen| {
            screen.log.push(LogEntry {
                id: line,
                category,
                text: text.to_string(),
                caret,
            })
        });
    }

    fn update_log_line(&self, line: LineId, text: &str, caret: bool) {
        self.mutate(|screen| {
            if let Some(entry) = screen.log.iter_mut().rev().find(|e| e.id == line) {
                entry.text = text.to_string();
                entry.caret = caret;
            }
        });
    }

    fn clear_log(&self) {
        self.mutate(|screen| screen.log.clear());
    }

    fn render_breach_stages(&self, stages: &[StageView]) {
        self.mutate(|screen| screen.stages = stages.to_vec());
    }

    fn set_figure_part(&self, part: FigurePart, visible: bool) {
        self.mutate(|screen| screen.figure[part.index()] = visible);
    }

    fn render_stats(&self, stats: &RoundStats) {
        self.mutate(|screen| screen.stats = stats.clone());
    }

    fn set_streak(&self, streak: u32) {
        self.mutate(|screen| screen.streak = streak);
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.mutate(|screen| {
            screen.input_enabled = enabled;
            if !enabled {
                screen.command.clear();
            }
        });
    }

    fn set_hint_enabled(&self, enabled: bool) {
        self.mutate(|screen| screen.hint_enabled = enabled);
    }

    fn set_restart_visible(&self, visible: bool) {
        self.mutate(|screen| screen.restart_visible = visible);
    }

    fn set_fx(&self, fx: VisualFx, active: bool) {
        self.mutate(|screen| {
            if active {
                screen.fx.insert(fx);
            } else {
                screen.fx.remove(&fx);
            }
        });
    }

    fn apply_theme(&self, theme: Theme) {
        self.mutate(|screen| screen.theme = theme);
    }

    fn set_ambient_paused(&self, paused: bool) {
        self.mutate(|screen| screen.ambient_paused = paused);
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
