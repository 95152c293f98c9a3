//! Test doubles shared by the unit tests in this crate.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use shared::{
    domain::{FigurePart, MaskedWord, Theme},
    protocol::RemoteSnapshot,
};
use tokio::sync::oneshot;

use crate::{
    debounce::lock,
    error::ClientError,
    remote::GameService,
    render::{LineId, LogCategory, Renderer, RoundStats, StageView, VisualFx, WordSlot},
};

pub fn snapshot(masked: &str, breach_level: u8) -> RemoteSnapshot {
    RemoteSnapshot {
        masked_word: MaskedWord::parse(masked).expect("masked word"),
        guessed_letters: Vec::new(),
        breach_level,
        hints_used: 0,
        won: false,
        game_over: false,
        message: None,
        target_word: None,
        stage_name: None,
    }
}

pub fn with_message(mut snapshot: RemoteSnapshot, message: &str) -> RemoteSnapshot {
    snapshot.message = Some(message.to_string());
    snapshot
}

pub fn won(masked: &str, breach_level: u8) -> RemoteSnapshot {
    RemoteSnapshot {
        won: true,
        game_over: true,
        message: Some("SYSTEM ACCESS GRANTED.".to_string()),
        ..snapshot(masked, breach_level)
    }
}

pub fn lost(masked: &str, target: &str) -> RemoteSnapshot {
    RemoteSnapshot {
        game_over: true,
        message: Some("CRITICAL FAILURE. SYSTEM COMPROMISED.".to_string()),
        target_word: Some(target.to_string()),
        ..snapshot(masked, 5)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    MaskedWord(Vec<WordSlot>),
    AppendLine {
        line: LineId,
        category: LogCategory,
        text: String,
        caret: bool,
    },
    UpdateLine {
        line: LineId,
        text: String,
        caret: bool,
    },
    ClearLog,
    Stages(Vec<StageView>),
    Figure(FigurePart, bool),
    Stats(RoundStats),
    Streak(u32),
    InputEnabled(bool),
    HintEnabled(bool),
    RestartVisible(bool),
    Fx(VisualFx, bool),
    Theme(Theme),
    AmbientPaused(bool),
}

#[derive(Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub category: LogCategory,
    pub text: String,
    pub caret: bool,
}

impl RecordingRenderer {
    fn push(&self, call: RenderCall) {
        lock(&self.calls).push(call);
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        lock(&self.calls).clone()
    }

    pub fn reset(&self) {
        lock(&self.calls).clear();
    }

    pub fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| pred(c)).count()
    }

    pub fn last<T>(&self, pick: impl Fn(&RenderCall) -> Option<T>) -> Option<T> {
        lock(&self.calls).iter().rev().find_map(pick)
    }

    /// Log as currently displayed: lines appended since the last clear, with
    /// their latest text.
    pub fn log(&self) -> Vec<LogLine> {
        let calls = lock(&self.calls);
        let mut order = Vec::new();
        let mut lines: HashMap<LineId, LogLine> = HashMap::new();
        for call in calls.iter() {
            match call {
                RenderCall::ClearLog => {
                    order.clear();
                    lines.clear();
                }
                RenderCall::AppendLine {
                    line,
                    category,
                    text,
                    caret,
                } => {
                    order.push(*line);
                    lines.insert(
                        *line,
                        LogLine {
                            category: *category,
                            text: text.clone(),
                            caret: *caret,
                        },
                    );
                }
                RenderCall::UpdateLine { line, text, caret } => {
                    if let Some(entry) = lines.get_mut(line) {
                        entry.text = text.clone();
                        entry.caret = *caret;
                    }
                }
                _ => {}
            }
        }
        order.iter().filter_map(|id| lines.remove(id)).collect()
    }

    pub fn log_texts(&self) -> Vec<String> {
        self.log().into_iter().map(|l| l.text).collect()
    }

    pub fn line_updates(&self, line: LineId) -> Vec<(String, bool)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RenderCall::UpdateLine {
                    line: id,
                    text,
                    caret,
                } if *id == line => Some((text.clone(), *caret)),
                _ => None,
            })
            .collect()
    }

    pub fn figure(&self) -> HashMap<FigurePart, bool> {
        let mut parts = HashMap::new();
        for call in lock(&self.calls).iter() {
            if let RenderCall::Figure(part, visible) = call {
                parts.insert(*part, *visible);
            }
        }
        parts
    }

    pub fn fx_active(&self, fx: VisualFx) -> bool {
        self.last(|call| match call {
            RenderCall::Fx(kind, active) if *kind == fx => Some(*active),
            _ => None,
        })
        .unwrap_or(false)
    }

    pub fn input_enabled(&self) -> Option<bool> {
        self.last(|call| match call {
            RenderCall::InputEnabled(enabled) => Some(*enabled),
            _ => None,
        })
    }

    pub fn restart_visible(&self) -> Option<bool> {
        self.last(|call| match call {
            RenderCall::RestartVisible(visible) => Some(*visible),
            _ => None,
        })
    }

    pub fn streak(&self) -> Option<u32> {
        self.last(|call| match call {
            RenderCall::Streak(value) => Some(*value),
            _ => None,
        })
    }

    pub fn ambient_paused(&self) -> Option<bool> {
        self.last(|call| match call {
            RenderCall::AmbientPaused(paused) => Some(*paused),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn render_masked_word(&self, slots: &[WordSlot]) {
        self.push(RenderCall::MaskedWord(slots.to_vec()));
    }

    fn append_log_line(&self, line: LineId, category: LogCategory, text: &str, caret: bool) {
        self.push(RenderCall::AppendLine {
            line,
            category,
            text: text.to_string(),
            caret,
        });
    }

    fn update_log_line(&self, line: LineId, text: &str, caret: bool) {
        self.push(RenderCall::UpdateLine {
            line,
            text: text.to_string(),
            caret,
        });
    }

    fn clear_log(&self) {
        self.push(RenderCall::ClearLog);
    }

    fn render_breach_stages(&self, stages: &[StageView]) {
        self.push(RenderCall::Stages(stages.to_vec()));
    }

    fn set_figure_part(&self, part: FigurePart, visible: bool) {
        self.push(RenderCall::Figure(part, visible));
    }

    fn render_stats(&self, stats: &RoundStats) {
        self.push(RenderCall::Stats(stats.clone()));
    }

    fn set_streak(&self, streak: u32) {
        self.push(RenderCall::Streak(streak));
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.push(RenderCall::InputEnabled(enabled));
    }

    fn set_hint_enabled(&self, enabled: bool) {
        self.push(RenderCall::HintEnabled(enabled));
    }

    fn set_restart_visible(&self, visible: bool) {
        self.push(RenderCall::RestartVisible(visible));
    }

    fn set_fx(&self, fx: VisualFx, active: bool) {
        self.push(RenderCall::Fx(fx, active));
    }

    fn apply_theme(&self, theme: Theme) {
        self.push(RenderCall::Theme(theme));
    }

    fn set_ambient_paused(&self, paused: bool) {
        self.push(RenderCall::AmbientPaused(paused));
    }
}

pub enum Scripted {
    Ready(Result<RemoteSnapshot, ClientError>),
    Gated(oneshot::Receiver<Result<RemoteSnapshot, ClientError>>),
}

/// Game service answering from a queue, in call order.
#[derive(Default)]
pub struct ScriptedGameService {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGameService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: RemoteSnapshot) {
        lock(&self.responses).push_back(Scripted::Ready(Ok(response)));
    }

    pub fn push_error(&self, err: ClientError) {
        lock(&self.responses).push_back(Scripted::Ready(Err(err)));
    }

    /// The returned sender releases the response.
    pub fn push_gated(&self) -> oneshot::Sender<Result<RemoteSnapshot, ClientError>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.responses).push_back(Scripted::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    async fn answer(&self, call: String) -> Result<RemoteSnapshot, ClientError> {
        let next = {
            lock(&self.calls).push(call.clone());
            lock(&self.responses).pop_front()
        };
        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                Err(ClientError::MalformedResponse {
                    route: "test",
                    reason: "gate dropped".to_string(),
                })
            }),
            None => Err(ClientError::Rejected {
                route: "test",
                status: 400,
                message: format!("no scripted response for {call}"),
            }),
        }
    }
}

#[async_trait]
impl GameService for ScriptedGameService {
    async fn start(&self) -> Result<RemoteSnapshot, ClientError> {
        self.answer("start".to_string()).await
    }

    async fn guess(&self, guess: &str) -> Result<RemoteSnapshot, ClientError> {
        self.answer(format!("guess:{guess}")).await
    }

    async fn hint(&self) -> Result<RemoteSnapshot, ClientError> {
        self.answer("hint".to_string()).await
    }
}

pub fn offline() -> ClientError {
    ClientError::Rejected {
        route: "test",
        status: 503,
        message: "server offline".to_string(),
    }
}
