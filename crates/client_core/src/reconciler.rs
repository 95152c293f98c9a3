//! Snapshot diffing. Given the previously applied snapshot and the next one,
//! [`reconcile`] produces the ordered UI effects the difference implies.

use shared::{
    domain::{breach_stage_name, MaskedWord, BREACH_STAGES},
    protocol::RemoteSnapshot,
};

use crate::{
    render::{LogCategory, RoundStats, StageState, StageView, WordSlot},
    streak::RoundOutcome,
};

/// Already covered by the breach alert, so never logged on its own.
const BREACH_INCREASED_MARKER: &str = "BREACH LEVEL INCREASED";
const ERROR_TOKENS: [&str; 2] = ["ERROR", "REJECTED"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    RenderMaskedWord(Vec<WordSlot>),
    /// Shake plus an `ALERT: BREACH LEVEL <n>` line.
    BreachAlert { level: u8 },
    RenderBreachStages(Vec<StageView>),
    /// Figure parts with index below `level` are shown. The controller
    /// holds the per-round high-water mark, so a lower level never hides
    /// parts already revealed.
    RevealFigure { level: u8 },
    UpdateStats(RoundStats),
    Log {
        text: String,
        category: LogCategory,
    },
    TerminateRound(RoundOutcome),
}

pub fn reconcile(previous: Option<&RemoteSnapshot>, next: &RemoteSnapshot) -> Vec<UiEffect> {
    let mut effects = Vec::new();

    if previous.map_or(true, |prev| prev.masked_word != next.masked_word) {
        effects.push(UiEffect::RenderMaskedWord(word_slots(&next.masked_word)));
    }

    let previous_level = previous.map_or(0, |prev| prev.breach_level);
    if next.breach_level > previous_level {
        effects.push(UiEffect::BreachAlert {
            level: next.breach_level,
        });
    }

    effects.push(UiEffect::RenderBreachStages(breach_stages(next.breach_level)));

    effects.push(UiEffect::RevealFigure {
        level: next.breach_level.max(previous_level),
    });

    effects.push(UiEffect::UpdateStats(RoundStats {
        hints_used: next.hints_used,
        breach_level: next.breach_level,
        stage_name: next
            .stage_name
            .clone()
            .unwrap_or_else(|| breach_stage_name(next.breach_level).to_string()),
        guessed_letters: next.guessed_letters.clone(),
    }));

    if let Some(message) = next
        .message
        .as_deref()
        .filter(|m| !m.contains(BREACH_INCREASED_MARKER))
    {
        effects.push(UiEffect::Log {
            text: message.to_string(),
            category: message_category(next, message),
        });
    }

    let already_over = previous.is_some_and(|prev| prev.game_over);
    if next.game_over && !already_over {
        if next.won {
            effects.push(UiEffect::TerminateRound(RoundOutcome::Won));
        } else {
            effects.push(UiEffect::TerminateRound(RoundOutcome::Lost));
            if let Some(target) = &next.target_word {
                effects.push(UiEffect::Log {
                    text: format!("TARGET WAS: {target}"),
                    category: LogCategory::Error,
                });
            }
        }
    }

    effects
}

fn word_slots(word: &MaskedWord) -> Vec<WordSlot> {
    word.glyphs()
        .iter()
        .map(|glyph| WordSlot {
            glyph: *glyph,
            pop_in: glyph.is_revealed(),
        })
        .collect()
}

pub fn breach_stages(level: u8) -> Vec<StageView> {
    let level = usize::from(level);
    BREACH_STAGES
        .iter()
        .enumerate()
        .map(|(idx, &name)| StageView {
            name,
            state: match idx.cmp(&level) {
                std::cmp::Ordering::Less => StageState::Passed,
                std::cmp::Ordering::Equal => StageState::Active,
                std::cmp::Ordering::Greater => StageState::Pending,
            },
        })
        .collect()
}

fn message_category(snapshot: &RemoteSnapshot, message: &str) -> LogCategory {
    if snapshot.won {
        LogCategory::Win
    } else if snapshot.game_over || ERROR_TOKENS.iter().any(|token| message.contains(token)) {
        LogCategory::Error
    } else {
        LogCategory::Info
    }
}

#[cfg(test)]
#[path = "tests/reconciler_tests.rs"]
mod tests;
