use serde::{Deserialize, Serialize};

use crate::{
    domain::{MaskedWord, MAX_BREACH_LEVEL},
    error::ProtocolError,
};

pub const START_ROUTE: &str = "start";
pub const GUESS_ROUTE: &str = "guess";
pub const HINT_ROUTE: &str = "hint";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    pub guess: String,
}

fn default_max_breach_level() -> u8 {
    MAX_BREACH_LEVEL
}

/// `status` object as the game service sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub masked_word: MaskedWord,
    #[serde(default)]
    pub guessed_letters: Vec<String>,
    pub breach_level: u8,
    #[serde(default = "default_max_breach_level")]
    pub max_breach_level: u8,
    #[serde(default)]
    pub hints_used: u32,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub won: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Envelope returned by `start`, `guess` and `hint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResponse {
    pub status: StatusPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breach_stage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_length: Option<usize>,
}

/// Validated, immutable view of one remote turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSnapshot {
    pub masked_word: MaskedWord,
    pub guessed_letters: Vec<char>,
    pub breach_level: u8,
    pub hints_used: u32,
    pub won: bool,
    pub game_over: bool,
    pub message: Option<String>,
    pub target_word: Option<String>,
    /// Stage name as labelled by the game service.
    pub stage_name: Option<String>,
}

impl TryFrom<GameResponse> for RemoteSnapshot {
    type Error = ProtocolError;

    fn try_from(value: GameResponse) -> Result<Self, Self::Error> {
        let GameResponse {
            status,
            target_word,
            breach_stage_name,
            word_length,
        } = value;

        if let Some(declared) = word_length {
            let actual = status.masked_word.len();
            if declared != actual {
                return Err(ProtocolError::WordLengthMismatch { declared, actual });
            }
        }

        let max = status.max_breach_level.min(MAX_BREACH_LEVEL);
        if status.breach_level > max {
            return Err(ProtocolError::BreachLevelOutOfRange {
                level: status.breach_level,
                max,
            });
        }

        let mut guessed_letters = status
            .guessed_letters
            .iter()
            .map(|raw| {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(ProtocolError::InvalidGuessedLetter(raw.clone())),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        guessed_letters.sort_unstable();
        guessed_letters.dedup();

        Ok(Self {
            masked_word: status.masked_word,
            guessed_letters,
            breach_level: status.breach_level,
            hints_used: status.hints_used,
            won: status.won,
            game_over: status.game_over,
            message: status.message.filter(|m| !m.trim().is_empty()),
            target_word: target_word.filter(|w| !w.trim().is_empty()),
            stage_name: breach_stage_name.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
