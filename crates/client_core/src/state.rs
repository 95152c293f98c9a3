use shared::{domain::Theme, protocol::RemoteSnapshot};

use crate::streak::WinStreak;

#[derive(Debug, Clone)]
pub struct ClientState {
    /// Replaced wholesale by every applied response.
    pub last_snapshot: Option<RemoteSnapshot>,
    pub win_streak: WinStreak,
    pub theme: Theme,
    /// Gates input. True until the first round starts.
    pub is_round_over: bool,
    /// Highest breach level shown on the figure this round.
    pub figure_level: u8,
    pub last_applied_sequence: u64,
}

impl ClientState {
    pub fn hydrated(win_streak: WinStreak, theme: Theme) -> Self {
        Self {
            last_snapshot: None,
            win_streak,
            theme,
            is_round_over: true,
            figure_level: 0,
            last_applied_sequence: 0,
        }
    }
}
