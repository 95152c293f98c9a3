use anyhow::{Context, Result};
use storage::{KeyValueStore, WIN_STREAK_KEY};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Won,
    Lost,
}

/// Consecutive rounds won. Mutated only when a round ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WinStreak(u32);

impl WinStreak {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Unparseable persisted values count as a fresh streak.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(value) => Self(value),
            Err(err) => {
                warn!(raw, %err, "ignoring unparseable persisted win streak");
                Self::default()
            }
        }
    }

    pub fn after(self, outcome: RoundOutcome) -> Self {
        match outcome {
            RoundOutcome::Won => Self(self.0.saturating_add(1)),
            RoundOutcome::Lost => Self(0),
        }
    }

    pub async fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let raw = store
            .get(WIN_STREAK_KEY)
            .await
            .context("failed to read persisted win streak")?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }

    pub async fn persist(self, store: &dyn KeyValueStore) -> Result<()> {
        store
            .set(WIN_STREAK_KEY, &self.0.to_string())
            .await
            .context("failed to persist win streak")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;

    #[test]
    fn win_increments_and_loss_resets() {
        let streak = WinStreak::new(2);
        assert_eq!(streak.after(RoundOutcome::Won).value(), 3);
        assert_eq!(streak.after(RoundOutcome::Lost).value(), 0);
    }

    #[test]
    fn garbage_parses_as_zero() {
        assert_eq!(WinStreak::parse("not-a-number").value(), 0);
        assert_eq!(WinStreak::parse(" 12 ").value(), 12);
    }

    #[tokio::test]
    async fn persisted_value_round_trips_through_store() {
        let store = MemoryStore::new();
        assert_eq!(WinStreak::load(&store).await.expect("load").value(), 0);

        WinStreak::new(4).persist(&store).await.expect("persist");
        assert_eq!(
            store.get(WIN_STREAK_KEY).await.expect("get").as_deref(),
            Some("4")
        );
        assert_eq!(WinStreak::load(&store).await.expect("load").value(), 4);
    }
}
