//! Client side of the breach word game: keeps the presentation in step with
//! the authoritative game service and drives the timed effects around it.

pub mod ambient;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod reconciler;
pub mod remote;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod streak;
pub mod theme;

pub use controller::{ControllerOptions, Dispatch, GameController};
pub use error::ClientError;
pub use remote::{GameService, HttpGameClient, DEFAULT_REQUEST_TIMEOUT};
pub use render::{LineId, LogCategory, Renderer, RoundStats, StageState, StageView, VisualFx, WordSlot};
pub use scheduler::{EffectScheduler, Timing};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
