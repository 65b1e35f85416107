use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::celebration::{CelebrationPlan, CELEBRATION_SOUND_URL};

/// How long the UI gets to repaint before the acceptance notification
/// goes out.
pub const NOTIFY_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalState {
    Pending,
    Accepted,
}

/// Effects produced by the first (and only effective) accept call.
pub struct Acceptance {
    /// Chime asset to play, best-effort.
    pub sound_url: &'static str,
    pub celebration: CelebrationPlan,
    /// Delay before Notification Dispatch fires.
    pub notify_delay: Duration,
}

/// The proposal itself: starts Pending, accepts exactly once.
///
/// There is no reject transition. Accepted is terminal for the session,
/// and repeat accepts are no-ops so side effects never duplicate.
pub struct Proposal {
    state: ProposalState,
}

impl Proposal {
    pub fn new() -> Self {
        Self {
            state: ProposalState::Pending,
        }
    }

    pub fn state(&self) -> ProposalState {
        self.state
    }

    pub fn is_accepted(&self) -> bool {
        self.state == ProposalState::Accepted
    }

    /// Transition Pending -> Accepted and hand back the celebration
    /// effects. Returns `None` when already accepted.
    pub fn accept(&mut self) -> Option<Acceptance> {
        if self.state == ProposalState::Accepted {
            return None;
        }

        self.state = ProposalState::Accepted;
        info!("Proposal accepted");

        Some(Acceptance {
            sound_url: CELEBRATION_SOUND_URL,
            celebration: CelebrationPlan::standard(),
            notify_delay: NOTIFY_DEBOUNCE,
        })
    }
}

impl Default for Proposal {
    fn default() -> Self {
        Self::new()
    }
}
