//! Proposal card interaction state
//!
//! This module provides the state machines behind the card page:
//! - `EvasiveButton` relocates the "No" control inside the card bounds
//! - `Proposal` holds the one-way Pending -> Accepted transition
//! - `CelebrationPlan` describes the particle bursts played on acceptance

mod celebration;
mod evasive;
mod proposal;

pub use celebration::{Burst, CelebrationPlan, LogSoundPlayer, SoundPlayer, CELEBRATION_SOUND_URL};
pub use evasive::{ButtonPosition, CardLayout, EvasiveButton, Size, TEASING_MESSAGES};
pub use proposal::{Acceptance, Proposal, ProposalState};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// All mutable card state for one visitor session.
///
/// Owns its random source so relocation and message selection are
/// deterministic under a seeded generator in tests.
pub struct CardSession {
    proposal: Proposal,
    button: EvasiveButton,
    rng: StdRng,
}

impl CardSession {
    pub fn new(layout: CardLayout) -> Self {
        Self::with_rng(layout, StdRng::from_os_rng())
    }

    pub fn with_rng(layout: CardLayout, rng: StdRng) -> Self {
        Self {
            proposal: Proposal::new(),
            button: EvasiveButton::new(layout),
            rng,
        }
    }

    pub fn proposal(&self) -> &Proposal {
        &self.proposal
    }

    pub fn button(&self) -> &EvasiveButton {
        &self.button
    }

    /// Pointer-enter or activation of the "No" control. Never a state
    /// change on the proposal; the control just runs away.
    pub fn tease(&mut self) -> (ButtonPosition, &'static str) {
        self.button.relocate(&mut self.rng)
    }

    /// Accept the proposal. Returns the celebration effects on the first
    /// call and `None` on repeats.
    pub fn accept(&mut self) -> Option<Acceptance> {
        self.proposal.accept()
    }
}
