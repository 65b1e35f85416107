use std::sync::Arc;

use tokio::sync::Mutex;

use crate::card::{CardSession, SoundPlayer};
use crate::notify::{Dispatcher, MediaStore};
use crate::recorder::RecorderSession;

/// Shared application state for HTTP handlers
///
/// The card and recorder sessions are single mutable state machines;
/// handlers serialize access through the mutexes, which matches the
/// one-UI-event-at-a-time model of the page.
#[derive(Clone)]
pub struct AppState {
    pub card: Arc<Mutex<CardSession>>,
    pub recorder: Arc<Mutex<RecorderSession>>,
    pub dispatcher: Arc<Dispatcher>,
    pub media: Arc<dyn MediaStore>,
    pub sound: Arc<dyn SoundPlayer>,
}

impl AppState {
    pub fn new(
        card: CardSession,
        recorder: RecorderSession,
        dispatcher: Arc<Dispatcher>,
        media: Arc<dyn MediaStore>,
        sound: Arc<dyn SoundPlayer>,
    ) -> Self {
        Self {
            card: Arc::new(Mutex::new(card)),
            recorder: Arc::new(Mutex::new(recorder)),
            dispatcher,
            media,
            sound,
        }
    }
}
