//! Session event fan-out

use cinelog_core::{SessionEvent, SessionListener};
use tokio::sync::broadcast;
use tracing::{debug, info};

const EVENT_CAPACITY: usize = 16;

/// Broadcasts session transitions to any number of subscribers.
///
/// Events sent while nobody is subscribed are dropped.
#[derive(Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionListener for SessionEvents {
    fn on_session_event(&self, event: &SessionEvent) {
        if let SessionEvent::SignInRequired { redirect_to } = event {
            info!(redirect_to = %redirect_to, "sign-in required");
        }
        let delivered = self.tx.send(event.clone()).unwrap_or(0);
        debug!(?event, delivered, "session event published");
    }
}
