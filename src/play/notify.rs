use std::sync::Arc;

use parking_lot::Mutex;

use crate::game::TeamId;

/// Fire-and-forget messages to a team. Delivery is never confirmed.
pub trait Notifier {
    fn notify(&self, team: TeamId, text: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, team: TeamId, text: &str) {
        tracing::info!(target: "territory::notify", %team, "{text}");
    }
}

/// Keeps every notification in memory, in send order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(TeamId, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(TeamId, String)> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, team: TeamId, text: &str) {
        self.messages.lock().push((team, text.to_string()));
    }
}
