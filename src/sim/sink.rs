use crate::flight_control::ship_interface::{Cue, NotificationSink};

/// Notification sink that keeps everything it receives for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Received messages with their `silent` flag, oldest first.
    pub messages: Vec<(String, bool)>,
    pub pinned: Option<String>,
    pub cues: Vec<Cue>,
}

impl RecordingSink {
    pub fn new() -> Self { Self::default() }

    /// Checks whether any received message contains `fragment`.
    #[cfg(test)]
    pub fn contains(&self, fragment: &str) -> bool {
        self.messages.iter().any(|(msg, _)| msg.contains(fragment))
    }

    /// Number of received messages containing `fragment`.
    #[cfg(test)]
    pub fn count(&self, fragment: &str) -> usize {
        self.messages.iter().filter(|(msg, _)| msg.contains(fragment)).count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, message: &str, silent: bool) {
        self.messages.push((message.to_string(), silent));
    }

    fn pin(&mut self, message: &str) { self.pinned = Some(message.to_string()); }

    fn unpin(&mut self) { self.pinned = None; }

    fn play_cue(&mut self, cue: Cue) { self.cues.push(cue); }
}
