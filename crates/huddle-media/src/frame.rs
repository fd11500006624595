use std::collections::HashMap;

use bytes::Bytes;
use huddle_shared::ClientId;
use tracing::debug;

/// A decoded frame as handed over by the capture/decoding layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub sender: ClientId,
    pub sequence: u64,
    pub data: Bytes,
}

impl VideoFrame {
    pub fn new(sender: ClientId, sequence: u64, data: impl Into<Bytes>) -> Self {
        Self {
            sender,
            sequence,
            data: data.into(),
        }
    }
}

/// Keeps frames in chronological order per sender.
///
/// Only a frame whose sequence number is strictly greater than the last
/// accepted one from the same sender gets through; duplicates and late
/// arrivals are dropped so the display never steps backwards.
#[derive(Debug, Default)]
pub struct FrameSequencer {
    last_accepted: HashMap<ClientId, u64>,
}

impl FrameSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and records the sequence when the frame is fresh.
    pub fn accept(&mut self, frame: &VideoFrame) -> bool {
        match self.last_accepted.get(&frame.sender) {
            Some(&last) if frame.sequence <= last => {
                debug!(
                    client = %frame.sender,
                    sequence = frame.sequence,
                    last,
                    "Dropping out-of-order frame"
                );
                false
            }
            _ => {
                self.last_accepted
                    .insert(frame.sender.clone(), frame.sequence);
                true
            }
        }
    }

    /// Forget a sender's history, e.g. after its capture restarted.
    pub fn reset(&mut self, sender: &ClientId) {
        self.last_accepted.remove(sender);
    }

    pub fn clear(&mut self) {
        self.last_accepted.clear();
    }

    pub fn last_accepted(&self, sender: &ClientId) -> Option<u64> {
        self.last_accepted.get(sender).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(sender: &str, sequence: u64) -> VideoFrame {
        VideoFrame::new(ClientId::from(sender), sequence, vec![0u8; 4])
    }

    #[test]
    fn test_first_frame_is_accepted() {
        let mut sequencer = FrameSequencer::new();
        assert!(sequencer.accept(&frame("a", 0)));
        assert_eq!(sequencer.last_accepted(&ClientId::from("a")), Some(0));
    }

    #[test]
    fn test_duplicate_and_older_frames_dropped() {
        let mut sequencer = FrameSequencer::new();
        assert!(sequencer.accept(&frame("a", 5)));
        assert!(!sequencer.accept(&frame("a", 5)));
        assert!(!sequencer.accept(&frame("a", 3)));
        assert!(sequencer.accept(&frame("a", 9)));
        assert_eq!(sequencer.last_accepted(&ClientId::from("a")), Some(9));
    }

    #[test]
    fn test_senders_are_independent() {
        let mut sequencer = FrameSequencer::new();
        assert!(sequencer.accept(&frame("a", 10)));
        assert!(sequencer.accept(&frame("b", 1)));
        assert!(!sequencer.accept(&frame("a", 2)));
    }

    #[test]
    fn test_reset_allows_restarted_sender() {
        let mut sequencer = FrameSequencer::new();
        assert!(sequencer.accept(&frame("a", 40)));
        sequencer.reset(&ClientId::from("a"));
        assert!(sequencer.accept(&frame("a", 0)));

        sequencer.clear();
        assert_eq!(sequencer.last_accepted(&ClientId::from("a")), None);
    }
}
