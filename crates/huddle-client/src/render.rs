//! Render surface boundary.
//!
//! The session pushes display updates through [`RenderSurface`]; the
//! surface owns no participant state of its own. A slot rendered as
//! `BlankPlaceholder` or `Empty` comes without a frame, and the surface
//! must clear whatever it last drew there.

use huddle_media::VideoFrame;
use tracing::{debug, info};

use crate::slots::SlotView;

pub trait RenderSurface {
    /// Draw one slot. `frame` is only ever set for `ActiveVideo` slots.
    fn render_slot(&mut self, slot: &SlotView, frame: Option<&VideoFrame>);

    /// Show who is sharing their screen, or hide the banner with `None`.
    fn render_presenter_label(&mut self, display_name: Option<&str>);

    /// Draw a screen-share frame from the active presenter.
    fn render_screen_frame(&mut self, presenter: &str, frame: &VideoFrame);
}

/// Surface that only logs what it would draw. Used by the headless binary.
#[derive(Debug, Default)]
pub struct LogSurface {
    frames_drawn: u64,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl RenderSurface for LogSurface {
    fn render_slot(&mut self, slot: &SlotView, frame: Option<&VideoFrame>) {
        match frame {
            Some(frame) => {
                self.frames_drawn += 1;
                debug!(
                    slot = slot.slot_index,
                    name = ?slot.display_name,
                    sequence = frame.sequence,
                    bytes = frame.data.len(),
                    "Slot frame"
                );
            }
            None => info!(
                slot = slot.slot_index,
                name = ?slot.display_name,
                state = ?slot.content_state,
                "Slot updated"
            ),
        }
    }

    fn render_presenter_label(&mut self, display_name: Option<&str>) {
        match display_name {
            Some(name) => info!(presenter = %name, "Screen sharing started"),
            None => info!("Screen sharing stopped"),
        }
    }

    fn render_screen_frame(&mut self, presenter: &str, frame: &VideoFrame) {
        self.frames_drawn += 1;
        debug!(
            presenter = %presenter,
            sequence = frame.sequence,
            bytes = frame.data.len(),
            "Screen frame"
        );
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use huddle_shared::{ClientId, ContentState};

    #[test]
    fn test_log_surface_counts_drawn_frames() {
        let mut surface = LogSurface::new();
        let view = SlotView {
            slot_index: 0,
            occupant: Some(ClientId::from("local")),
            display_name: Some("You (Local)".into()),
            content_state: ContentState::ActiveVideo,
        };
        let frame = VideoFrame::new(ClientId::from("local"), 1, vec![1, 2, 3]);

        surface.render_slot(&view, None);
        surface.render_slot(&view, Some(&frame));
        surface.render_screen_frame("Alice", &frame);
        surface.render_presenter_label(None);

        assert_eq!(surface.frames_drawn(), 2);
    }
}
