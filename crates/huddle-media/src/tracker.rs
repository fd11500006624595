//! Media state tracking.
//!
//! Holds the camera/microphone flags of every participant and the one
//! active screen-share presenter. Setters report whether anything changed
//! so the owner can decide what to re-render; repeating a value is allowed
//! and simply reports [`MediaChange::Unchanged`].

use std::collections::HashMap;

use huddle_shared::ClientId;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::MediaError;

/// Camera and microphone state of one participant. Both default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MediaFlags {
    pub video_enabled: bool,
    pub audio_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaChange {
    Changed,
    Unchanged,
}

impl MediaChange {
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Outcome of a presenter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterChange {
    pub previous: Option<ClientId>,
    pub current: Option<ClientId>,
}

impl PresenterChange {
    pub fn is_changed(&self) -> bool {
        self.previous != self.current
    }
}

#[derive(Debug, Default)]
pub struct MediaStateTracker {
    flags: HashMap<ClientId, MediaFlags>,
    active_presenter: Option<ClientId>,
}

impl MediaStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_video(&mut self, client_id: &ClientId, enabled: bool) -> MediaChange {
        let flags = self.flags.entry(client_id.clone()).or_default();
        if flags.video_enabled == enabled {
            return MediaChange::Unchanged;
        }
        flags.video_enabled = enabled;
        debug!(client = %client_id, enabled, "Video state changed");
        MediaChange::Changed
    }

    pub fn set_audio(&mut self, client_id: &ClientId, enabled: bool) -> MediaChange {
        let flags = self.flags.entry(client_id.clone()).or_default();
        if flags.audio_enabled == enabled {
            return MediaChange::Unchanged;
        }
        flags.audio_enabled = enabled;
        debug!(client = %client_id, enabled, "Audio state changed");
        MediaChange::Changed
    }

    /// Flags for a participant; unknown participants have everything off.
    pub fn flags(&self, client_id: &ClientId) -> MediaFlags {
        self.flags.get(client_id).copied().unwrap_or_default()
    }

    pub fn video_enabled(&self, client_id: &ClientId) -> bool {
        self.flags(client_id).video_enabled
    }

    /// Set or clear the active presenter. A new presenter replaces the old
    /// one in a single step, so there is never more than one.
    pub fn set_presenter(&mut self, client_id: Option<ClientId>) -> PresenterChange {
        let previous = std::mem::replace(&mut self.active_presenter, client_id);
        let change = PresenterChange {
            previous,
            current: self.active_presenter.clone(),
        };

        if change.is_changed() {
            info!(
                previous = ?change.previous.as_ref().map(ClientId::as_str),
                current = ?change.current.as_ref().map(ClientId::as_str),
                "Presenter changed"
            );
        }

        change
    }

    /// Ask for the presenter role. Granted when nobody presents or the
    /// requester already does; the current holder is never evicted.
    pub fn request_presenter(&mut self, client_id: &ClientId) -> Result<PresenterChange, MediaError> {
        match &self.active_presenter {
            Some(holder) if holder != client_id => Err(MediaError::PresenterTaken {
                holder: holder.clone(),
            }),
            _ => Ok(self.set_presenter(Some(client_id.clone()))),
        }
    }

    /// Give up the presenter role. Does nothing unless `client_id` holds it.
    pub fn release_presenter(&mut self, client_id: &ClientId) -> Option<PresenterChange> {
        if self.is_presenter(client_id) {
            Some(self.set_presenter(None))
        } else {
            None
        }
    }

    pub fn active_presenter(&self) -> Option<&ClientId> {
        self.active_presenter.as_ref()
    }

    pub fn is_presenter(&self, client_id: &ClientId) -> bool {
        self.active_presenter.as_ref() == Some(client_id)
    }

    /// Drop all media state of a departed participant. Its flags read as
    /// off afterwards and the presenter role is cleared if it held it.
    ///
    /// Returns the presenter change when one happened.
    pub fn clear_on_disconnect(&mut self, client_id: &ClientId) -> Option<PresenterChange> {
        self.flags.remove(client_id);
        debug!(client = %client_id, "Cleared media state on disconnect");
        self.release_presenter(client_id)
    }
}
