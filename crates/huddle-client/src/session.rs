//! Session state owner.
//!
//! [`Session`] owns the participant registry, the media state tracker and
//! the slot assignment engine, and pushes every visible consequence of an
//! inbound event to its [`RenderSurface`] before the call returns. It is
//! single-threaded by construction; see [`crate::runner`] for feeding it
//! from concurrent producers.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use huddle_media::{FrameSequencer, MediaError, MediaStateTracker, PresenterChange, VideoFrame};
use huddle_shared::{ClientId, SessionEvent};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::registry::{ParticipantRegistry, UpsertOutcome};
use crate::render::RenderSurface;
use crate::resolver::PresenterResolver;
use crate::slots::{SlotAssignmentEngine, SlotView};

/// Optional participant fields carried by join and status events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantFields {
    pub username: Option<String>,
    pub video: Option<bool>,
    pub audio: Option<bool>,
}

/// What happened to an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDisposition {
    /// Drawn into the sender's slot.
    Rendered { slot: usize },
    /// Drawn as the screen-share image.
    Presented,
    /// The sender's slot shows the blank placeholder.
    DroppedBlank,
    /// The sender has no slot right now.
    DroppedUnassigned,
    /// Older than, or a repeat of, a frame already shown.
    DroppedStale,
    /// Screen frame from someone who is not the presenter.
    DroppedNotPresenter,
}

/// One line of the participant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub client_id: ClientId,
    pub display_name: String,
    pub username: Option<String>,
    pub video_enabled: bool,
    pub audio_enabled: bool,
    pub is_local: bool,
    pub is_presenter: bool,
    pub slot: Option<usize>,
    pub joined_at: DateTime<Utc>,
}

pub struct Session<S> {
    registry: ParticipantRegistry,
    media: MediaStateTracker,
    slots: SlotAssignmentEngine,
    video_sequencer: FrameSequencer,
    screen_sequencer: FrameSequencer,
    rendered: Vec<SlotView>,
    presenter_label: Option<String>,
    surface: S,
}

impl<S: RenderSurface> Session<S> {
    /// Start a session holding only the local participant and draw the
    /// initial grid.
    pub fn new(config: &ClientConfig, surface: S) -> Self {
        let mut session = Self {
            registry: ParticipantRegistry::new(
                config.local_client_id.clone(),
                config.username.clone(),
            ),
            media: MediaStateTracker::new(),
            slots: SlotAssignmentEngine::new(config.slot_count),
            video_sequencer: FrameSequencer::new(),
            screen_sequencer: FrameSequencer::new(),
            rendered: Vec::new(),
            presenter_label: None,
            surface,
        };

        info!(
            client = %config.local_client_id,
            slots = session.slots.capacity(),
            "Session started"
        );

        session.refresh();
        session
    }

    /// Apply one inbound event.
    pub fn handle(&mut self, event: SessionEvent) {
        debug!(kind = event.kind(), "Handling session event");

        match event {
            SessionEvent::ParticipantJoined { client_id, username } => {
                self.participant_joined(client_id, username);
            }
            SessionEvent::ParticipantLeft { client_id } => {
                self.participant_left(&client_id);
            }
            SessionEvent::ParticipantStatusChanged {
                client_id,
                username,
                video,
                audio,
            } => {
                self.participant_status_changed(
                    client_id,
                    ParticipantFields {
                        username,
                        video,
                        audio,
                    },
                );
            }
            SessionEvent::PresenterChanged { client_id } => {
                self.presenter_changed(client_id);
            }
            SessionEvent::FrameReceived {
                client_id,
                sequence,
                data,
            } => {
                self.frame_received(client_id, sequence, data);
            }
            SessionEvent::ScreenFrameReceived {
                client_id,
                sequence,
                data,
            } => {
                self.screen_frame_received(client_id, sequence, data);
            }
        }
    }

    pub fn participant_joined(&mut self, client_id: ClientId, username: Option<String>) {
        info!(client = %client_id, username = ?username, "Participant joined");
        self.upsert(
            &client_id,
            ParticipantFields {
                username,
                ..Default::default()
            },
        );
    }

    /// Remove a participant: its slot is reclaimed and any presenter role
    /// it held is cleared in the same refresh.
    pub fn participant_left(&mut self, client_id: &ClientId) {
        if self.registry.is_local(client_id) {
            warn!(client = %client_id, "Ignoring leave event for the local participant");
            return;
        }

        if self.registry.remove(client_id).is_some() {
            info!(client = %client_id, "Participant left");
        }
        if self.media.clear_on_disconnect(client_id).is_some() {
            self.screen_sequencer.clear();
        }
        self.video_sequencer.reset(client_id);
        self.refresh();
    }

    pub fn participant_status_changed(&mut self, client_id: ClientId, fields: ParticipantFields) {
        self.upsert(&client_id, fields);
    }

    /// Create or merge a participant and its media flags.
    pub fn upsert(&mut self, client_id: &ClientId, fields: ParticipantFields) {
        if self.registry.upsert(client_id, fields.username.as_deref()) == UpsertOutcome::Created {
            debug!(client = %client_id, "Participant registered");
        }
        if let Some(enabled) = fields.video {
            self.apply_video(client_id, enabled);
        }
        if let Some(enabled) = fields.audio {
            self.media.set_audio(client_id, enabled);
        }
        self.refresh();
    }

    pub fn set_video(&mut self, client_id: &ClientId, enabled: bool) {
        self.ensure_known(client_id);
        self.apply_video(client_id, enabled);
        self.refresh();
    }

    pub fn set_audio(&mut self, client_id: &ClientId, enabled: bool) {
        self.ensure_known(client_id);
        self.media.set_audio(client_id, enabled);
        self.refresh();
    }

    /// Replace the presenter unconditionally; the latest call wins.
    pub fn presenter_changed(&mut self, client_id: Option<ClientId>) {
        if let Some(id) = &client_id {
            self.ensure_known(id);
        }
        let change = self.media.set_presenter(client_id);
        self.on_presenter_change(&change);
        self.refresh();
    }

    /// Ask for the presenter role without taking it from someone else.
    pub fn request_presenter(&mut self, client_id: &ClientId) -> Result<(), MediaError> {
        self.ensure_known(client_id);
        match self.media.request_presenter(client_id) {
            Ok(change) => {
                self.on_presenter_change(&change);
                self.refresh();
                Ok(())
            }
            Err(e) => {
                info!(client = %client_id, error = %e, "Presenter request denied");
                self.refresh();
                Err(e)
            }
        }
    }

    pub fn release_presenter(&mut self, client_id: &ClientId) {
        if let Some(change) = self.media.release_presenter(client_id) {
            self.on_presenter_change(&change);
            self.refresh();
        }
    }

    /// Route a camera frame to its sender's slot. Frames for a slot that
    /// is not showing active video are dropped, never drawn.
    pub fn frame_received(
        &mut self,
        client_id: ClientId,
        sequence: u64,
        data: Bytes,
    ) -> FrameDisposition {
        if !self.registry.contains(&client_id) {
            self.ensure_known(&client_id);
            self.refresh();
        }

        let Some(slot) = self.slots.slot_of(&client_id) else {
            debug!(client = %client_id, sequence, "Dropping frame for unassigned participant");
            return FrameDisposition::DroppedUnassigned;
        };
        let Some(view) = self.rendered.get(slot) else {
            return FrameDisposition::DroppedUnassigned;
        };
        if !view.content_state.accepts_frames() {
            debug!(client = %client_id, slot, sequence, "Dropping frame for blank slot");
            return FrameDisposition::DroppedBlank;
        }

        let frame = VideoFrame::new(client_id, sequence, data);
        if !self.video_sequencer.accept(&frame) {
            return FrameDisposition::DroppedStale;
        }

        self.surface.render_slot(view, Some(&frame));
        FrameDisposition::Rendered { slot }
    }

    /// Route a screen-share frame; only the active presenter is shown.
    pub fn screen_frame_received(
        &mut self,
        client_id: ClientId,
        sequence: u64,
        data: Bytes,
    ) -> FrameDisposition {
        if !self.media.is_presenter(&client_id) {
            debug!(client = %client_id, sequence, "Dropping screen frame from non-presenter");
            return FrameDisposition::DroppedNotPresenter;
        }

        let frame = VideoFrame::new(client_id, sequence, data);
        if !self.screen_sequencer.accept(&frame) {
            return FrameDisposition::DroppedStale;
        }

        let presenter = match &self.presenter_label {
            Some(label) => label.clone(),
            None => PresenterResolver::new(&self.registry).resolve_display_name(&frame.sender),
        };
        self.surface.render_screen_frame(&presenter, &frame);
        FrameDisposition::Presented
    }

    pub fn resolve_display_name(&self, client_id: &ClientId) -> String {
        PresenterResolver::new(&self.registry).resolve_display_name(client_id)
    }

    /// Participants in join order with their resolved names and slots.
    pub fn roster(&self) -> Vec<RosterEntry> {
        let resolver = PresenterResolver::new(&self.registry);
        self.registry
            .participants()
            .into_iter()
            .map(|p| {
                let flags = self.media.flags(&p.client_id);
                RosterEntry {
                    client_id: p.client_id.clone(),
                    display_name: resolver.resolve_display_name(&p.client_id),
                    username: p.username.clone(),
                    video_enabled: flags.video_enabled,
                    audio_enabled: flags.audio_enabled,
                    is_local: p.is_local,
                    is_presenter: self.media.is_presenter(&p.client_id),
                    slot: self.slots.slot_of(&p.client_id),
                    joined_at: p.joined_at,
                }
            })
            .collect()
    }

    /// Slot views as last pushed to the surface.
    pub fn slots(&self) -> &[SlotView] {
        &self.rendered
    }

    /// Participants waiting for a free slot, earliest joined first.
    pub fn queued(&self) -> &[ClientId] {
        self.slots.queued()
    }

    pub fn presenter_label(&self) -> Option<&str> {
        self.presenter_label.as_deref()
    }

    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub fn media(&self) -> &MediaStateTracker {
        &self.media
    }

    pub fn local_client_id(&self) -> &ClientId {
        &self.registry.local_participant().client_id
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Events for unknown participants count as an implicit join.
    fn ensure_known(&mut self, client_id: &ClientId) {
        if self.registry.upsert(client_id, None) == UpsertOutcome::Created {
            info!(client = %client_id, "Implicit join for unknown participant");
        }
    }

    fn apply_video(&mut self, client_id: &ClientId, enabled: bool) {
        if self.media.set_video(client_id, enabled).is_changed() && !enabled {
            self.video_sequencer.reset(client_id);
        }
    }

    fn on_presenter_change(&mut self, change: &PresenterChange) {
        if change.is_changed() {
            self.screen_sequencer.clear();
        }
    }

    /// Recompute slots and the presenter banner, and push what changed.
    fn refresh(&mut self) {
        let resolver = PresenterResolver::new(&self.registry);
        let participants = self.registry.participants();
        let views = self.slots.recompute(&participants, &self.media, &resolver);

        for view in &views {
            if self.rendered.get(view.slot_index) != Some(view) {
                self.surface.render_slot(view, None);
            }
        }
        self.rendered = views;

        let label = self
            .media
            .active_presenter()
            .map(|id| resolver.resolve_display_name(id));
        if label != self.presenter_label {
            self.surface.render_presenter_label(label.as_deref());
            self.presenter_label = label;
        }
    }
}
