//! Slot assignment.
//!
//! Maps participants onto the fixed display slots of the video grid. The
//! engine remembers who sits where between recomputations so a participant
//! keeps its slot while it stays in the session. Participants beyond
//! capacity wait in join order and the earliest one takes the next slot
//! that frees up.

use std::collections::HashSet;

use huddle_media::MediaStateTracker;
use huddle_shared::constants::LOCAL_PREFERRED_SLOT;
use huddle_shared::{ClientId, ContentState};
use serde::Serialize;
use tracing::debug;

use crate::registry::Participant;
use crate::resolver::PresenterResolver;

/// What one slot shows after a recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub slot_index: usize,
    pub occupant: Option<ClientId>,
    pub display_name: Option<String>,
    pub content_state: ContentState,
}

impl SlotView {
    fn empty(slot_index: usize) -> Self {
        Self {
            slot_index,
            occupant: None,
            display_name: None,
            content_state: ContentState::Empty,
        }
    }
}

#[derive(Debug)]
pub struct SlotAssignmentEngine {
    slots: Vec<Option<ClientId>>,
    queued: Vec<ClientId>,
}

impl SlotAssignmentEngine {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            queued: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Reassign slots for the given participants (expected in join order)
    /// and describe every slot.
    ///
    /// A client id listed more than once counts once, at its first
    /// position, with the state of its last occurrence.
    pub fn recompute(
        &mut self,
        participants: &[&Participant],
        media: &MediaStateTracker,
        resolver: &PresenterResolver<'_>,
    ) -> Vec<SlotView> {
        let present = dedupe(participants);
        let present_ids: HashSet<&ClientId> = present.iter().map(|p| &p.client_id).collect();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let departed = slot.as_ref().map_or(false, |id| !present_ids.contains(id));
            if departed {
                if let Some(id) = slot.take() {
                    debug!(slot = index, client = %id, "Slot freed");
                }
            }
        }

        if let Some(local) = present.iter().find(|p| p.is_local) {
            if self.slot_of(&local.client_id).is_none() {
                let target = self.local_target(&present);
                self.slots[target] = Some(local.client_id.clone());
                debug!(slot = target, client = %local.client_id, "Local participant assigned");
            }
        }

        self.queued.clear();
        for participant in &present {
            if self.slot_of(&participant.client_id).is_some() {
                continue;
            }
            match self.slots.iter().position(Option::is_none) {
                Some(index) => {
                    debug!(slot = index, client = %participant.client_id, "Slot assigned");
                    self.slots[index] = Some(participant.client_id.clone());
                }
                None => self.queued.push(participant.client_id.clone()),
            }
        }

        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Some(id) => SlotView {
                    slot_index: index,
                    occupant: Some(id.clone()),
                    display_name: Some(resolver.resolve_display_name(id)),
                    content_state: if media.video_enabled(id) {
                        ContentState::ActiveVideo
                    } else {
                        ContentState::BlankPlaceholder
                    },
                },
                None => SlotView::empty(index),
            })
            .collect()
    }

    pub fn slot_of(&self, client_id: &ClientId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(client_id))
    }

    /// Participants tracked but not displayed, earliest joined first.
    pub fn queued(&self) -> &[ClientId] {
        &self.queued
    }

    /// Slot for a local participant that has none: the preferred slot if
    /// free, else the first free one, else the slot of the latest-joined
    /// remote occupant, which goes back to waiting.
    fn local_target(&mut self, present: &[&Participant]) -> usize {
        if self.slots[LOCAL_PREFERRED_SLOT].is_none() {
            return LOCAL_PREFERRED_SLOT;
        }
        if let Some(index) = self.slots.iter().position(Option::is_none) {
            return index;
        }

        let latest = present
            .iter()
            .rev()
            .filter(|p| !p.is_local)
            .find_map(|p| self.slot_of(&p.client_id));
        let index = latest.unwrap_or(self.slots.len() - 1);
        if let Some(evicted) = self.slots[index].take() {
            debug!(slot = index, client = %evicted, "Slot handed over to local participant");
        }
        index
    }
}

fn dedupe<'a>(participants: &[&'a Participant]) -> Vec<&'a Participant> {
    let mut unique: Vec<&'a Participant> = Vec::with_capacity(participants.len());
    for participant in participants {
        match unique
            .iter()
            .position(|p| p.client_id == participant.client_id)
        {
            Some(index) => unique[index] = participant,
            None => unique.push(participant),
        }
    }
    unique
}
