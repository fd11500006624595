//! Participant registry.
//!
//! Source of truth for who is in the session and what they are called.
//! The local participant is created together with the registry and lives
//! as long as it does, so there is always exactly one local record.
//! Remote records keep their join order, which drives slot assignment.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use huddle_shared::ClientId;
use tracing::{debug, warn};

/// Identity record of one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub client_id: ClientId,
    /// Human-readable name, absent until the session layer reports one.
    pub username: Option<String>,
    pub is_local: bool,
    pub joined_at: DateTime<Utc>,
    join_order: u64,
}

impl Participant {
    fn new(client_id: ClientId, username: Option<String>, is_local: bool, join_order: u64) -> Self {
        Self {
            client_id,
            username,
            is_local,
            joined_at: Utc::now(),
            join_order,
        }
    }

    /// Position in the join sequence; lower joined earlier.
    pub fn join_order(&self) -> u64 {
        self.join_order
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug)]
pub struct ParticipantRegistry {
    local: Participant,
    remotes: HashMap<ClientId, Participant>,
    next_order: u64,
}

impl ParticipantRegistry {
    /// Create a registry holding only the local participant.
    pub fn new(local_id: ClientId, username: Option<String>) -> Self {
        Self {
            local: Participant::new(local_id, non_empty(username.as_deref()), true, 0),
            remotes: HashMap::new(),
            next_order: 1,
        }
    }

    /// Create or merge a participant. A present, non-blank `username`
    /// replaces the stored one; a blank one never erases a known name.
    pub fn upsert(&mut self, client_id: &ClientId, username: Option<&str>) -> UpsertOutcome {
        let username = non_empty(username);

        if !self.contains(client_id) {
            debug!(
                client = %client_id,
                username = ?username,
                order = self.next_order,
                "Registering participant"
            );
            let participant = Participant::new(client_id.clone(), username, false, self.next_order);
            self.next_order += 1;
            self.remotes.insert(client_id.clone(), participant);
            return UpsertOutcome::Created;
        }

        let participant = if *client_id == self.local.client_id {
            &mut self.local
        } else {
            match self.remotes.get_mut(client_id) {
                Some(participant) => participant,
                None => return UpsertOutcome::Unchanged,
            }
        };

        match username {
            Some(name) if participant.username.as_deref() != Some(name.as_str()) => {
                debug!(client = %client_id, username = %name, "Username updated");
                participant.username = Some(name);
                UpsertOutcome::Updated
            }
            _ => UpsertOutcome::Unchanged,
        }
    }

    /// Remove a remote participant. Unknown ids are a no-op; the local
    /// participant cannot be removed.
    pub fn remove(&mut self, client_id: &ClientId) -> Option<Participant> {
        if *client_id == self.local.client_id {
            warn!(client = %client_id, "Ignoring removal of the local participant");
            return None;
        }

        let removed = self.remotes.remove(client_id);
        if removed.is_some() {
            debug!(client = %client_id, "Removed participant from registry");
        }
        removed
    }

    pub fn get(&self, client_id: &ClientId) -> Option<&Participant> {
        if *client_id == self.local.client_id {
            Some(&self.local)
        } else {
            self.remotes.get(client_id)
        }
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.get(client_id).is_some()
    }

    pub fn local_participant(&self) -> &Participant {
        &self.local
    }

    pub fn is_local(&self, client_id: &ClientId) -> bool {
        *client_id == self.local.client_id
    }

    /// All participants, local included, in join order.
    pub fn participants(&self) -> Vec<&Participant> {
        let mut all: Vec<&Participant> = std::iter::once(&self.local)
            .chain(self.remotes.values())
            .collect();
        all.sort_by_key(|p| p.join_order);
        all
    }

    pub fn len(&self) -> usize {
        self.remotes.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

fn non_empty(username: Option<&str>) -> Option<String> {
    username
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ClientId {
        ClientId::from(s)
    }

    fn registry() -> ParticipantRegistry {
        ParticipantRegistry::new(id("local"), Some("Me".into()))
    }

    #[test]
    fn test_local_participant_exists_from_start() {
        let registry = registry();
        let local = registry.local_participant();
        assert_eq!(local.client_id, id("local"));
        assert!(local.is_local);
        assert_eq!(local.username.as_deref(), Some("Me"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_upsert_creates_then_merges() {
        let mut registry = registry();
        assert_eq!(registry.upsert(&id("a"), None), UpsertOutcome::Created);
        assert_eq!(registry.get(&id("a")).unwrap().username, None);

        assert_eq!(registry.upsert(&id("a"), Some("Alice")), UpsertOutcome::Updated);
        assert_eq!(registry.upsert(&id("a"), Some("Alice")), UpsertOutcome::Unchanged);
        assert_eq!(
            registry.get(&id("a")).unwrap().username.as_deref(),
            Some("Alice")
        );
        assert!(!registry.get(&id("a")).unwrap().is_local);
    }

    #[test]
    fn test_blank_username_never_erases_known_name() {
        let mut registry = registry();
        registry.upsert(&id("a"), Some("Alice"));
        assert_eq!(registry.upsert(&id("a"), Some("")), UpsertOutcome::Unchanged);
        assert_eq!(registry.upsert(&id("a"), Some("   ")), UpsertOutcome::Unchanged);
        assert_eq!(registry.upsert(&id("a"), None), UpsertOutcome::Unchanged);
        assert_eq!(
            registry.get(&id("a")).unwrap().username.as_deref(),
            Some("Alice")
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = registry();
        registry.upsert(&id("a"), None);
        assert!(registry.remove(&id("a")).is_some());
        assert!(registry.remove(&id("a")).is_none());
        assert!(registry.remove(&id("never-seen")).is_none());
        assert!(!registry.contains(&id("a")));
    }

    #[test]
    fn test_local_participant_cannot_be_removed() {
        let mut registry = registry();
        assert!(registry.remove(&id("local")).is_none());
        assert!(registry.contains(&id("local")));
        assert!(registry.local_participant().is_local);
    }

    #[test]
    fn test_upsert_on_local_id_updates_local_record() {
        let mut registry = registry();
        assert_eq!(registry.upsert(&id("local"), Some("Renamed")), UpsertOutcome::Updated);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.local_participant().username.as_deref(),
            Some("Renamed")
        );
    }

    #[test]
    fn test_participants_in_join_order() {
        let mut registry = registry();
        registry.upsert(&id("c"), None);
        registry.upsert(&id("a"), None);
        registry.upsert(&id("b"), None);

        let order: Vec<&str> = registry
            .participants()
            .iter()
            .map(|p| p.client_id.as_str())
            .collect();
        assert_eq!(order, vec!["local", "c", "a", "b"]);
    }

    #[test]
    fn test_rejoin_goes_to_back_of_join_order() {
        let mut registry = registry();
        registry.upsert(&id("a"), None);
        registry.upsert(&id("b"), None);
        registry.remove(&id("a"));
        registry.upsert(&id("a"), None);

        let order: Vec<&str> = registry
            .participants()
            .iter()
            .map(|p| p.client_id.as_str())
            .collect();
        assert_eq!(order, vec!["local", "b", "a"]);
    }
}
