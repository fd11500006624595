//! Display name resolution.
//!
//! Turns an opaque client id into the label shown on slots and on the
//! screen-share banner. Resolution is total: the first matching rule wins
//! and the last rule always matches.
//!
//! 1. the local participant is always [`LOCAL_DISPLAY_LABEL`]
//! 2. a known, non-empty username is returned verbatim
//! 3. otherwise `"User <suffix>"` from the trailing id characters

use huddle_shared::constants::{FALLBACK_LABEL_PREFIX, FALLBACK_SUFFIX_LEN, LOCAL_DISPLAY_LABEL};
use huddle_shared::ClientId;

use crate::registry::ParticipantRegistry;

pub struct PresenterResolver<'a> {
    registry: &'a ParticipantRegistry,
}

impl<'a> PresenterResolver<'a> {
    pub fn new(registry: &'a ParticipantRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve_display_name(&self, client_id: &ClientId) -> String {
        if self.registry.is_local(client_id) {
            return LOCAL_DISPLAY_LABEL.to_string();
        }

        let username = self
            .registry
            .get(client_id)
            .and_then(|p| p.username.as_deref())
            .filter(|name| !name.is_empty());

        match username {
            Some(name) => name.to_string(),
            None => fallback_label(client_id),
        }
    }
}

/// Label for a participant whose username is unknown.
pub fn fallback_label(client_id: &ClientId) -> String {
    format!(
        "{} {}",
        FALLBACK_LABEL_PREFIX,
        client_id.suffix(FALLBACK_SUFFIX_LEN)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ClientId {
        ClientId::from(s)
    }

    #[test]
    fn test_local_always_gets_fixed_label() {
        let registry = ParticipantRegistry::new(id("local-client-0001"), Some("Dana".into()));
        let resolver = PresenterResolver::new(&registry);
        assert_eq!(resolver.resolve_display_name(&id("local-client-0001")), "You (Local)");
    }

    #[test]
    fn test_known_username_returned_verbatim() {
        let mut registry = ParticipantRegistry::new(id("local"), None);
        registry.upsert(&id("34e45b57-251f-44a0-bd78-340257e417b6"), Some("Alice"));
        registry.upsert(&id("client456"), Some("  Bob  "));

        let resolver = PresenterResolver::new(&registry);
        assert_eq!(
            resolver.resolve_display_name(&id("34e45b57-251f-44a0-bd78-340257e417b6")),
            "Alice"
        );
        assert_eq!(resolver.resolve_display_name(&id("client456")), "  Bob  ");
    }

    #[test]
    fn test_fallback_uses_last_four_characters() {
        let mut registry = ParticipantRegistry::new(id("local"), None);
        registry.upsert(&id("34e45b57-251f-44a0-bd78-340257e417b6"), None);

        let resolver = PresenterResolver::new(&registry);
        assert_eq!(
            resolver.resolve_display_name(&id("34e45b57-251f-44a0-bd78-340257e417b6")),
            "User 17b6"
        );
        assert_eq!(resolver.resolve_display_name(&id("unknown_client_id")), "User t_id");
    }

    #[test]
    fn test_fallback_keeps_short_ids_whole() {
        let registry = ParticipantRegistry::new(id("local"), None);
        let resolver = PresenterResolver::new(&registry);
        assert_eq!(resolver.resolve_display_name(&id("abcd")), "User abcd");
        assert_eq!(resolver.resolve_display_name(&id("x1")), "User x1");
    }
}
