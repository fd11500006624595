use huddle_shared::constants::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SLOT_COUNT};
use huddle_shared::ClientId;
use uuid::Uuid;

/// Client configuration.
///
/// Every field can be set through an environment variable; missing or
/// invalid values fall back to the defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Username announced for the local participant.
    /// Env: `HUDDLE_USERNAME`
    /// Default: none
    pub username: Option<String>,

    /// Client id of the running client, normally handed out by the session
    /// layer on connect.
    /// Env: `HUDDLE_CLIENT_ID`
    /// Default: random UUID v4
    pub local_client_id: ClientId,

    /// Number of display slots in the video grid.
    /// Env: `HUDDLE_SLOT_COUNT` (>= 1)
    /// Default: `4`
    pub slot_count: usize,

    /// Capacity of the inbound session event queue.
    /// Env: `HUDDLE_QUEUE_CAPACITY` (>= 1)
    /// Default: `256`
    pub queue_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: None,
            local_client_id: ClientId::new(Uuid::new_v4().to_string()),
            slot_count: DEFAULT_SLOT_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("HUDDLE_USERNAME") {
            if !name.trim().is_empty() {
                config.username = Some(name);
            }
        }

        if let Some(id) = lookup("HUDDLE_CLIENT_ID") {
            if id.trim().is_empty() {
                tracing::warn!("Empty HUDDLE_CLIENT_ID, using a generated id");
            } else {
                config.local_client_id = ClientId::new(id.trim());
            }
        }

        if let Some(val) = lookup("HUDDLE_SLOT_COUNT") {
            match parse_positive(&val) {
                Some(n) => config.slot_count = n,
                None => tracing::warn!(
                    value = %val,
                    "Invalid HUDDLE_SLOT_COUNT, using default"
                ),
            }
        }

        if let Some(val) = lookup("HUDDLE_QUEUE_CAPACITY") {
            match parse_positive(&val) {
                Some(n) => config.queue_capacity = n,
                None => tracing::warn!(
                    value = %val,
                    "Invalid HUDDLE_QUEUE_CAPACITY, using default"
                ),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}

fn parse_positive(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
