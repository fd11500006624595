/// Application name
pub const APP_NAME: &str = "Huddle";

/// Label shown for the running client, whatever its username
pub const LOCAL_DISPLAY_LABEL: &str = "You (Local)";

/// Prefix of the label built for participants without a username
pub const FALLBACK_LABEL_PREFIX: &str = "User";

/// Number of trailing client id characters kept in a fallback label
pub const FALLBACK_SUFFIX_LEN: usize = 4;

/// Display slots in the video grid (2x2)
pub const DEFAULT_SLOT_COUNT: usize = 4;

/// Slot the local participant prefers
pub const LOCAL_PREFERRED_SLOT: usize = 0;

/// Bounded capacity of the session event queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;
