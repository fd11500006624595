use serde::{Deserialize, Serialize};

// Opaque per-session participant identifier, assigned by the session layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing `len` characters of the id, or the whole id when it is not
    /// longer than `len`. Counts characters, not bytes.
    pub fn suffix(&self, len: usize) -> &str {
        let count = self.0.chars().count();
        if count <= len {
            return &self.0;
        }
        match self.0.char_indices().nth(count - len) {
            Some((start, _)) => &self.0[start..],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What a display slot currently shows.
///
/// `BlankPlaceholder` is an explicit state rather than the absence of
/// frames: a surface told to show it must drop whatever it last drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentState {
    Empty,
    ActiveVideo,
    BlankPlaceholder,
}

impl ContentState {
    pub fn accepts_frames(self) -> bool {
        matches!(self, Self::ActiveVideo)
    }
}
