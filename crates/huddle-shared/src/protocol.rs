//! Inbound session events.
//!
//! These are the only inputs the participant/media core reacts to. The
//! network layer decodes its own framing and hands over one
//! [`SessionEvent`] per notification. In JSON form frame payloads are
//! base64 strings.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::ClientId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A remote participant joined, possibly before its username is known.
    ParticipantJoined {
        client_id: ClientId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    /// A participant left or its connection dropped.
    ParticipantLeft { client_id: ClientId },
    /// Status update; absent fields are left as they are.
    ParticipantStatusChanged {
        client_id: ClientId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<bool>,
    },
    /// Screen-share presenter changed; `None` means nobody shares.
    PresenterChanged {
        #[serde(default)]
        client_id: Option<ClientId>,
    },
    /// A decoded camera frame.
    FrameReceived {
        client_id: ClientId,
        sequence: u64,
        #[serde(with = "base64_bytes")]
        data: Bytes,
    },
    /// A decoded screen-share frame.
    ScreenFrameReceived {
        client_id: ClientId,
        sequence: u64,
        #[serde(with = "base64_bytes")]
        data: Bytes,
    },
}

impl SessionEvent {
    /// Short event name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ParticipantJoined { .. } => "participant_joined",
            Self::ParticipantLeft { .. } => "participant_left",
            Self::ParticipantStatusChanged { .. } => "participant_status_changed",
            Self::PresenterChanged { .. } => "presenter_changed",
            Self::FrameReceived { .. } => "frame_received",
            Self::ScreenFrameReceived { .. } => "screen_frame_received",
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
