//! # huddle-shared
//!
//! Types shared by every Huddle crate: participant identifiers, slot
//! content states, the inbound session event protocol, and the common
//! error enum.

pub mod constants;
pub mod error;
pub mod protocol;
pub mod types;

pub use error::HuddleError;
pub use protocol::SessionEvent;
pub use types::{ClientId, ContentState};
