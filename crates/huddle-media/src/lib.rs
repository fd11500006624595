//! # huddle-media
//!
//! Per-participant media state: camera and microphone flags, the single
//! active screen-share presenter, and sequencing of inbound frames so a
//! stale or duplicate frame never reaches the display.

pub mod error;
pub mod frame;
pub mod tracker;

pub use error::MediaError;
pub use frame::{FrameSequencer, VideoFrame};
pub use tracker::{MediaChange, MediaFlags, MediaStateTracker, PresenterChange};
