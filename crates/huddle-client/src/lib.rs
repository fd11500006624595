//! # huddle-client
//!
//! Participant and media-state synchronization for the Huddle LAN
//! collaboration client.
//!
//! Inbound session events update the [`registry::ParticipantRegistry`]
//! and the media state tracker; the [`slots::SlotAssignmentEngine`] then
//! recomputes which participant each video slot shows, and the
//! [`session::Session`] pushes the result to a [`render::RenderSurface`].

pub mod config;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod runner;
pub mod script;
pub mod session;
pub mod slots;

pub use config::ClientConfig;
pub use registry::{Participant, ParticipantRegistry};
pub use render::{LogSurface, RenderSurface};
pub use resolver::PresenterResolver;
pub use runner::{spawn_session, SessionCommand, SessionHandle};
pub use session::{FrameDisposition, ParticipantFields, RosterEntry, Session};
pub use slots::{SlotAssignmentEngine, SlotView};

use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide log subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,huddle_client=debug,huddle_media=debug")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
