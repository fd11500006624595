//! Serialized event queue in front of a [`Session`].
//!
//! The session task runs in a dedicated tokio task. Producers talk to it
//! through a cloneable [`SessionHandle`]; commands are applied strictly one
//! at a time, each completing its render notifications before the next one
//! starts.

use huddle_shared::error::Result;
use huddle_shared::{HuddleError, SessionEvent};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::render::RenderSurface;
use crate::session::{RosterEntry, Session};
use crate::slots::SlotView;

/// Commands sent *into* the session task.
#[derive(Debug)]
pub enum SessionCommand {
    /// Apply an inbound session event.
    Event(SessionEvent),
    /// Request a snapshot of the participant list.
    Roster(oneshot::Sender<Vec<RosterEntry>>),
    /// Request a snapshot of the slot views.
    Slots(oneshot::Sender<Vec<SlotView>>),
    /// Stop the task after the commands already queued.
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub async fn send(&self, event: SessionEvent) -> Result<()> {
        self.command(SessionCommand::Event(event)).await
    }

    pub async fn roster(&self) -> Result<Vec<RosterEntry>> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::Roster(tx)).await?;
        rx.await.map_err(|_| HuddleError::QueueClosed)
    }

    pub async fn slots(&self) -> Result<Vec<SlotView>> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::Slots(tx)).await?;
        rx.await.map_err(|_| HuddleError::QueueClosed)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.command(SessionCommand::Shutdown).await
    }

    async fn command(&self, cmd: SessionCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| HuddleError::QueueClosed)
    }
}

/// Move `session` into its own task. The task hands the session back when
/// it stops, either on [`SessionCommand::Shutdown`] or once every handle
/// has been dropped.
pub fn spawn_session<S>(session: Session<S>, capacity: usize) -> (SessionHandle, JoinHandle<Session<S>>)
where
    S: RenderSurface + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(session_loop(session, cmd_rx));
    (SessionHandle { cmd_tx }, task)
}

async fn session_loop<S: RenderSurface>(
    mut session: Session<S>,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
) -> Session<S> {
    info!("Session event loop started");

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            SessionCommand::Event(event) => session.handle(event),
            SessionCommand::Roster(reply) => {
                let _ = reply.send(session.roster());
            }
            SessionCommand::Slots(reply) => {
                let _ = reply.send(session.slots().to_vec());
            }
            SessionCommand::Shutdown => {
                debug!("Shutdown requested");
                break;
            }
        }
    }

    info!("Session event loop stopped");
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::render::recording::{RecordingSurface, RenderCall};
    use huddle_shared::{ClientId, ContentState};

    fn session() -> Session<RecordingSurface> {
        let config = ClientConfig {
            local_client_id: ClientId::from("local"),
            ..Default::default()
        };
        Session::new(&config, RecordingSurface::default())
    }

    #[tokio::test]
    async fn test_events_applied_in_order() {
        let (handle, task) = spawn_session(session(), 8);

        handle
            .send(SessionEvent::ParticipantJoined {
                client_id: ClientId::from("client456"),
                username: None,
            })
            .await
            .unwrap();
        handle
            .send(SessionEvent::ParticipantStatusChanged {
                client_id: ClientId::from("client456"),
                username: Some("Bob".into()),
                video: Some(true),
                audio: None,
            })
            .await
            .unwrap();

        let roster = handle.roster().await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1].display_name, "Bob");
        assert!(roster[1].video_enabled);

        let slots = handle.slots().await.unwrap();
        assert_eq!(slots[1].content_state, ContentState::ActiveVideo);

        handle.shutdown().await.unwrap();
        let session = task.await.unwrap();
        assert!(session
            .surface()
            .calls
            .contains(&RenderCall::Slot {
                slot_index: 1,
                display_name: Some("Bob".into()),
                content_state: ContentState::ActiveVideo,
                frame_sequence: None,
            }));
    }

    #[tokio::test]
    async fn test_concurrent_producers_are_serialized() {
        let (handle, task) = spawn_session(session(), 4);

        let mut producers = Vec::new();
        for n in 0..10 {
            let handle = handle.clone();
            producers.push(tokio::spawn(async move {
                handle
                    .send(SessionEvent::ParticipantJoined {
                        client_id: ClientId::new(format!("client-{n}")),
                        username: None,
                    })
                    .await
            }));
        }
        for producer in producers {
            producer.await.unwrap().unwrap();
        }

        let roster = handle.roster().await.unwrap();
        assert_eq!(roster.len(), 11);
        let assigned = roster.iter().filter(|e| e.slot.is_some()).count();
        assert_eq!(assigned, 4);

        drop(handle);
        let session = task.await.unwrap();
        assert_eq!(session.queued().len(), 7);
    }

    #[tokio::test]
    async fn test_send_after_shutdown_fails() {
        let (handle, task) = spawn_session(session(), 1);
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        let result = handle
            .send(SessionEvent::PresenterChanged { client_id: None })
            .await;
        assert!(matches!(result, Err(HuddleError::QueueClosed)));
    }
}
