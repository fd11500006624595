use huddle_shared::ClientId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Presenter role already taken by {holder}")]
    PresenterTaken { holder: ClientId },
}
