use bluetrack_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Session has been unmounted")]
    Disposed,

    #[error("Session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl SessionError {
    /// The backend error behind this failure, if any
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            SessionError::Client(e) => Some(e),
            _ => None,
        }
    }
}
