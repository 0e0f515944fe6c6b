use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("connection configuration error: {0}")]
    Config(String),

    #[error("cannot launch engine binary {path}: {source}")]
    Launch {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("cannot reach engine control port {port}: {source}")]
    Connect {
        port:   u16,
        source: std::io::Error,
    },

    #[error("engine rejected {command}: {message}")]
    Engine {
        command: &'static str,
        message: String,
    },

    #[error("malformed engine response: {0}")]
    Protocol(String),

    #[error("engine session is closed")]
    Closed,

    #[error("I/O error talking to engine: {0}")]
    Io(#[from] std::io::Error),
}

impl LinkError {
    /// `true` for errors that mean the session could never be established.
    /// These are the only errors that should affect process exit status.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            LinkError::Config(_) | LinkError::Launch { .. } | LinkError::Connect { .. }
        )
    }
}

pub type LinkResult<T> = Result<T, LinkError>;
