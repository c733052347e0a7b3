//! Server startup and runtime errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound; fatal at startup
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
