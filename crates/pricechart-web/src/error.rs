use thiserror::Error;

/// Failures while preparing or running the dashboard server.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize series: {0}")]
    Serialization(#[from] serde_json::Error),
}
