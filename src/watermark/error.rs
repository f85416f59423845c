use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("Failed to connect to the watermark database")]
    Connect(#[source] sqlx::Error),

    #[error("Failed to query last poll for station '{station}'")]
    Query {
        station: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to record poll for station '{station}'")]
    Record {
        station: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Watermark store is unavailable: {0}")]
    Unavailable(String),
}

impl WatermarkError {
    /// Whether the backing store reported a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            WatermarkError::Connect(source)
            | WatermarkError::Query { source, .. }
            | WatermarkError::Record { source, .. } => is_sqlx_timeout(source),
            WatermarkError::Unavailable(_) => false,
        }
    }
}

fn is_sqlx_timeout(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Io(io) => io.kind() == std::io::ErrorKind::TimedOut,
        _ => false,
    }
}
