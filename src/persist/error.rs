use crate::watermark::error::WatermarkError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create artifact directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Artifact path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to write artifact '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to delete artifact '{0}'")]
    Delete(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode artifact '{name}'")]
    Encode {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifacts were written but the watermark was not advanced")]
    Watermark(#[from] WatermarkError),
}
