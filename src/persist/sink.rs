use crate::persist::error::PersistError;
use async_trait::async_trait;
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Named text artifacts, such as blobs in a container.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Removes `name` if it exists. A missing artifact is not an error.
    async fn delete(&self, name: &str) -> Result<(), PersistError>;

    /// Writes `text` as `name`, replacing any previous content.
    async fn write_text(&self, name: &str, text: &str) -> Result<(), PersistError>;
}

/// Stores artifacts as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryArtifactSink {
    root: PathBuf,
}

impl DirectoryArtifactSink {
    /// Opens `root`, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let root = root.into();
        ensure_dir_exists(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl ArtifactSink for DirectoryArtifactSink {
    async fn delete(&self, name: &str) -> Result<(), PersistError> {
        let path = self.path_of(name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted stale artifact {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::Delete(path, e)),
        }
    }

    async fn write_text(&self, name: &str, text: &str) -> Result<(), PersistError> {
        let path = self.path_of(name);
        fs::write(&path, text)
            .await
            .map_err(|e| PersistError::Write(path, e))
    }
}

async fn ensure_dir_exists(path: &Path) -> Result<(), PersistError> {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating artifact directory: {}", path.display());
            fs::create_dir_all(path)
                .await
                .map_err(|e| PersistError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(PersistError::DirCreation(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_directory() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("nested").join("artifacts");
        let sink = DirectoryArtifactSink::open(&root).await?;
        assert!(sink.root().is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_open_rejects_file() -> Result<(), Box<dyn std::error::Error>> {
        let file = tempfile::NamedTempFile::new()?;
        let err = DirectoryArtifactSink::open(file.path()).await.unwrap_err();
        assert!(matches!(err, PersistError::NotADirectory(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_write_replace_delete() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let sink = DirectoryArtifactSink::open(tmp.path()).await?;

        sink.write_text("parsed.data", "first").await?;
        sink.write_text("parsed.data", "second").await?;
        assert_eq!(std::fs::read_to_string(sink.path_of("parsed.data"))?, "second");

        sink.delete("parsed.data").await?;
        assert!(!sink.path_of("parsed.data").exists());
        // Deleting again is a no-op.
        sink.delete("parsed.data").await?;
        Ok(())
    }
}
