use std::io;
use std::path::PathBuf;

use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

/// On-disk photo blob storage.
///
/// Each photo is a flat file at `{dir}/{photo_id}`. Ids are UUIDs, so paths
/// cannot be influenced by the client.
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub async fn new(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Photo storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    fn blob_path(&self, photo_id: &Uuid) -> PathBuf {
        self.dir.join(photo_id.to_string())
    }

    pub async fn write_blob(&self, photo_id: &Uuid, data: &[u8]) -> io::Result<()> {
        fs::write(self.blob_path(photo_id), data).await
    }

    pub async fn read_blob(&self, photo_id: &Uuid) -> io::Result<Vec<u8>> {
        fs::read(self.blob_path(photo_id)).await
    }

    /// Delete a photo's blob. A missing file is logged, not an error; the
    /// database row is the source of truth.
    pub async fn delete_blob(&self, photo_id: &Uuid) -> io::Result<()> {
        match fs::remove_file(self.blob_path(photo_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Blob for photo {} already gone", photo_id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_read_delete_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Storage::new(tmp.path().join("photos")).await.unwrap();
        let id = Uuid::new_v4();

        storage.write_blob(&id, b"jpeg bytes").await.unwrap();
        assert_eq!(storage.read_blob(&id).await.unwrap(), b"jpeg bytes");

        storage.delete_blob(&id).await.unwrap();
        assert!(storage.read_blob(&id).await.is_err());
    }

    #[tokio::test]
    async fn deleting_a_missing_blob_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Storage::new(tmp.path().to_path_buf()).await.unwrap();
        storage.delete_blob(&Uuid::new_v4()).await.unwrap();
    }
}
