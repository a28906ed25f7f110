use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Local-disk storage for uploaded file bytes.
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a disk name under the upload root, refusing anything that
    /// could escape it. Disk names are single path components by
    /// construction; this guards the request-supplied side.
    fn safe_path(&self, disk_name: &str) -> io::Result<PathBuf> {
        if disk_name.is_empty()
            || disk_name.contains('/')
            || disk_name.contains('\\')
            || disk_name == "."
            || disk_name == ".."
        {
            return Err(io::Error::new(io::ErrorKind::NotFound, "invalid file name"));
        }
        Ok(self.root.join(disk_name))
    }

    pub async fn save(&self, disk_name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.safe_path(disk_name)?;
        tokio::fs::write(path, bytes).await
    }

    pub async fn open(&self, disk_name: &str) -> io::Result<tokio::fs::File> {
        let path = self.safe_path(disk_name)?;
        tokio::fs::File::open(path).await
    }

    pub async fn delete(&self, disk_name: &str) -> io::Result<()> {
        let path = self.safe_path(disk_name)?;
        tokio::fs::remove_file(path).await
    }
}

pub async fn setup_storage(upload_dir: &Path) -> anyhow::Result<Arc<StorageService>> {
    info!("🗄️  Upload directory: {}", upload_dir.display());

    tokio::fs::create_dir_all(upload_dir).await?;

    Ok(Arc::new(StorageService::new(upload_dir.to_path_buf())))
}
