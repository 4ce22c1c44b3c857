//! Image file storage
//!
//! Controllers never touch the filesystem directly; they hand bytes to an
//! [`ImageStore`] and persist the relative path it returns. The local
//! backend writes under `{root}/products/` with generated names of the form
//! `{unix_ts}_{product_id}_{random}.{ext}`, so two uploads in the same
//! request get distinct names even when the original filenames collide.

use anyhow::Result;
use chrono::Utc;
use rand::RngCore;
use std::future::Future;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

/// Random suffix length in bytes before hex encoding
const SUFFIX_BYTES: usize = 8;

/// A file received from a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Storage backend for uploaded product images
pub trait ImageStore {
    /// Persist the bytes of an uploaded file and return the relative path
    /// under which it was stored.
    fn store(
        &self,
        product_id: Uuid,
        original_name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Local-disk image store rooted at the public upload directory
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn generate_filename(product_id: Uuid, original_name: &str) -> String {
        let timestamp = Utc::now().timestamp();
        let mut suffix = [0u8; SUFFIX_BYTES];
        rand::thread_rng().fill_bytes(&mut suffix);

        let extension = file_extension(original_name)
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        format!(
            "{}_{}_{}.{}",
            timestamp,
            product_id,
            hex::encode(suffix),
            extension
        )
    }
}

impl ImageStore for LocalImageStore {
    async fn store(&self, product_id: Uuid, original_name: &str, bytes: &[u8]) -> Result<String> {
        let filename = Self::generate_filename(product_id, original_name);

        let dir = self.root.join("products");
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&filename), bytes).await?;

        Ok(format!("products/{filename}"))
    }
}

/// Extension of a filename, if it has one
pub fn file_extension(name: &str) -> Option<&str> {
    let (stem, extension) = name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_extension_handles_common_cases() {
        assert_eq!(file_extension("photo.jpg"), Some("jpg"));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn generated_filenames_embed_product_id_and_extension() {
        let product_id = Uuid::new_v4();
        let name = LocalImageStore::generate_filename(product_id, "Photo.JPG");
        assert!(name.contains(&product_id.to_string()));
        assert!(name.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn store_writes_bytes_under_products_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());

        let path = store
            .store(Uuid::new_v4(), "photo.png", b"png-bytes")
            .await
            .unwrap();

        assert!(path.starts_with("products/"));
        let written = std::fs::read(dir.path().join(&path)).unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn colliding_original_names_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        let product_id = Uuid::new_v4();

        let first = store.store(product_id, "img1.jpg", b"first").await.unwrap();
        let second = store.store(product_id, "img1.jpg", b"second").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(
            std::fs::read(dir.path().join(&first)).unwrap(),
            b"first"
        );
        assert_eq!(
            std::fs::read(dir.path().join(&second)).unwrap(),
            b"second"
        );
    }
}
