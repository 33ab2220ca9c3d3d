//! Local image store for kit uploads.
//!
//! Uploaded images are written into a single directory under a generated
//! name (`<uuid>.<ext>`) that keeps the original extension. Only the
//! basename is ever handed back to callers; it is what gets persisted in
//! the kit's `images` list.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Default upload directory, relative to the server's working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "./public/products";

// ---------------------------------------------------------------------------
// Filename helpers
// ---------------------------------------------------------------------------

/// Extract a normalized extension from a client-supplied filename.
///
/// Directory components (either separator style) are discarded first. The
/// extension is lower-cased and kept only if it is non-empty ASCII
/// alphanumeric; anything else yields `None`.
pub fn file_extension(original_name: &str) -> Option<String> {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Generate a unique stored filename, preserving the original extension.
///
/// ```
/// use kitstore_core::upload::stored_filename;
///
/// let name = stored_filename(Some("photos/Widget.PNG"));
/// assert!(name.ends_with(".png"));
/// assert!(!name.contains('/'));
/// ```
pub fn stored_filename(original_name: Option<&str>) -> String {
    let id = uuid::Uuid::new_v4();
    match original_name.and_then(file_extension) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Whether `filename` is a bare basename that cannot escape the store directory.
fn is_plain_basename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// A file that has been (or is being) written into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Generated basename, e.g. `0b6c...e1.png`.
    pub filename: String,
    /// Full path inside the store directory.
    pub path: PathBuf,
}

/// Directory-backed image store.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory (and parents) if it does not exist.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Open a new, uniquely named file for streaming an upload into.
    ///
    /// The file is created with `create_new`, so a name collision is an
    /// error rather than an overwrite.
    pub async fn create(&self, original_name: Option<&str>) -> io::Result<ImageWriter> {
        self.ensure_dir().await?;

        let filename = stored_filename(original_name);
        let path = self.dir.join(&filename);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        Ok(ImageWriter {
            file,
            image: StoredImage { filename, path },
            written: 0,
        })
    }

    /// Write a complete in-memory image in one call.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> io::Result<StoredImage> {
        let mut writer = self.create(original_name).await?;
        writer.write_chunk(bytes).await?;
        writer.finish().await
    }

    /// Delete a stored file by basename.
    pub async fn remove(&self, filename: &str) -> io::Result<()> {
        if !is_plain_basename(filename) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{filename}' is not a stored image name"),
            ));
        }
        fs::remove_file(self.dir.join(filename)).await
    }

    /// Whether the store directory exists and is not read-only.
    ///
    /// `create` recreates a missing directory on demand; this only reports
    /// the current state for health checks.
    pub async fn is_ready(&self) -> bool {
        match fs::metadata(&self.dir).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => false,
        }
    }

    /// Whether a stored file with this basename currently exists.
    pub async fn exists(&self, filename: &str) -> bool {
        is_plain_basename(filename) && fs::try_exists(self.dir.join(filename)).await.unwrap_or(false)
    }
}

/// Streaming writer for one upload. Obtained from [`ImageStore::create`].
#[derive(Debug)]
pub struct ImageWriter {
    file: File,
    image: StoredImage,
    written: u64,
}

impl ImageWriter {
    /// The file this writer targets. Known before any bytes are written so
    /// callers can clean up after a partial write.
    pub fn image(&self) -> &StoredImage {
        &self.image
    }

    /// Number of bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush and sync the file to disk.
    pub async fn finish(mut self) -> io::Result<StoredImage> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Widget.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
    }

    #[test]
    fn extension_ignores_directories() {
        assert_eq!(file_extension("a.b/photo.jpg").as_deref(), Some("jpg"));
        assert_eq!(file_extension(r"C:\pics\photo.webp").as_deref(), Some("webp"));
        assert_eq!(file_extension("dir.d/photo"), None);
    }

    #[test]
    fn missing_or_odd_extension_is_dropped() {
        assert_eq!(file_extension("photo"), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("photo."), None);
        assert_eq!(file_extension("photo.p n g"), None);
    }

    #[test]
    fn stored_filenames_are_unique() {
        let a = stored_filename(Some("x.png"));
        let b = stored_filename(Some("x.png"));
        assert_ne!(a, b);
        assert_eq!(a.len(), 36 + ".png".len());
    }

    #[test]
    fn stored_filename_without_extension_is_bare_uuid() {
        let name = stored_filename(None);
        assert!(uuid::Uuid::parse_str(&name).is_ok());
    }

    #[tokio::test]
    async fn save_writes_file_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("products"));

        let image = store.save(Some("widget.png"), b"\x89PNG").await.unwrap();

        assert!(image.filename.ends_with(".png"));
        assert_eq!(image.path, store.dir().join(&image.filename));
        assert_eq!(tokio::fs::read(&image.path).await.unwrap(), b"\x89PNG");
        assert!(store.exists(&image.filename).await);
    }

    #[tokio::test]
    async fn streaming_writer_counts_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let mut writer = store.create(Some("a.jpg")).await.unwrap();
        writer.write_chunk(b"abc").await.unwrap();
        writer.write_chunk(b"de").await.unwrap();
        assert_eq!(writer.written(), 5);
        let image = writer.finish().await.unwrap();

        assert_eq!(tokio::fs::read(&image.path).await.unwrap(), b"abcde");
    }

    #[tokio::test]
    async fn remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let image = store.save(Some("a.png"), b"x").await.unwrap();

        store.remove(&image.filename).await.unwrap();

        assert!(!store.exists(&image.filename).await);
    }

    #[tokio::test]
    async fn readiness_tracks_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("products"));
        assert!(!store.is_ready().await);

        store.ensure_dir().await.unwrap();
        assert!(store.is_ready().await);

        let file_store = ImageStore::new(store.save(None, b"x").await.unwrap().path);
        assert!(!file_store.is_ready().await, "a plain file is not a store");
    }

    #[tokio::test]
    async fn remove_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let err = store.remove("../etc/passwd").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
