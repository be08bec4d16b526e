//! Avatar store writing uploads into a capability-scoped directory.
//!
//! Files are staged under a hidden name and renamed into place so a reader
//! never observes a partial image.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{AvatarStore, AvatarStoreError};
use crate::domain::{AvatarImage, UserId};

/// Stores avatars as `{user_id}-{random}.{ext}` files.
#[derive(Clone)]
pub struct FilesystemAvatarStore {
    dir: Arc<Dir>,
    public_path: String,
}

impl FilesystemAvatarStore {
    /// Open (creating if needed) `root` and serve files under `public_path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while creating or opening the directory.
    pub fn open(root: &Path, public_path: impl Into<String>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self::from_dir(dir, public_path))
    }

    /// Wrap an already opened directory.
    pub fn from_dir(dir: Dir, public_path: impl Into<String>) -> Self {
        let public_path = public_path.into().trim_end_matches('/').to_owned();
        Self {
            dir: Arc::new(dir),
            public_path,
        }
    }

    /// File name behind a reference this store issued; `None` for anything
    /// outside the upload directory.
    fn file_name_of<'a>(&self, reference: &'a str) -> Option<&'a str> {
        let name = reference
            .strip_prefix(self.public_path.as_str())?
            .strip_prefix('/')?;
        let plain = !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\']);
        plain.then_some(name)
    }
}

fn remove_if_present(dir: &Dir, file_name: &str) -> io::Result<()> {
    match dir.remove_file(file_name) {
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn write_atomically(dir: &Dir, file_name: &str, bytes: &[u8]) -> io::Result<()> {
    let staging = format!(".{file_name}.part");
    dir.write(&staging, bytes)?;
    if let Err(error) = dir.rename(&staging, dir, file_name) {
        let _cleanup = dir.remove_file(&staging);
        return Err(error);
    }
    Ok(())
}

#[async_trait]
impl AvatarStore for FilesystemAvatarStore {
    async fn store(&self, owner: &UserId, image: &AvatarImage) -> Result<String, AvatarStoreError> {
        let file_name = format!(
            "{owner}-{}.{}",
            Uuid::new_v4().simple(),
            image.format().extension()
        );
        let dir = Arc::clone(&self.dir);
        let bytes = image.bytes().to_vec();
        let name = file_name.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &name, &bytes))
            .await
            .map_err(|err| AvatarStoreError::unavailable(format!("avatar write aborted: {err}")))?
            .map_err(|err| AvatarStoreError::unavailable(err.to_string()))?;
        debug!(user_id = %owner, file = %file_name, "avatar stored");
        Ok(format!("{}/{file_name}", self.public_path))
    }

    async fn remove(&self, reference: &str) -> Result<(), AvatarStoreError> {
        let file_name = self
            .file_name_of(reference)
            .ok_or_else(|| AvatarStoreError::foreign_reference(reference))?
            .to_owned();
        let dir = Arc::clone(&self.dir);
        let name = file_name.clone();
        tokio::task::spawn_blocking(move || remove_if_present(&dir, &name))
            .await
            .map_err(|err| AvatarStoreError::unavailable(format!("avatar removal aborted: {err}")))?
            .map_err(|err| AvatarStoreError::unavailable(err.to_string()))?;
        info!(file = %file_name, "avatar removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[rstest]
    #[tokio::test]
    async fn stores_file_and_returns_public_reference() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FilesystemAvatarStore::open(temp.path(), "/uploads/").expect("open");
        let owner = UserId::random();
        let image = AvatarImage::new("image/png", PNG.to_vec()).expect("png");

        let reference = store.store(&owner, &image).await.expect("store");

        let prefix = format!("/uploads/{owner}-");
        assert!(reference.starts_with(&prefix), "{reference}");
        assert!(reference.ends_with(".png"));
        let file_name = reference.trim_start_matches("/uploads/");
        let written = std::fs::read(temp.path().join(file_name)).expect("read back");
        assert_eq!(written, PNG);
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_uploads_never_overwrite() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FilesystemAvatarStore::open(temp.path(), "/uploads").expect("open");
        let owner = UserId::random();
        let image = AvatarImage::new("image/png", PNG.to_vec()).expect("png");

        let first = store.store(&owner, &image).await.expect("store");
        let second = store.store(&owner, &image).await.expect("store");

        assert_ne!(first, second);
        let entries = std::fs::read_dir(temp.path()).expect("list").count();
        assert_eq!(entries, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_deletes_stored_blob_and_tolerates_repeats() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FilesystemAvatarStore::open(temp.path(), "/uploads").expect("open");
        let image = AvatarImage::new("image/png", PNG.to_vec()).expect("png");
        let reference = store.store(&UserId::random(), &image).await.expect("store");

        store.remove(&reference).await.expect("first removal");
        store.remove(&reference).await.expect("already gone");

        let entries = std::fs::read_dir(temp.path()).expect("list").count();
        assert_eq!(entries, 0);
    }

    #[rstest]
    #[case("https://cdn.example.com/a.png")]
    #[case("/uploads/")]
    #[case("/uploads/../secrets.txt")]
    #[case("/uploads/.a.png.part")]
    #[case("/uploadsx/a.png")]
    #[tokio::test]
    async fn remove_refuses_references_outside_the_directory(#[case] reference: &str) {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FilesystemAvatarStore::open(temp.path(), "/uploads").expect("open");

        let error = store.remove(reference).await.expect_err("foreign");

        assert!(matches!(error, AvatarStoreError::ForeignReference { .. }));
        assert!(!error.is_transient());
    }
}
