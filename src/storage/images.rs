// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Uploaded image persistence.
//!
//! Images live under `images/users` and `images/pets` and are referenced from
//! documents by filename only. The directory is served statically at
//! `/images`.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{DocumentStorage, StorageError, StorageResult};

const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Which image collection an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    User,
    Pet,
}

/// An image received from a client, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Client-side file name, used only to derive the extension.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lowercased extension if it is one of png/jpg/jpeg.
    pub fn extension(&self) -> StorageResult<String> {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| StorageError::UnsupportedImage(self.file_name.clone()))?;

        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(StorageError::UnsupportedImage(self.file_name.clone()))
        }
    }
}

/// Repository for image files.
pub struct ImageRepository<'a> {
    storage: &'a DocumentStorage,
}

impl<'a> ImageRepository<'a> {
    pub fn new(storage: &'a DocumentStorage) -> Self {
        Self { storage }
    }

    fn dir(&self, kind: ImageKind) -> PathBuf {
        match kind {
            ImageKind::User => self.storage.paths().user_images_dir(),
            ImageKind::Pet => self.storage.paths().pet_images_dir(),
        }
    }

    /// Path of a stored image.
    pub fn path(&self, kind: ImageKind, file_name: &str) -> PathBuf {
        self.dir(kind).join(file_name)
    }

    /// Check every upload has an accepted extension without writing anything.
    pub fn validate(uploads: &[ImageUpload]) -> StorageResult<()> {
        uploads.iter().try_for_each(|upload| upload.extension().map(drop))
    }

    /// Persist one upload and return its stored file name.
    pub fn save(&self, kind: ImageKind, upload: &ImageUpload) -> StorageResult<String> {
        let ext = upload.extension()?;
        let file_name = format!(
            "{}-{}.{ext}",
            Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple()
        );
        self.storage.write_raw(self.path(kind, &file_name), &upload.bytes)?;
        Ok(file_name)
    }

    /// Persist uploads in order, returning their stored file names.
    ///
    /// On failure the files already written by this call are removed again.
    pub fn save_all(&self, kind: ImageKind, uploads: &[ImageUpload]) -> StorageResult<Vec<String>> {
        let mut saved = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.save(kind, upload) {
                Ok(file_name) => saved.push(file_name),
                Err(e) => {
                    self.remove_all(kind, &saved);
                    return Err(e);
                }
            }
        }
        Ok(saved)
    }

    /// Remove stored images. Files that cannot be removed are logged and skipped.
    pub fn remove_all(&self, kind: ImageKind, file_names: &[String]) {
        for file_name in file_names {
            // Only bare file names inside the collection directory.
            let is_bare = Path::new(file_name).file_name().and_then(|n| n.to_str())
                == Some(file_name.as_str());
            if !is_bare {
                tracing::warn!(file = %file_name, "Refusing to remove image outside its directory");
                continue;
            }
            if let Err(e) = self.storage.delete(self.path(kind, file_name)) {
                tracing::warn!(file = %file_name, error = %e, "Failed to remove image");
            }
        }
    }
}
