// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the storage layout.

use std::path::{Path, PathBuf};

use crate::config::DEFAULT_DATA_DIR;

/// Storage path utilities for the document store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user documents.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user document.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Pet Paths ==========

    /// Directory containing all pet documents.
    pub fn pets_dir(&self) -> PathBuf {
        self.root.join("pets")
    }

    /// Path to a specific pet document.
    pub fn pet(&self, pet_id: &str) -> PathBuf {
        self.pets_dir().join(format!("{pet_id}.json"))
    }

    // ========== Image Paths ==========

    /// Directory served publicly under `/images`.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Directory holding profile pictures.
    pub fn user_images_dir(&self) -> PathBuf {
        self.images_dir().join("users")
    }

    /// Directory holding pet pictures.
    pub fn pet_images_dir(&self) -> PathBuf {
        self.images_dir().join("pets")
    }
}
