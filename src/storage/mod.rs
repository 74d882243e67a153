// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage as JSON documents on the local filesystem.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   users/
//!     {user_id}.json
//!   pets/
//!     {pet_id}.json
//!   images/          # served at /images
//!     users/{file}
//!     pets/{file}
//! ```
//!
//! The storage handle is built once at startup, shared through
//! [`crate::state::AppState`], and never torn down explicitly.

pub mod document_store;
pub mod images;
pub mod ownership;
pub mod paths;
pub mod repository;

pub use document_store::{DocumentStorage, StorageError, StorageResult};
pub use images::{ImageKind, ImageRepository, ImageUpload};
pub use ownership::{OwnedResource, OwnershipEnforcer};
pub use paths::StoragePaths;
pub use repository::{
    AdopterSnapshot, OwnerSnapshot, PetRepository, StoredPet, StoredUser, UserProfile,
    UserRepository,
};
