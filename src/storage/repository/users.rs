// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Each user is stored as `users/{user_id}.json`. The stored record carries
//! the bcrypt digest; API responses use [`UserProfile`], which never does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{DocumentStorage, StorageError, StorageResult};
use super::{is_document_id, sort_newest_first, Timestamped};

/// User record stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    pub name: String,
    /// Unique across all users
    pub email: String,
    pub phone: String,
    /// bcrypt digest of the password
    pub password_hash: String,
    /// Profile picture file name under `images/users`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, returned to API clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredUser> for UserProfile {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            image: user.image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl Timestamped for StoredUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Repository for user documents.
pub struct UserRepository<'a> {
    storage: &'a DocumentStorage,
}

impl<'a> UserRepository<'a> {
    pub fn new(storage: &'a DocumentStorage) -> Self {
        Self { storage }
    }

    pub fn exists(&self, user_id: &str) -> bool {
        is_document_id(user_id) && self.storage.exists(self.storage.paths().user(user_id))
    }

    /// Get a user by ID. Malformed IDs are reported as not found.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(self.storage.paths().user(user_id))
    }

    /// Find the user registered with `email`, if any.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .list_unordered()?
            .into_iter()
            .find(|user| user.email == email))
    }

    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if !is_document_id(&user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        if self.exists(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        self.storage.write_json(self.storage.paths().user(&user.id), user)
    }

    /// Replace an existing user document.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        self.storage.write_json(self.storage.paths().user(&user.id), user)
    }

    /// All users, newest first.
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let mut users = self.list_unordered()?;
        sort_newest_first(&mut users);
        Ok(users)
    }

    fn list_unordered(&self) -> StorageResult<Vec<StoredUser>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(&id) {
                Ok(user) => users.push(user),
                Err(e) => tracing::warn!(user_id = %id, error = %e, "Skipping unreadable user document"),
            }
        }
        Ok(users)
    }
}
