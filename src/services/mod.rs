// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Services
//!
//! Request validation and single-document reads/writes for users and pets.
//! Services are cheap borrowing views over [`crate::state::AppState`] and are
//! built per request through `AppState::users()` / `AppState::pets()`.

pub mod error;
pub mod pets;
pub mod users;

pub use error::{ServiceError, ServiceResult};
pub use pets::{PetService, VisitScheduled};
pub use users::{Session, UserService};

use crate::auth::AuthenticatedUser;
use crate::storage::{StorageError, StoredUser, UserRepository};

/// Load the record of the user a verified token belongs to.
pub(crate) fn acting_user(
    users: &UserRepository<'_>,
    auth: &AuthenticatedUser,
) -> ServiceResult<StoredUser> {
    users.get(&auth.user_id).map_err(|e| match e {
        StorageError::NotFound(_) => {
            tracing::warn!(user_id = %auth.user_id, "Token refers to an unknown user");
            ServiceError::Unauthenticated("Access denied!".to_string())
        }
        other => other.into(),
    })
}

/// The trimmed value of a form field, or `None` when absent or blank.
pub(crate) fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Like [`field`], but a missing value is a validation error with `message`.
pub(crate) fn required<'a>(value: &'a Option<String>, message: &str) -> ServiceResult<&'a str> {
    field(value).ok_or_else(|| ServiceError::Validation(message.to_string()))
}
