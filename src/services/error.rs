// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain errors returned by the user and pet services.

use thiserror::Error;

use crate::auth::{AuthError, PasswordError};
use crate::storage::StorageError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Missing or malformed input the client can correct
    #[error("{0}")]
    Validation(String),
    /// A path ID that cannot name any document
    #[error("{0}")]
    InvalidId(String),
    #[error("{0}")]
    UserNotFound(String),
    #[error("{0}")]
    PetNotFound(String),
    /// Acting user does not own, or may not act on, the resource
    #[error("{0}")]
    Forbidden(String),
    /// Duplicate email or duplicate visit
    #[error("{0}")]
    Conflict(String),
    /// Wrong password on login
    #[error("{0}")]
    InvalidCredentials(String),
    /// Token verified but its user no longer exists
    #[error("{0}")]
    Unauthenticated(String),
    /// Persistence or hashing failure; the detail is for logs only
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::UnsupportedImage(_) => {
                ServiceError::Validation("Only png or jpg images are accepted!".to_string())
            }
            StorageError::PermissionDenied { .. } => ServiceError::Forbidden(
                "You do not have permission to change this pet!".to_string(),
            ),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(e: PasswordError) -> Self {
        ServiceError::Internal(e.to_string())
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InternalError(detail) => ServiceError::Internal(detail),
            other => ServiceError::Unauthenticated(other.to_string()),
        }
    }
}
