// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use tempfile::TempDir;

use crate::auth::{AuthenticatedUser, PasswordHasher, TokenCodec};
use crate::models::{PetForm, RegisterRequest};
use crate::state::AppState;
use crate::storage::{DocumentStorage, ImageUpload, StoragePaths};

pub const TEST_SECRET: &[u8] = b"test-secret-with-enough-length";
pub const TEST_PASSWORD: &str = "s3cret-pass";
pub const TEST_PHONE: &str = "5511999990000";

/// A registered user and the token issued to them.
pub struct TestUser {
    pub user_id: String,
    pub token: String,
    pub auth: AuthenticatedUser,
}

/// Initialized state over a fresh temp directory, with a fast hasher.
pub fn test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut storage = DocumentStorage::new(StoragePaths::new(temp_dir.path()));
    storage.initialize().expect("Failed to initialize");

    let state = AppState::new(storage, TokenCodec::new(TEST_SECRET))
        .with_password_hasher(PasswordHasher::new(crate::config::MIN_BCRYPT_COST));
    (state, temp_dir)
}

pub fn register_request(name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        password: Some(TEST_PASSWORD.to_string()),
        phone: Some(TEST_PHONE.to_string()),
        confirm_password: Some(TEST_PASSWORD.to_string()),
    }
}

pub async fn register(state: &AppState, name: &str, email: &str) -> TestUser {
    let session = state
        .users()
        .register(register_request(name, email))
        .await
        .expect("registration failed");
    let auth = state.tokens.verify(&session.token).expect("token invalid");

    TestUser {
        user_id: session.user.id,
        token: session.token,
        auth,
    }
}

pub fn pet_form(name: &str) -> PetForm {
    PetForm {
        name: Some(name.to_string()),
        age: Some("3".to_string()),
        weight: Some("7.5".to_string()),
        sex: Some("female".to_string()),
        color: Some("caramel".to_string()),
    }
}

pub fn png(file_name: &str) -> ImageUpload {
    ImageUpload::new(file_name, b"\x89PNG".to_vec())
}
