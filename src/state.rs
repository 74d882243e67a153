// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenCodec};
use crate::services::{PetService, UserService};
use crate::storage::DocumentStorage;

/// Shared handles built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<DocumentStorage>,
    pub tokens: Arc<TokenCodec>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(storage: DocumentStorage, tokens: TokenCodec) -> Self {
        Self {
            storage: Arc::new(storage),
            tokens: Arc::new(tokens),
            hasher: PasswordHasher::default(),
        }
    }

    /// Use a different bcrypt cost factor.
    pub fn with_password_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn storage(&self) -> &DocumentStorage {
        &self.storage
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(&self.storage, &self.tokens, self.hasher)
    }

    pub fn pets(&self) -> PetService<'_> {
        PetService::new(&self.storage)
    }
}
