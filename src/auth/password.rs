// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! bcrypt password hashing.
//!
//! Hashing is CPU-bound, so both operations run on tokio's blocking pool.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Salted one-way password hashing with a fixed cost factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash `plaintext` with a fresh random salt.
    pub async fn hash(&self, plaintext: String) -> Result<String, PasswordError> {
        let cost = self.cost;
        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(digest)
    }

    /// Check `plaintext` against a stored digest.
    pub async fn verify(&self, plaintext: String, digest: String) -> Result<bool, PasswordError> {
        let matches =
            tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest)).await??;
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(crate::config::MIN_BCRYPT_COST)
    }

    #[test]
    fn default_cost_is_twelve() {
        assert_eq!(PasswordHasher::default(), PasswordHasher::new(12));
    }

    #[tokio::test]
    async fn hash_verifies_and_never_equals_plaintext() {
        let hasher = fast_hasher();
        let digest = hasher.hash("s3cret".to_string()).await.unwrap();

        assert_ne!(digest, "s3cret");
        assert!(hasher.verify("s3cret".to_string(), digest.clone()).await.unwrap());
        assert!(!hasher.verify("wrong".to_string(), digest).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_different_salts() {
        let hasher = fast_hasher();
        let first = hasher.hash("s3cret".to_string()).await.unwrap();
        let second = hasher.hash("s3cret".to_string()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_digest_is_an_error() {
        let result = fast_hasher()
            .verify("s3cret".to_string(), "not-a-bcrypt-hash".to_string())
            .await;
        assert!(matches!(result, Err(PasswordError::Bcrypt(_))));
    }
}
