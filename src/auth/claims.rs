// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use serde::{Deserialize, Serialize};

/// Claims carried by an issued bearer token.
///
/// Tokens carry no `exp`: they stay valid for as long as the signing secret
/// does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// User ID the token was issued to
    pub id: String,
    /// Display name at issue time (informational only)
    #[serde(default)]
    pub name: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

/// Identity proven by a verified bearer token.
///
/// Only the user ID is trusted; services load the current user record from
/// storage before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub issued_at: i64,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            issued_at: 0,
        }
    }
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.id,
            issued_at: claims.iat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_extracts_user_id() {
        let user = AuthenticatedUser::from(TokenClaims {
            id: "user_123".to_string(),
            name: "Ana".to_string(),
            iat: 1_700_000_000,
        });
        assert_eq!(user.user_id, "user_123");
        assert_eq!(user.issued_at, 1_700_000_000);
    }

    #[test]
    fn claims_tolerate_missing_optional_fields() {
        let claims: TokenClaims = serde_json::from_str(r#"{"id":"u1"}"#).unwrap();
        assert_eq!(claims.id, "u1");
        assert!(claims.name.is_empty());
        assert_eq!(claims.iat, 0);
    }
}
