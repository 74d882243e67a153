// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and password hashing.
//!
//! ## Auth Flow
//!
//! 1. A user registers or logs in and receives a token signed with the
//!    shared secret (`JWT_SECRET`).
//! 2. The client sends `Authorization: Bearer <token>`.
//! 3. The `Auth` extractor verifies the signature and yields the user ID;
//!    services then load the user record before any owner-scoped change.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use password::{PasswordError, PasswordHasher};
pub use token::TokenCodec;
