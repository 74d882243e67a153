// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pet Adoption Server - REST backend for a pet-adoption marketplace
//!
//! Users register, list pets for adoption, browse listings, schedule visits
//! and conclude adoptions. Every record is a JSON document on local disk.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer tokens and password hashing
//! - `services` - Validation and business rules for users and pets
//! - `storage` - JSON document store and uploaded images

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
