// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Request fields are all
//! optional at the serde level so that missing fields reach the services and
//! produce a validation message instead of a deserialization rejection.
//! Multipart forms are decoded into the same structs by
//! [`crate::api::multipart`].
//!
//! ## Model Categories
//!
//! - **Users**: registration, login, profile edit, sessions
//! - **Pets**: listing form, listing envelopes, visit scheduling

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::storage::{StoredPet, UserProfile};

// =============================================================================
// User Models
// =============================================================================

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Digits only; a JSON number is accepted as well
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: Option<String>,
    /// Must equal `password`
    #[serde(alias = "confirmPassword")]
    pub confirm_password: Option<String>,
}

/// Request to log in with email and password.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile edit form (multipart, with an optional `image` file part).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EditProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// New password; applied only together with a matching confirmation
    pub password: Option<String>,
    #[serde(alias = "confirmPassword")]
    pub confirm_password: Option<String>,
}

/// Token issued on registration or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub user_id: String,
    pub user: UserProfile,
}

/// Envelope for a single user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserProfile,
}

// =============================================================================
// Pet Models
// =============================================================================

/// Pet listing form (multipart, with one or more `images` file parts).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PetForm {
    pub name: Option<String>,
    /// Age in whole years
    pub age: Option<String>,
    /// Weight in kilograms
    pub weight: Option<String>,
    pub sex: Option<String>,
    pub color: Option<String>,
}

/// Response after listing a new pet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePetResponse {
    pub message: String,
    pub new_pet: StoredPet,
}

/// Envelope for a single pet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PetEnvelope {
    pub pet: StoredPet,
}

/// Envelope for a pet listing, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PetListResponse {
    pub pets: Vec<StoredPet>,
}

/// Response after scheduling a visit, with the owner's contact details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitScheduledResponse {
    pub message: String,
    pub owner_name: String,
    pub owner_phone: String,
}

// =============================================================================
// Shared
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

/// Read an optional field that clients send either as a string or a number.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
