// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoding of `multipart/form-data` bodies into forms plus image uploads.
//!
//! Text parts fill the form fields by name; file parts under the expected
//! file field become [`ImageUpload`]s in the order received. Unknown parts are
//! ignored. A file input left empty by the browser (no file name, no bytes)
//! counts as no upload.

use std::collections::HashMap;

use axum::extract::{multipart::MultipartError, Multipart};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{EditProfileForm, PetForm};
use crate::storage::ImageUpload;

const PET_IMAGES_FIELD: &str = "images";
const USER_IMAGE_FIELD: &str = "image";

/// Text fields and file parts read from one multipart body.
#[derive(Debug, Default)]
struct Parts {
    fields: HashMap<String, String>,
    files: Vec<(String, ImageUpload)>,
}

impl Parts {
    fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    fn take_either(&mut self, name: &str, alias: &str) -> Option<String> {
        self.take(name).or_else(|| self.take(alias))
    }

    fn files_named(self, name: &str) -> Vec<ImageUpload> {
        self.files
            .into_iter()
            .filter(|(field, _)| field == name)
            .map(|(_, upload)| upload)
            .collect()
    }
}

fn rejection(e: MultipartError) -> ApiError {
    ApiError::new(e.status(), e.body_text())
}

async fn read_parts(mut multipart: Multipart) -> Result<Parts, ApiError> {
    let mut parts = Parts::default();

    while let Some(field) = multipart.next_field().await.map_err(rejection)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await.map_err(rejection)?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                parts.files.push((name, ImageUpload::new(file_name, bytes.to_vec())));
            }
            None => {
                let value = field.text().await.map_err(rejection)?;
                parts.fields.insert(name, value);
            }
        }
    }

    Ok(parts)
}

/// Read a pet form and its `images` file parts.
pub async fn read_pet_form(multipart: Multipart) -> Result<(PetForm, Vec<ImageUpload>), ApiError> {
    let mut parts = read_parts(multipart).await?;
    let form = PetForm {
        name: parts.take("name"),
        age: parts.take("age"),
        weight: parts.take("weight"),
        sex: parts.take("sex"),
        color: parts.take("color"),
    };
    Ok((form, parts.files_named(PET_IMAGES_FIELD)))
}

/// Read a profile form and its optional `image` file part.
///
/// Only the first `image` part is used.
pub async fn read_profile_form(
    multipart: Multipart,
) -> Result<(EditProfileForm, Option<ImageUpload>), ApiError> {
    let mut parts = read_parts(multipart).await?;
    let form = EditProfileForm {
        name: parts.take("name"),
        email: parts.take("email"),
        phone: parts.take("phone"),
        password: parts.take("password"),
        confirm_password: parts.take_either("confirm_password", "confirmPassword"),
    };
    Ok((form, parts.files_named(USER_IMAGE_FIELD).into_iter().next()))
}

/// Multipart body of pet create and update (OpenAPI only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct PetUploadForm {
    name: String,
    /// Whole years
    age: String,
    /// Kilograms
    weight: String,
    sex: String,
    color: String,
    /// One or more png/jpg/jpeg files; optional on update
    #[schema(value_type = Vec<String>, format = Binary)]
    images: Vec<Vec<u8>>,
}

/// Multipart body of a profile edit (OpenAPI only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ProfileUploadForm {
    name: String,
    email: String,
    phone: String,
    password: Option<String>,
    confirm_password: Option<String>,
    /// png/jpg/jpeg profile picture
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}
