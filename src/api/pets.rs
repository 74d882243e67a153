// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pet endpoints.
//!
//! Listing and lookup are public. Everything that changes a pet requires a
//! bearer token; changes other than scheduling a visit are owner-only.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};

use super::multipart::{read_pet_form, PetUploadForm};
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        CreatePetResponse, MessageResponse, PetEnvelope, PetListResponse, VisitScheduledResponse,
    },
    state::AppState,
};

/// List a new pet for adoption.
#[utoipa::path(
    post,
    path = "/pets/create",
    tag = "Pets",
    security(("bearer_auth" = [])),
    request_body(content = PetUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Pet listed", body = CreatePetResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Missing fields or bad images", body = MessageResponse)
    )
)]
pub async fn create_pet(
    Auth(user): Auth,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreatePetResponse>), ApiError> {
    let (form, images) = read_pet_form(multipart?).await?;
    let pet = state.pets().create(&user, form, images)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePetResponse {
            message: "Pet registered successfully!".to_string(),
            new_pet: pet,
        }),
    ))
}

/// Every pet, newest first.
#[utoipa::path(
    get,
    path = "/pets",
    tag = "Pets",
    responses(
        (status = 200, description = "All pets", body = PetListResponse)
    )
)]
pub async fn list_pets(State(state): State<AppState>) -> Result<Json<PetListResponse>, ApiError> {
    let pets = state.pets().list_all()?;
    Ok(Json(PetListResponse { pets }))
}

/// Pets listed by the caller.
#[utoipa::path(
    get,
    path = "/pets/mypets",
    tag = "Pets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's pets", body = PetListResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_pets(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<PetListResponse>, ApiError> {
    let pets = state.pets().list_owned_by(&user)?;
    Ok(Json(PetListResponse { pets }))
}

/// Pets the caller has scheduled a visit to.
#[utoipa::path(
    get,
    path = "/pets/myadoptions",
    tag = "Pets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's adoptions", body = PetListResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_adoptions(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<PetListResponse>, ApiError> {
    let pets = state.pets().list_adopted_by(&user)?;
    Ok(Json(PetListResponse { pets }))
}

#[utoipa::path(
    get,
    path = "/pets/{id}",
    tag = "Pets",
    params(
        ("id" = String, Path, description = "Pet ID")
    ),
    responses(
        (status = 200, description = "Pet details", body = PetEnvelope),
        (status = 404, description = "Pet not found", body = MessageResponse),
        (status = 422, description = "Invalid ID", body = MessageResponse)
    )
)]
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PetEnvelope>, ApiError> {
    let pet = state.pets().get_by_id(&id)?;
    Ok(Json(PetEnvelope { pet }))
}

#[utoipa::path(
    delete,
    path = "/pets/{id}",
    tag = "Pets",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Pet ID")
    ),
    responses(
        (status = 200, description = "Pet removed", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not your pet", body = MessageResponse),
        (status = 404, description = "Pet not found", body = MessageResponse),
        (status = 422, description = "Invalid ID", body = MessageResponse)
    )
)]
pub async fn delete_pet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.pets().delete_by_id(&user, &id)?;
    Ok(Json(MessageResponse::new("Pet removed successfully!")))
}

/// Replace a pet's details. New images replace the old ones.
#[utoipa::path(
    patch,
    path = "/pets/{id}",
    tag = "Pets",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Pet ID")
    ),
    request_body(content = PetUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Pet updated", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not your pet", body = MessageResponse),
        (status = 404, description = "Pet not found", body = MessageResponse),
        (status = 422, description = "Invalid ID, missing fields or bad images", body = MessageResponse)
    )
)]
pub async fn update_pet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (form, images) = read_pet_form(multipart?).await?;
    state.pets().update(&user, &id, form, images)?;
    Ok(Json(MessageResponse::new("Pet updated successfully!")))
}

/// Schedule a visit and receive the owner's contact details.
#[utoipa::path(
    patch,
    path = "/pets/schedule/{id}",
    tag = "Pets",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Pet ID")
    ),
    responses(
        (status = 200, description = "Visit scheduled", body = VisitScheduledResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - your own pet", body = MessageResponse),
        (status = 404, description = "Pet not found", body = MessageResponse),
        (status = 422, description = "Invalid ID or visit already scheduled", body = MessageResponse)
    )
)]
pub async fn schedule_visit(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VisitScheduledResponse>, ApiError> {
    let visit = state.pets().schedule_visit(&user, &id)?;

    Ok(Json(VisitScheduledResponse {
        message: format!(
            "The visit was scheduled successfully, contact {} on {}",
            visit.owner_name, visit.owner_phone
        ),
        owner_name: visit.owner_name,
        owner_phone: visit.owner_phone,
    }))
}

/// Mark the pet as adopted.
#[utoipa::path(
    patch,
    path = "/pets/conclude/{id}",
    tag = "Pets",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Pet ID")
    ),
    responses(
        (status = 200, description = "Adoption concluded", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not your pet", body = MessageResponse),
        (status = 404, description = "Pet not found", body = MessageResponse),
        (status = 422, description = "Invalid ID", body = MessageResponse)
    )
)]
pub async fn conclude_adoption(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.pets().conclude_adoption(&user, &id)?;
    Ok(Json(MessageResponse::new(
        "Congratulations! The adoption was concluded successfully!",
    )))
}
