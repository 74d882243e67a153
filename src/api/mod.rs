// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        CreatePetResponse, LoginRequest, MessageResponse, PetEnvelope, PetListResponse,
        RegisterRequest, SessionResponse, UserEnvelope, VisitScheduledResponse,
    },
    state::AppState,
    storage::{AdopterSnapshot, OwnerSnapshot, StoredPet, UserProfile},
};

pub mod health;
pub mod multipart;
pub mod pets;
pub mod users;

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let images_dir = state.storage().paths().images_dir();

    let api_routes = Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/checkuser", get(users::check_user))
        .route("/users/edit/{id}", patch(users::edit_user))
        .route("/users/{id}", get(users::get_user))
        .route("/pets", get(pets::list_pets))
        .route("/pets/create", post(pets::create_pet))
        .route("/pets/mypets", get(pets::my_pets))
        .route("/pets/myadoptions", get(pets::my_adoptions))
        .route("/pets/schedule/{id}", patch(pets::schedule_visit))
        .route("/pets/conclude/{id}", patch(pets::conclude_adoption))
        .route(
            "/pets/{id}",
            get(pets::get_pet)
                .delete(pets::delete_pet)
                .patch(pets::update_pet),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .nest_service("/images", ServeDir::new(images_dir))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            let request_id = req
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("n/a");
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri().path(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the bearer token scheme referenced by `security(("bearer_auth" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        users::register,
        users::login,
        users::check_user,
        users::get_user,
        users::edit_user,
        pets::create_pet,
        pets::list_pets,
        pets::my_pets,
        pets::my_adoptions,
        pets::get_pet,
        pets::delete_pet,
        pets::update_pet,
        pets::schedule_visit,
        pets::conclude_adoption,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            SessionResponse,
            UserEnvelope,
            UserProfile,
            StoredPet,
            OwnerSnapshot,
            AdopterSnapshot,
            CreatePetResponse,
            PetEnvelope,
            PetListResponse,
            VisitScheduledResponse,
            MessageResponse,
            multipart::PetUploadForm,
            multipart::ProfileUploadForm,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Users", description = "Registration, login and profiles"),
        (name = "Pets", description = "Pet listings, visits and adoptions"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
