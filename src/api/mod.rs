// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::authenticate, VerifiedIdentity},
    context::RequestContext,
    error::ApiError,
    middleware::{cors, request_id},
    models::{CreateUserRequest, DemoIdentity, User},
    state::AppState,
};

pub mod health;
pub mod profile;
pub mod users;

/// Build the full HTTP surface.
///
/// Layer order, outermost first: request id, trace span, CORS, routing.
/// Only `/api/v1/profile` sits behind the authenticator.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/profile", get(profile::profile))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let v1_routes = Router::new()
        .route("/me", get(profile::me))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user).delete(users::delete_user),
        )
        .merge(protected);

    Router::new()
        .route("/healthz", get(health::healthz))
        .nest("/api/v1", v1_routes)
        .fallback(|| async { ApiError::not_found() })
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(from_fn(cors))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .extensions()
                .get::<RequestContext>()
                .map(|context| context.request_id.as_str())
                .unwrap_or("n/a");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id,
            )
        }))
        .layer(from_fn(request_id))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        profile::me,
        profile::profile,
        users::create_user,
        users::list_users,
        users::get_user,
        users::delete_user
    ),
    components(
        schemas(
            User,
            CreateUserRequest,
            DemoIdentity,
            VerifiedIdentity,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Identity", description = "Caller identity"),
        (name = "Users", description = "User directory")
    )
)]
struct ApiDoc;
