use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use hbnb_core::models::{NewAmenity, NewPlace, parse_id};
use hbnb_core::{AppError, AuthService, PlaceAmenityService, Registration, Storage};

use crate::auth::{AuthUser, require_token};
use crate::dto::{
    AmenityResponse, CreateAmenityRequest, CreatePlaceRequest, CreateUserRequest,
    DashboardResponse, EmptyResponse, LoginRequest, LoginResponse, PlaceResponse,
    StatusResponse, UserResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes and middleware.
pub fn router<S: Storage>(state: Arc<AppState<S>>) -> Router {
    let protected = Router::new()
        .route("/api/v1/dashboard", get(dashboard::<S>))
        .route("/api/v1/users", get(list_users::<S>))
        .route(
            "/api/v1/users/{user_id}",
            get(get_user::<S>).delete(delete_user::<S>),
        )
        .route(
            "/api/v1/amenities",
            get(list_amenities::<S>).post(create_amenity::<S>),
        )
        .route(
            "/api/v1/amenities/{amenity_id}",
            get(get_amenity::<S>).delete(delete_amenity::<S>),
        )
        .route(
            "/api/v1/places",
            get(list_places::<S>).post(create_place::<S>),
        )
        .route("/api/v1/places/{place_id}", get(get_place::<S>))
        .route(
            "/api/v1/places/{place_id}/amenities",
            get(list_place_amenities::<S>),
        )
        .route(
            "/api/v1/places/{place_id}/amenities/{amenity_id}",
            post(link_place_amenity::<S>).delete(unlink_place_amenity::<S>),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_token::<S>,
        ));

    let public = Router::new()
        .route("/api/v1/status", get(status::<S>))
        .route("/api/v1/login", post(login::<S>))
        .route("/api/v1/users", post(register::<S>))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(protected).with_state(state)
}

/// Map a path segment to an id.
///
/// Segments that are not UUIDs become the nil UUID, which is never assigned
/// to an entity, so they resolve as "not found" in the usual lookup order.
fn lookup_id(raw: &str) -> Uuid {
    parse_id(raw).unwrap_or(Uuid::nil())
}

// ---------------------------------------------------------------------------
// Place amenities
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/places/{place_id}/amenities",
    params(
        ("place_id" = String, Path, description = "Place ID")
    ),
    responses(
        (status = 200, description = "Amenities linked to the place", body = [AmenityResponse]),
        (status = 404, description = "Place not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "place_amenities"
)]
pub async fn list_place_amenities<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path(place_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let amenities = PlaceAmenityService::new(state.store.clone())
        .list(lookup_id(&place_id))
        .await?;

    Ok(Json(
        amenities
            .into_iter()
            .map(AmenityResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/places/{place_id}/amenities/{amenity_id}",
    params(
        ("place_id" = String, Path, description = "Place ID"),
        ("amenity_id" = String, Path, description = "Amenity ID"),
    ),
    responses(
        (status = 200, description = "Amenity was already linked", body = AmenityResponse),
        (status = 201, description = "Amenity linked", body = AmenityResponse),
        (status = 404, description = "Place or amenity not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "place_amenities"
)]
pub async fn link_place_amenity<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = PlaceAmenityService::new(state.store.clone())
        .link(lookup_id(&place_id), lookup_id(&amenity_id))
        .await?;

    let status = if outcome.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(AmenityResponse::from(outcome.into_amenity()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/places/{place_id}/amenities/{amenity_id}",
    params(
        ("place_id" = String, Path, description = "Place ID"),
        ("amenity_id" = String, Path, description = "Amenity ID"),
    ),
    responses(
        (status = 200, description = "Amenity unlinked", body = EmptyResponse),
        (status = 404, description = "Place or amenity not found, or not linked", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "place_amenities"
)]
pub async fn unlink_place_amenity<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    PlaceAmenityService::new(state.store.clone())
        .unlink(lookup_id(&place_id), lookup_id(&amenity_id))
        .await?;

    Ok((StatusCode::OK, Json(EmptyResponse {})))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = crate::dto::ErrorResponse),
        (status = 400, description = "Body is not valid JSON", body = crate::dto::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let auth = AuthService::new(state.store.clone(), state.tokens.clone());
    let access_token = auth
        .login(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(LoginResponse { access_token }))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Current user", body = DashboardResponse),
        (status = 404, description = "User no longer exists", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn dashboard<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = AuthService::new(state.store.clone(), state.tokens.clone());
    let current = auth.current_user(user.id).await?;

    Ok(Json(DashboardResponse {
        all: UserResponse::from(current),
    }))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input or email taken", body = crate::dto::ErrorResponse),
    ),
    tag = "users"
)]
pub async fn register<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let auth = AuthService::new(state.store.clone(), state.tokens.clone());
    let user = auth
        .register(Registration {
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_users<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.store.list_users().await?;
    Ok(Json(
        users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn get_user<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .get_user(lookup_id(&user_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {user_id}")))?;

    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = EmptyResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn delete_user<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.delete_user(lookup_id(&user_id)).await? {
        return Err(AppError::NotFound(format!("User not found: {user_id}")).into());
    }

    tracing::info!(%user_id, "User deleted");
    Ok(Json(EmptyResponse {}))
}

// ---------------------------------------------------------------------------
// Amenities
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/amenities",
    responses(
        (status = 200, description = "All amenities", body = [AmenityResponse]),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "amenities"
)]
pub async fn list_amenities<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let amenities = state.store.list_amenities().await?;
    Ok(Json(
        amenities
            .into_iter()
            .map(AmenityResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/amenities",
    request_body = CreateAmenityRequest,
    responses(
        (status = 201, description = "Amenity created", body = AmenityResponse),
        (status = 400, description = "Missing name", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "amenities"
)]
pub async fn create_amenity<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateAmenityRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let name = required(body.name, "name")?;

    let amenity = state.store.create_amenity(&NewAmenity { name }).await?;
    tracing::info!(amenity_id = %amenity.id, "Amenity created");

    Ok((StatusCode::CREATED, Json(AmenityResponse::from(amenity))))
}

#[utoipa::path(
    get,
    path = "/api/v1/amenities/{amenity_id}",
    params(
        ("amenity_id" = String, Path, description = "Amenity ID")
    ),
    responses(
        (status = 200, description = "Amenity", body = AmenityResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "amenities"
)]
pub async fn get_amenity<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path(amenity_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let amenity = state
        .store
        .get_amenity(lookup_id(&amenity_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Amenity not found: {amenity_id}")))?;

    Ok(Json(AmenityResponse::from(amenity)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/amenities/{amenity_id}",
    params(
        ("amenity_id" = String, Path, description = "Amenity ID")
    ),
    responses(
        (status = 200, description = "Amenity deleted", body = EmptyResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "amenities"
)]
pub async fn delete_amenity<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path(amenity_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.delete_amenity(lookup_id(&amenity_id)).await? {
        return Err(AppError::NotFound(format!("Amenity not found: {amenity_id}")).into());
    }

    tracing::info!(%amenity_id, "Amenity deleted");
    Ok(Json(EmptyResponse {}))
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/places",
    responses(
        (status = 200, description = "All places", body = [PlaceResponse]),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "places"
)]
pub async fn list_places<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let places = state.store.list_places().await?;
    Ok(Json(
        places
            .into_iter()
            .map(PlaceResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/places",
    request_body = CreatePlaceRequest,
    responses(
        (status = 201, description = "Place created, owned by the caller", body = PlaceResponse),
        (status = 400, description = "Missing name", body = crate::dto::ErrorResponse),
        (status = 404, description = "Caller's account no longer exists", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "places"
)]
pub async fn create_place<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreatePlaceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let new_place = NewPlace {
        user_id: user.id,
        name: required(body.name, "name")?,
        description: body.description,
        number_rooms: body.number_rooms.unwrap_or(0),
        number_bathrooms: body.number_bathrooms.unwrap_or(0),
        max_guest: body.max_guest.unwrap_or(0),
        price_by_night: body.price_by_night.unwrap_or(0),
        latitude: body.latitude,
        longitude: body.longitude,
    };

    let place = state.store.create_place(&new_place).await?;
    tracing::info!(place_id = %place.id, user_id = %user.id, "Place created");

    Ok((StatusCode::CREATED, Json(PlaceResponse::from(place))))
}

#[utoipa::path(
    get,
    path = "/api/v1/places/{place_id}",
    params(
        ("place_id" = String, Path, description = "Place ID")
    ),
    responses(
        (status = 200, description = "Place", body = PlaceResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "places"
)]
pub async fn get_place<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path(place_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let place = state
        .store
        .get_place(lookup_id(&place_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place not found: {place_id}")))?;

    Ok(Json(PlaceResponse::from(place)))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses(
        (status = 200, description = "Service is healthy", body = StatusResponse),
        (status = 503, description = "Storage is unreachable", body = StatusResponse),
    ),
    tag = "system"
)]
pub async fn status<S: Storage>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse {
                status: "OK",
                storage: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusResponse {
                    status: "unavailable",
                    storage: "error",
                }),
            )
        }
    }
}

/// A required, non-blank string field from a request body.
fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("Missing {field}"))),
    }
}
