use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HBnB API",
        version = "0.1.0",
        description = "Places, amenities and users for a short-term rental listing service."
    ),
    paths(
        crate::routes::login,
        crate::routes::dashboard,
        crate::routes::register,
        crate::routes::list_users,
        crate::routes::get_user,
        crate::routes::delete_user,
        crate::routes::list_amenities,
        crate::routes::create_amenity,
        crate::routes::get_amenity,
        crate::routes::delete_amenity,
        crate::routes::list_places,
        crate::routes::create_place,
        crate::routes::get_place,
        crate::routes::list_place_amenities,
        crate::routes::link_place_amenity,
        crate::routes::unlink_place_amenity,
        crate::routes::status,
    ),
    components(schemas(
        crate::dto::LoginRequest,
        crate::dto::LoginResponse,
        crate::dto::DashboardResponse,
        crate::dto::CreateUserRequest,
        crate::dto::UserResponse,
        crate::dto::CreateAmenityRequest,
        crate::dto::AmenityResponse,
        crate::dto::CreatePlaceRequest,
        crate::dto::PlaceResponse,
        crate::dto::StatusResponse,
        crate::dto::EmptyResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "auth", description = "Login and current user"),
        (name = "users", description = "User accounts"),
        (name = "amenities", description = "Amenity catalogue"),
        (name = "places", description = "Rental places"),
        (name = "place_amenities", description = "Links between places and amenities"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by protected paths.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token returned by POST /api/v1/login."))
                        .build(),
                ),
            );
        }
    }
}
