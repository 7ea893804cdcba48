//! Schema stand-ins for the OpenAPI document served at `/api-docs/openapi.json`.

use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub message: String,
}

/// Create/update body. `firstName`, `lastName` and `email` are required.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInputDoc {
    #[schema(example = "Juan")]
    pub first_name: String,
    #[schema(example = "Perez")]
    pub last_name: String,
    #[schema(example = "juan.perez@example.com")]
    pub email: String,
    #[schema(example = "ADMIN")]
    pub role: Option<String>,
    #[schema(example = "ACTIVE")]
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "1990-01-15")]
    pub birth_date: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Option<String>,
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub birth_date: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPageDoc {
    pub items: Vec<UserDoc>,
    pub total_items: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::create_user,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
        crate::routes::users::search_users,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            UserInputDoc,
            UserDoc,
            UserPageDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;
