use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use service::pagination::{Page, PageRequest, SortOrder};
use service::user::domain::{UserInput, UserResponse, UserSearchCriteria};
use service::user::errors::UserError;
use service::user::repository::UserRepository;
use service::user::UserService;

use crate::errors::ApiError;
use crate::extract::{AppJson, AppPath, AppQuery};

#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserService<dyn UserRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { users: Arc::new(UserService::new(repo)) }
    }
}

/// Search filters plus paging, as sent on the query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Substring of first or last name
    pub name: Option<String>,
    /// Substring of email
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`
    pub birth_date_from: Option<NaiveDate>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    pub birth_date_to: Option<NaiveDate>,
    /// Zero-based page index
    pub page: Option<u64>,
    /// Page size, 1..=100
    pub size: Option<u64>,
    /// `field[,asc|desc]`; repeat the parameter (or separate with `;`) for several orders
    #[serde(default)]
    pub sort: Vec<String>,
}

impl SearchParams {
    fn split(self) -> Result<(UserSearchCriteria, PageRequest), UserError> {
        let sort = SortOrder::parse_all(self.sort.as_slice())?;
        let criteria = UserSearchCriteria {
            name: self.name,
            email: self.email,
            role: self.role,
            status: self.status,
            birth_date_from: self.birth_date_from,
            birth_date_to: self.birth_date_to,
        };
        Ok((criteria, PageRequest::new(self.page, self.size).with_sort(sort)))
    }
}

#[utoipa::path(post, path = "/users", tag = "users", request_body = crate::openapi::UserInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserDoc),
        (status = 400, description = "Invalid input", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Email already in use", body = crate::openapi::ErrorDoc)
    ))]
pub async fn create_user(
    State(state): State<ServerState>,
    AppJson(input): AppJson<UserInput>,
) -> Result<(StatusCode, AppJson<UserResponse>), ApiError> {
    let created = state.users.create(input).await?;
    Ok((StatusCode::CREATED, AppJson(created)))
}

#[utoipa::path(get, path = "/users/{id}", tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::UserDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn get_user(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
) -> Result<AppJson<UserResponse>, ApiError> {
    Ok(AppJson(state.users.get_by_id(id).await?))
}

#[utoipa::path(put, path = "/users/{id}", tag = "users", request_body = crate::openapi::UserInputDoc,
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 400, description = "Invalid input", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Email already in use", body = crate::openapi::ErrorDoc)
    ))]
pub async fn update_user(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<UserInput>,
) -> Result<AppJson<UserResponse>, ApiError> {
    Ok(AppJson(state.users.update(id, input).await?))
}

#[utoipa::path(delete, path = "/users/{id}", tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    ))]
pub async fn delete_user(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/users", tag = "users", params(SearchParams),
    responses(
        (status = 200, description = "One page of matching users", body = crate::openapi::UserPageDoc),
        (status = 400, description = "Malformed query or sort", body = crate::openapi::ErrorDoc)
    ))]
pub async fn search_users(
    State(state): State<ServerState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<AppJson<Page<UserResponse>>, ApiError> {
    let (criteria, page) = params.split()?;
    Ok(AppJson(state.users.search(&criteria, &page).await?))
}
