use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    IdPath, QueryParams, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestQueryResponse, BadRequestValidationResponse,
        InternalServerErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::links::{
    EmbeddedUsers, Link, PageMetadata, UserCollection, UserResource, user_href,
};
use crate::models::{CreateUser, RegisterUser, UpdateUser, User, UserFilter, UserStatus};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";
pub const LEGACY_TAG: &str = "users-legacy";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(
        schemas(
            User,
            UserStatus,
            CreateUser,
            UpdateUser,
            UserResource,
            UserCollection,
            EmbeddedUsers,
            PageMetadata,
            Link
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestIdResponse,
            BadRequestQueryResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the plain, unvalidated user endpoints
#[derive(OpenApi)]
#[openapi(
    paths(register_user, all_users, find_user, remove_user),
    components(schemas(User, UserStatus)),
    tags(
        (name = LEGACY_TAG, description = "Unvalidated user endpoints without hypermedia")
    )
)]
pub struct LegacyApiDoc;

/// Create the users router, to be nested at `/v1/users`
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(shared_service)
}

/// Create the legacy router, to be merged at the API root
pub fn legacy_router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/user", post(register_user))
        .route("/users", get(all_users))
        .route("/user/{id}", get(find_user).delete(remove_user))
        .with_state(shared_service)
}

/// List users, optionally filtered by name or status
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(UserFilter),
    responses(
        (status = 200, description = "Page of users", body = UserCollection),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    QueryParams(filter): QueryParams<UserFilter>,
) -> UserResult<Json<UserCollection>> {
    let page = service.list_users(filter.clone()).await?;
    Ok(Json(UserCollection::from_page(page, &filter)))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResource,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, description = "Email already in use"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    let location = user.id.map(user_href).unwrap_or_default();

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResource::detail(user)),
    ))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResource),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, description = "User not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<Json<UserResource>> {
    let user = service.get_user(id).await?;
    Ok(Json(UserResource::detail(user)))
}

/// Update the fields present in the body
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResource),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResource>> {
    let user = service.update_user(id, input).await?;
    Ok(Json(UserResource::updated(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, description = "User not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<impl IntoResponse> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Store a user from query parameters, without field validation
#[utoipa::path(
    post,
    path = "/user",
    tag = LEGACY_TAG,
    params(RegisterUser),
    responses(
        (status = 200, description = "User stored", body = User),
        (status = 409, description = "Email already in use"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    QueryParams(input): QueryParams<RegisterUser>,
) -> UserResult<Json<User>> {
    let user = service.register_user(input).await?;
    Ok(Json(user))
}

/// Every user, ordered by id
#[utoipa::path(
    get,
    path = "/users",
    tag = LEGACY_TAG,
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn all_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<User>>> {
    let users = service.all_users().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = LEGACY_TAG,
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn find_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<Json<User>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Delete a user; missing ids are not an error
#[utoipa::path(
    delete,
    path = "/user/{id}",
    tag = LEGACY_TAG,
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User removed or already absent"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<StatusCode> {
    service.remove_user(id).await?;
    Ok(StatusCode::OK)
}
