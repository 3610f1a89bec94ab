use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "User Management API",
        version = "1.0",
        description = "REST API for User Management",
        license(name = "Apache 2.0", url = "https://www.apache.org/licenses/LICENSE-2.0")
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1/users", api = domain_users::ApiDoc)
    ),
    modifiers(&LegacyPaths)
)]
pub struct ApiDoc;

/// Adds the legacy routes, which live directly under the API root.
struct LegacyPaths;

impl Modify for LegacyPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_users::LegacyApiDoc::openapi());
    }
}
