use axum::Router;
use domain_users::{PgUserRepository, UserService, handlers};

use crate::state::AppState;

fn service(state: &AppState) -> UserService<PgUserRepository> {
    UserService::new(PgUserRepository::new(state.db.clone()))
}

pub fn router(state: &AppState) -> Router {
    handlers::router(service(state))
}

pub fn legacy_router(state: &AppState) -> Router {
    handlers::legacy_router(service(state))
}
