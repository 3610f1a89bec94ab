//! Users Domain
//!
//! CRUD management of user records behind a HAL-style REST API, plus a small
//! set of unvalidated legacy endpoints.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, HAL links
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, email uniqueness, filter precedence
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + in-memory and PostgreSQL implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, DTOs, status enum, SeaORM entity
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//!
//! let router = axum::Router::new()
//!     .nest("/v1/users", handlers::router(service.clone()))
//!     .merge(handlers::legacy_router(service));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod links;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, LegacyApiDoc};
pub use links::{USERS_PATH, UserCollection, UserResource};
pub use models::{CreateUser, RegisterUser, UpdateUser, User, UserFilter, UserStatus};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
