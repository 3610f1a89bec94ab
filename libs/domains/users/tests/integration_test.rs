//! Integration tests for Users domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - The migration creates a table the entity can read and write
//! - The unique email index is enforced
//! - Name search is case-insensitive and treats wildcards literally

use database::PageRequest;
use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_user(name: String, email: String, status: UserStatus) -> User {
    User {
        id: None,
        name,
        email,
        phone_number: None,
        status,
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_find_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("save_and_find");

    let mut user = new_user(
        builder.name("user", "main"),
        builder.email("main"),
        UserStatus::Inactive,
    );
    user.phone_number = Some(builder.phone_number());

    let created = repo.save(user.clone()).await.unwrap();
    let id = assert_some(created.id, "saved user should have an id");

    let retrieved = assert_some(repo.find_by_id(id).await.unwrap(), "user should exist");
    assert_eq!(retrieved, User { id: Some(id), ..user });
}

#[tokio::test]
async fn test_duplicate_email_constraint() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("duplicate_email");
    let email = builder.email("dup");

    repo.save(new_user(builder.name("user", "a"), email.clone(), UserStatus::Active))
        .await
        .unwrap();
    let result = repo
        .save(new_user(builder.name("user", "b"), email.clone(), UserStatus::Active))
        .await;

    assert!(matches!(result, Err(UserError::DuplicateEmail(e)) if e == email));
    assert!(repo.exists_by_email(&email).await.unwrap());
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_unknown");

    let mut ghost = new_user(builder.name("user", "ghost"), builder.email("ghost"), UserStatus::Active);
    ghost.id = Some(9_999);

    assert!(matches!(repo.save(ghost).await, Err(UserError::NotFound(9_999))));
}

#[tokio::test]
async fn test_name_search_and_status_filter() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("search");

    for (name, local, status) in [
        ("John Smith", "john", UserStatus::Active),
        ("JOHNNY Cash", "johnny", UserStatus::Inactive),
        ("Jane 100%", "jane", UserStatus::Active),
    ] {
        repo.save(new_user(name.to_string(), builder.email(local), status))
            .await
            .unwrap();
    }

    let page = repo
        .find_by_name_containing_ignore_case("john", PageRequest::default())
        .await
        .unwrap();
    let names: Vec<_> = page.content.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["John Smith", "JOHNNY Cash"]);

    let page = repo
        .find_by_name_containing_ignore_case("0%", PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);

    let page = repo
        .find_by_name_containing_ignore_case("%", PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);

    let page = repo
        .find_by_status(UserStatus::Active, PageRequest::new(0, 1))
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn test_delete_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("delete");

    let created = repo
        .save(new_user(builder.name("user", "gone"), builder.email("gone"), UserStatus::Active))
        .await
        .unwrap();

    assert!(repo.delete(&created).await.unwrap());
    assert!(!repo.delete(&created).await.unwrap());

    let id = assert_some(created.id, "saved user should have an id");
    assert_none(repo.find_by_id(id).await.unwrap(), "deleted user");
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
async fn test_service_partial_update_and_listing() {
    let db = TestDatabase::new().await;
    let service = UserService::new(PgUserRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("service_update");

    let created = service
        .create_user(CreateUser {
            name: builder.name("user", "svc"),
            email: builder.email("svc"),
            phone_number: Some(builder.phone_number()),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(created.status, UserStatus::Active);
    let id = assert_some(created.id, "created user should have an id");

    let updated = service
        .update_user(
            id,
            UpdateUser {
                status: Some(UserStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.phone_number, created.phone_number);
    assert_eq!(updated.status, UserStatus::Suspended);

    let page = service
        .list_users(UserFilter {
            status: Some(UserStatus::Suspended),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.content, vec![updated]);

    assert_eq!(service.all_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_truncate_resets_ids() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("truncate");

    repo.save(new_user(builder.name("user", "a"), builder.email("a"), UserStatus::Active))
        .await
        .unwrap();
    db.truncate("users").await;

    let created = repo
        .save(new_user(builder.name("user", "b"), builder.email("b"), UserStatus::Active))
        .await
        .unwrap();
    assert_eq!(created.id, Some(1));
}
