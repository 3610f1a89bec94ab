use regex::Regex;
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use database::pagination::DEFAULT_PAGE_SIZE;

/// E.164-style phone number with an optional leading `+`
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("phone number pattern is valid"));

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    if !PHONE_NUMBER.is_match(value) {
        return Err(
            ValidationError::new("phone_number").with_message("Invalid phone number format".into())
        );
    }
    Ok(())
}

/// Account state of a user
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
    #[sea_orm(string_value = "SUSPENDED")]
    Suspended,
}

/// A user record as exchanged over the API.
///
/// `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    /// Optional phone number in international format
    pub phone_number: Option<String>,
    pub status: UserStatus,
}

/// Payload for creating a user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(
        custom(function = "validate_not_blank"),
        length(min = 2, max = 50, message = "Name must be between 2 and 50 characters")
    )]
    #[schema(example = "Jane Doe", min_length = 2, max_length = 50)]
    pub name: String,

    #[validate(
        custom(function = "validate_not_blank"),
        email(message = "Email should be valid")
    )]
    #[schema(example = "jane.doe@example.com")]
    pub email: String,

    #[validate(custom(function = "validate_phone_number"))]
    #[schema(example = "+14155550100")]
    pub phone_number: Option<String>,

    /// Defaults to `ACTIVE`
    pub status: Option<UserStatus>,
}

/// Partial update; absent or null fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(
        custom(function = "validate_not_blank"),
        length(min = 2, max = 50, message = "Name must be between 2 and 50 characters")
    )]
    pub name: Option<String>,

    #[validate(
        custom(function = "validate_not_blank"),
        email(message = "Email should be valid")
    )]
    pub email: Option<String>,

    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,

    pub status: Option<UserStatus>,
}

/// Query parameters for listing users.
///
/// `name` takes precedence over `status` when both are given.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Case-insensitive substring of the user's name
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<UserStatus>,
    /// Zero-based page index
    #[serde(default, deserialize_with = "page_or_default")]
    pub page: u64,
    /// Page size; 0 selects the default, values above 2000 are capped
    #[serde(default = "default_page_size", deserialize_with = "size_or_default")]
    pub size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// `?status=` reads as if the parameter were absent
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.is_empty() => value.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

fn page_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(empty_as_none(deserializer)?.unwrap_or_default())
}

fn size_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(empty_as_none(deserializer)?.unwrap_or_else(default_page_size))
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            name: None,
            status: None,
            page: 0,
            size: default_page_size(),
        }
    }
}

/// Query parameters of the legacy `POST /api/user`
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
}

impl User {
    /// Unsaved user from a create payload
    pub fn new(input: CreateUser) -> Self {
        Self {
            id: None,
            name: input.name,
            email: input.email,
            phone_number: input.phone_number,
            status: input.status.unwrap_or_default(),
        }
    }

    /// Overwrite the fields present in `update`
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone_number) = update.phone_number {
            self.phone_number = Some(phone_number);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

impl From<RegisterUser> for User {
    fn from(input: RegisterUser) -> Self {
        Self {
            id: None,
            name: input.name,
            email: input.email,
            phone_number: None,
            status: UserStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, email: &str, phone: Option<&str>) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            phone_number: phone.map(str::to_string),
            status: None,
        }
    }

    #[test]
    fn test_status_wire_format_is_uppercase() {
        assert_eq!(
            serde_json::to_string(&UserStatus::Suspended).unwrap(),
            "\"SUSPENDED\""
        );
        assert_eq!(UserStatus::from_str("INACTIVE").unwrap(), UserStatus::Inactive);
        assert_eq!(UserStatus::Active.to_string(), "ACTIVE");
        assert!(serde_json::from_str::<UserStatus>("\"active\"").is_err());
    }

    #[test]
    fn test_valid_create_payload() {
        assert!(create("Jane Doe", "jane@example.com", Some("+14155550100")).validate().is_ok());
        assert!(create("Jo", "jo@example.com", None).validate().is_ok());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let errors = create("", "jane@example.com", None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let errors = create("   ", "jane@example.com", None).validate().unwrap_err();
        let name_errors = &errors.field_errors()["name"];
        assert!(name_errors.iter().any(|e| e.code == "blank"));
    }

    #[test]
    fn test_name_length_bounds() {
        assert!(create("J", "j@example.com", None).validate().is_err());
        assert!(create(&"a".repeat(50), "j@example.com", None).validate().is_ok());
        assert!(create(&"a".repeat(51), "j@example.com", None).validate().is_err());
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let errors = create("Jane", "not-an-email", None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_phone_number_pattern() {
        for ok in ["+14155550100", "14155550100", "+12"] {
            assert!(create("Jane", "j@example.com", Some(ok)).validate().is_ok(), "{ok}");
        }
        for bad in ["+0123", "abc", "+1", "+1234567890123456", "555-0100"] {
            let errors = create("Jane", "j@example.com", Some(bad)).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("phone_number"), "{bad}");
        }
    }

    #[test]
    fn test_update_rules_apply_only_to_present_fields() {
        assert!(UpdateUser::default().validate().is_ok());

        let update = UpdateUser {
            name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_new_user_defaults_to_active() {
        let user = User::new(create("Jane", "jane@example.com", None));
        assert_eq!(user.id, None);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn test_apply_update_is_partial() {
        let mut user = User {
            id: Some(1),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: Some("+14155550100".to_string()),
            status: UserStatus::Inactive,
        };

        user.apply_update(UpdateUser {
            name: Some("Janet".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name, "Janet");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.phone_number.as_deref(), Some("+14155550100"));
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn test_user_json_is_camel_case() {
        let user = User {
            id: Some(7),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: None,
            status: UserStatus::Active,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert!(json.get("phoneNumber").is_some());
        assert_eq!(json["status"], "ACTIVE");
    }

    #[test]
    fn test_filter_defaults() {
        let filter: UserFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.page, 0);
        assert_eq!(filter.size, DEFAULT_PAGE_SIZE);
        assert!(filter.name.is_none());
    }

    #[test]
    fn test_filter_empty_values_fall_back_to_defaults() {
        let filter: UserFilter =
            serde_json::from_str(r#"{"status": "", "page": "", "size": ""}"#).unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.page, 0);
        assert_eq!(filter.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_filter_parses_present_values() {
        let filter: UserFilter =
            serde_json::from_str(r#"{"status": "SUSPENDED", "page": "3", "size": "5"}"#).unwrap();
        assert_eq!(filter.status, Some(UserStatus::Suspended));
        assert_eq!(filter.page, 3);
        assert_eq!(filter.size, 5);

        assert!(serde_json::from_str::<UserFilter>(r#"{"status": "active"}"#).is_err());
        assert!(serde_json::from_str::<UserFilter>(r#"{"page": "-1"}"#).is_err());
    }

    #[test]
    fn test_create_payload_reads_camel_case_phone_number() {
        let create: CreateUser = serde_json::from_str(
            r#"{"name": "Jane", "email": "jane@example.com", "phoneNumber": "+14155550100"}"#,
        )
        .unwrap();
        assert_eq!(create.phone_number.as_deref(), Some("+14155550100"));

        let update: UpdateUser = serde_json::from_str(r#"{"phoneNumber": "+14155550100"}"#).unwrap();
        assert_eq!(update.phone_number.as_deref(), Some("+14155550100"));
    }
}
