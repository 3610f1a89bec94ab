//! HAL representations of users.
//!
//! Hrefs are root-relative and built from [`USERS_PATH`], so they stay valid
//! behind any host or proxy.

use database::Page;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::{User, UserFilter};

/// Mount point of the user resource
pub const USERS_PATH: &str = "/api/v1/users";

pub const REL_SELF: &str = "self";
pub const REL_UPDATE: &str = "update";
pub const REL_DELETE: &str = "delete";
pub const REL_ALL_USERS: &str = "all-users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Relation name to link
pub type Links = BTreeMap<String, Link>;

pub fn user_href(id: i64) -> String {
    format!("{}/{}", USERS_PATH, id)
}

/// A user plus its `_links`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResource {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, Link>,
}

impl UserResource {
    pub fn new(user: User) -> Self {
        Self {
            user,
            links: Links::new(),
        }
    }

    pub fn with_link(mut self, rel: &str, href: impl Into<String>) -> Self {
        self.links.insert(rel.to_string(), Link::new(href));
        self
    }

    fn with_self_link(self) -> Self {
        match self.user.id {
            Some(id) => self.with_link(REL_SELF, user_href(id)),
            None => self,
        }
    }

    /// Single user as returned by get and create: `self` and `all-users`
    pub fn detail(user: User) -> Self {
        Self::new(user)
            .with_self_link()
            .with_link(REL_ALL_USERS, USERS_PATH)
    }

    /// Entry of a listing: `self`, `update` and `delete`
    pub fn list_entry(user: User) -> Self {
        let resource = Self::new(user).with_self_link();
        match resource.user.id {
            Some(id) => resource
                .with_link(REL_UPDATE, user_href(id))
                .with_link(REL_DELETE, user_href(id)),
            None => resource,
        }
    }

    /// Result of an update: `self` only
    pub fn updated(user: User) -> Self {
        Self::new(user).with_self_link()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmbeddedUsers {
    #[serde(rename = "userDTOList")]
    pub users: Vec<UserResource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u64,
    pub number: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

/// A page of users in HAL form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserCollection {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedUsers,
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, Link>,
    pub page: PageMetadata,
}

impl UserCollection {
    /// `filter` is echoed in the `self` link so the page can be re-fetched
    pub fn from_page(page: Page<User>, filter: &UserFilter) -> Self {
        let metadata = PageMetadata {
            size: page.size,
            number: page.number,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        };
        let users = page.content.into_iter().map(UserResource::list_entry).collect();

        let mut links = Links::new();
        links.insert(
            REL_SELF.to_string(),
            Link::new(collection_href(filter, &metadata)),
        );

        Self {
            embedded: EmbeddedUsers { users },
            links,
            page: metadata,
        }
    }
}

fn collection_href(filter: &UserFilter, page: &PageMetadata) -> String {
    let mut query = Vec::new();
    if let Some(name) = &filter.name {
        query.push(format!("name={}", urlencoding::encode(name)));
    }
    if let Some(status) = filter.status {
        query.push(format!("status={}", status));
    }
    query.push(format!("page={}", page.number));
    query.push(format!("size={}", page.size));

    format!("{}?{}", USERS_PATH, query.join("&"))
}
