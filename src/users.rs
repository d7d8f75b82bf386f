//! User (principal) administration for Microsoft Graph.
//!
//! - [`list_users`]: every user in the tenant, optionally OData-filtered.
//! - [`get_user`]: one user by object id or user principal name.
//! - [`create_user`]: new user with a temporary password.
//! - [`update_user`]: PATCH of arbitrary properties.
//! - [`delete_user`]: soft delete (restorable for 30 days in the tenant).
//!
//! Required application permission: `User.ReadWrite.All`.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{path_segment, GraphClient};
use crate::error::{GraphError, Result};

// ── Response types ─────────────────────────────────────────────────────

/// A user as returned by Graph.
///
/// Reference: <https://learn.microsoft.com/en-us/graph/api/resources/user>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub user_principal_name: Option<String>,

    /// Primary SMTP address. Null for users without a mailbox.
    #[serde(default)]
    pub mail: Option<String>,

    #[serde(default)]
    pub mail_nickname: Option<String>,

    /// Not part of Graph's default `$select` set, so usually absent on list
    /// responses.
    #[serde(default)]
    pub account_enabled: Option<bool>,
}

// ── Request types ──────────────────────────────────────────────────────

/// Password settings for a newly created user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
    pub force_change_password_next_sign_in: bool,
    pub password: String,
}

/// Body for POST `/users`. All fields are required by Graph.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub account_enabled: bool,
    pub display_name: String,
    pub mail_nickname: String,
    pub user_principal_name: String,
    pub password_profile: PasswordProfile,
}

impl CreateUserRequest {
    /// An enabled account whose password must be changed at first sign-in.
    pub fn new(user_principal_name: &str, display_name: &str, mail_nickname: &str, password: &str) -> Self {
        CreateUserRequest {
            account_enabled: true,
            display_name: display_name.to_string(),
            mail_nickname: mail_nickname.to_string(),
            user_principal_name: user_principal_name.to_string(),
            password_profile: PasswordProfile {
                force_change_password_next_sign_in: true,
                password: password.to_string(),
            },
        }
    }
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Lists all users, following pagination to the end.
///
/// `filter` is an OData `$filter` expression such as
/// `"accountEnabled eq false"`; it is URL-encoded here.
pub async fn list_users(client: &GraphClient, filter: Option<&str>) -> Result<Vec<User>> {
    let path = match filter {
        Some(f) if !f.is_empty() => format!("users?$filter={}", urlencoding::encode(f)),
        _ => "users".to_string(),
    };
    client.get_all(&path).await
}

/// Retrieves one user by object id or user principal name.
///
/// A 404 becomes [`GraphError::NotFound`]; any other non-200 status stays
/// [`GraphError::Api`].
pub async fn get_user(client: &GraphClient, id_or_upn: &str) -> Result<User> {
    let path = format!("users/{}", path_segment(id_or_upn));
    match client.get(&path).await {
        Err(GraphError::Api { status, body }) if status == StatusCode::NOT_FOUND => {
            Err(GraphError::NotFound {
                resource: "user",
                id: id_or_upn.to_string(),
                body,
            })
        }
        other => other,
    }
}

/// Creates a user; Graph echoes the created entity with 201.
pub async fn create_user(client: &GraphClient, request: &CreateUserRequest) -> Result<User> {
    client.post("users", request, StatusCode::CREATED).await
}

/// Updates the given properties of a user. Only the supplied keys change.
pub async fn update_user(
    client: &GraphClient,
    id_or_upn: &str,
    properties: &Map<String, Value>,
) -> Result<()> {
    let path = format!("users/{}", path_segment(id_or_upn));
    client.patch(&path, properties).await
}

/// Deletes a user.
pub async fn delete_user(client: &GraphClient, id_or_upn: &str) -> Result<()> {
    let path = format!("users/{}", path_segment(id_or_upn));
    client.delete(&path).await
}

/// Interprets a raw command-line value for a PATCH body.
///
/// Valid JSON (`true`, `42`, `["+1 555 0100"]`, `"quoted"`) is sent as that
/// JSON value; anything else is sent as a plain string.
pub fn parse_property_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
