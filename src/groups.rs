//! Group listing and membership management for Microsoft Graph.
//!
//! | Function | API Path |
//! |----------|----------|
//! | [`list_groups`] | GET `/groups` |
//! | [`list_user_groups`] | GET `/users/{upn}/memberOf` |
//! | [`add_member`] | POST `/groups/{id}/members/$ref` |
//! | [`remove_member`] | DELETE `/groups/{id}/members/{userId}/$ref` |
//!
//! Membership changes require `GroupMember.ReadWrite.All`.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::{path_segment, GraphClient};
use crate::error::Result;

/// A group as returned by Graph.
///
/// `memberOf` can also yield directory roles and administrative units; they
/// share these fields and are returned as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Body for POST `/groups/{id}/members/$ref`.
#[derive(Debug, Serialize)]
pub struct MemberReference {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

impl MemberReference {
    /// Reference to a directory object under the client's service root.
    pub fn directory_object(client: &GraphClient, object_id: &str) -> Self {
        MemberReference {
            odata_id: format!("{}/directoryObjects/{}", client.base_url(), object_id),
        }
    }
}

/// Lists all groups in the tenant.
pub async fn list_groups(client: &GraphClient) -> Result<Vec<Group>> {
    client.get_all("groups").await
}

/// Lists the groups (and other directory objects) a user is a direct member of.
pub async fn list_user_groups(client: &GraphClient, id_or_upn: &str) -> Result<Vec<Group>> {
    let path = format!("users/{}/memberOf", path_segment(id_or_upn));
    client.get_all(&path).await
}

/// Adds a directory object (by object id) to a group.
pub async fn add_member(client: &GraphClient, group_id: &str, member_id: &str) -> Result<()> {
    let path = format!("groups/{}/members/$ref", path_segment(group_id));
    let body = MemberReference::directory_object(client, member_id);
    client
        .post_no_content(&path, &body, StatusCode::NO_CONTENT)
        .await
}

/// Removes a directory object (by object id) from a group.
pub async fn remove_member(client: &GraphClient, group_id: &str, member_id: &str) -> Result<()> {
    let path = format!(
        "groups/{}/members/{}/$ref",
        path_segment(group_id),
        path_segment(member_id)
    );
    client.delete(&path).await
}
