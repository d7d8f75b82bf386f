//! License (SKU) inspection and assignment for Microsoft Graph.
//!
//! Covers the tenant's subscribed SKUs, the licenses assigned to a user or a
//! group, and the `assignLicense` action for both. Assignment adds and removes
//! SKUs in one call; the remote API decides whether that is all-or-nothing.
//!
//! ## Failure classification
//!
//! Rejected assignments come back as a Graph error envelope
//! (`{"error": {"code": .., "message": ..}}`). The message is matched
//! case-insensitively against [`FailureHints`] to attach remediation guidance
//! for two known classes: a missing usage location on the principal, and too
//! few available units. Graph's wording is not a contract, so the markers are
//! data (overridable from the config file) rather than hard-coded checks.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::{path_segment, GraphClient};
use crate::error::{GraphError, Remedy, Result};

// ── Response types ─────────────────────────────────────────────────────

/// Unit counts purchased for a SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaidUnits {
    #[serde(default)]
    pub enabled: i64,
    #[serde(default)]
    pub suspended: i64,
    #[serde(default)]
    pub warning: i64,
}

/// A SKU the tenant holds a subscription for.
///
/// Reference: <https://learn.microsoft.com/en-us/graph/api/resources/subscribedsku>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedSku {
    pub id: String,
    pub sku_id: String,
    #[serde(default)]
    pub sku_part_number: Option<String>,
    #[serde(default)]
    pub consumed_units: i64,
    #[serde(default)]
    pub prepaid_units: PrepaidUnits,
}

impl SubscribedSku {
    /// Enabled units not yet consumed. Negative when over-assigned.
    pub fn available_units(&self) -> i64 {
        self.prepaid_units.enabled - self.consumed_units
    }
}

/// A license assigned to a user or group.
///
/// The group view carries only `skuId`; `id` and `skuPartNumber` are absent
/// there until resolved with [`resolve_part_numbers`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDetail {
    #[serde(default)]
    pub id: Option<String>,
    pub sku_id: String,
    #[serde(default)]
    pub sku_part_number: Option<String>,
}

/// `assignedLicense` entry as it appears on a group resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignedLicense {
    sku_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupAssignedLicenses {
    #[serde(default)]
    assigned_licenses: Vec<AssignedLicense>,
}

/// Graph's structured error body.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ── Request types ──────────────────────────────────────────────────────

/// One SKU to add. `disabledPlans` is required by Graph; empty enables every plan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLicense {
    pub sku_id: String,
    pub disabled_plans: Vec<String>,
}

/// Body for POST `/users/{id}/assignLicense` and `/groups/{id}/assignLicense`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignLicenseRequest {
    pub add_licenses: Vec<AddLicense>,
    pub remove_licenses: Vec<String>,
}

impl AssignLicenseRequest {
    pub fn new(add: Vec<String>, remove: Vec<String>) -> Self {
        AssignLicenseRequest {
            add_licenses: add
                .into_iter()
                .map(|sku_id| AddLicense {
                    sku_id,
                    disabled_plans: Vec::new(),
                })
                .collect(),
            remove_licenses: remove,
        }
    }
}

// ── Failure classification ─────────────────────────────────────────────

/// What an assignment targets. Selects the endpoint and the guidance wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignTarget {
    User,
    Group,
}

/// Substring markers used to classify rejected assignments.
///
/// Usage-location markers are checked first: Graph's usage-location message
/// also mentions "license" and would otherwise be read as a capacity problem.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FailureHints {
    pub usage_location: Vec<String>,
    pub license_capacity: Vec<String>,
}

impl Default for FailureHints {
    fn default() -> Self {
        FailureHints {
            usage_location: vec!["usage location".to_string(), "usagelocation".to_string()],
            license_capacity: vec!["no available licenses".to_string(), "license".to_string()],
        }
    }
}

impl FailureHints {
    /// Picks the remediation guidance for a Graph error message.
    pub fn classify(&self, message: &str, target: AssignTarget) -> Remedy {
        let haystack = message.to_lowercase();
        let matches = |markers: &[String]| {
            markers
                .iter()
                .any(|m| !m.is_empty() && haystack.contains(&m.to_lowercase()))
        };

        if matches(&self.usage_location) {
            match target {
                AssignTarget::User => Remedy::UserUsageLocation,
                AssignTarget::Group => Remedy::GroupUsageLocation,
            }
        } else if matches(&self.license_capacity) {
            match target {
                AssignTarget::User => Remedy::UserCapacity,
                AssignTarget::Group => Remedy::GroupCapacity,
            }
        } else {
            Remedy::None
        }
    }

    /// Turns a rejected assignment into a [`GraphError::License`] when the body
    /// is a Graph error envelope with a message. Otherwise the original
    /// status-and-body error is returned unchanged.
    fn enrich(&self, err: GraphError, target: AssignTarget) -> GraphError {
        let GraphError::Api { status, body } = err else {
            return err;
        };
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(ErrorEnvelope {
                error: ErrorBody {
                    message: Some(message),
                },
            }) => {
                let remedy = self.classify(&message, target);
                warn!(%status, ?remedy, "license assignment rejected");
                GraphError::License { message, remedy }
            }
            _ => GraphError::Api { status, body },
        }
    }
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Lists every SKU the tenant is subscribed to.
pub async fn list_subscribed_skus(client: &GraphClient) -> Result<Vec<SubscribedSku>> {
    client.get_all("subscribedSkus").await
}

/// Lists the licenses assigned to a user.
pub async fn get_user_licenses(client: &GraphClient, id_or_upn: &str) -> Result<Vec<LicenseDetail>> {
    let path = format!("users/{}/licenseDetails", path_segment(id_or_upn));
    client.get_all(&path).await
}

/// Lists the licenses assigned to a group (group-based licensing).
///
/// Groups expose assignments as the `assignedLicenses` property, so only
/// `skuId` is populated.
pub async fn get_group_licenses(client: &GraphClient, group_id: &str) -> Result<Vec<LicenseDetail>> {
    let path = format!("groups/{}?$select=assignedLicenses", path_segment(group_id));
    let group: GroupAssignedLicenses = client.get(&path).await?;
    Ok(group
        .assigned_licenses
        .into_iter()
        .map(|l| LicenseDetail {
            id: None,
            sku_id: l.sku_id,
            sku_part_number: None,
        })
        .collect())
}

/// Fills in missing `skuPartNumber`s from the tenant's subscribed SKUs.
pub fn resolve_part_numbers(details: &mut [LicenseDetail], skus: &[SubscribedSku]) {
    for detail in details.iter_mut().filter(|d| d.sku_part_number.is_none()) {
        detail.sku_part_number = skus
            .iter()
            .find(|s| s.sku_id.eq_ignore_ascii_case(&detail.sku_id))
            .and_then(|s| s.sku_part_number.clone());
    }
}

/// Adds and removes SKUs for a user or group in one `assignLicense` call.
///
/// Graph answers 200 on success. Structured rejections are classified with
/// `hints`; see the module docs.
pub async fn assign_licenses(
    client: &GraphClient,
    target: AssignTarget,
    id: &str,
    request: &AssignLicenseRequest,
    hints: &FailureHints,
) -> Result<()> {
    let collection = match target {
        AssignTarget::User => "users",
        AssignTarget::Group => "groups",
    };
    let path = format!("{collection}/{}/assignLicense", path_segment(id));
    client
        .post_no_content(&path, request, StatusCode::OK)
        .await
        .map_err(|e| hints.enrich(e, target))
}

/// Adds and removes SKUs for a user by object id or UPN.
pub async fn assign_user_licenses(
    client: &GraphClient,
    id_or_upn: &str,
    add: &[String],
    remove: &[String],
    hints: &FailureHints,
) -> Result<()> {
    let request = AssignLicenseRequest::new(add.to_vec(), remove.to_vec());
    assign_licenses(client, AssignTarget::User, id_or_upn, &request, hints).await
}

/// Adds and removes SKUs for a group; members inherit the result.
pub async fn assign_group_licenses(
    client: &GraphClient,
    group_id: &str,
    add: &[String],
    remove: &[String],
    hints: &FailureHints,
) -> Result<()> {
    let request = AssignLicenseRequest::new(add.to_vec(), remove.to_vec());
    assign_licenses(client, AssignTarget::Group, group_id, &request, hints).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribed_sku_deserializes_graph_response() {
        let json = r#"{
            "capabilityStatus": "Enabled",
            "consumedUnits": 14,
            "id": "48a80680-7326-48cd-9935-b556b81d3a4e_c7df2760-2c81-4ef7-b578-5b5392b571df",
            "prepaidUnits": {"enabled": 25, "suspended": 0, "warning": 0, "lockedOut": 0},
            "skuId": "c7df2760-2c81-4ef7-b578-5b5392b571df",
            "skuPartNumber": "ENTERPRISEPREMIUM",
            "appliesTo": "User"
        }"#;
        let sku: SubscribedSku = serde_json::from_str(json).unwrap();
        assert_eq!(sku.sku_id, "c7df2760-2c81-4ef7-b578-5b5392b571df");
        assert_eq!(sku.sku_part_number.as_deref(), Some("ENTERPRISEPREMIUM"));
        assert_eq!(sku.consumed_units, 14);
        assert_eq!(sku.prepaid_units.enabled, 25);
        assert_eq!(sku.available_units(), 11);
    }

    #[test]
    fn assign_request_serializes_add_and_remove() {
        let req = AssignLicenseRequest::new(vec!["SKU_A".into(), "SKU_B".into()], Vec::new());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "addLicenses": [
                    {"skuId": "SKU_A", "disabledPlans": []},
                    {"skuId": "SKU_B", "disabledPlans": []}
                ],
                "removeLicenses": []
            })
        );
    }

    #[test]
    fn usage_location_is_matched_case_insensitively() {
        let hints = FailureHints::default();
        let msg = "License assignment failed because of invalid usage Location.";
        assert_eq!(hints.classify(msg, AssignTarget::User), Remedy::UserUsageLocation);
        assert_eq!(
            hints.classify("Property usageLocation is required", AssignTarget::User),
            Remedy::UserUsageLocation
        );
    }

    #[test]
    fn capacity_marker_matches_license_messages() {
        let hints = FailureHints::default();
        assert_eq!(
            hints.classify(
                "License assignment failed: subscription has no remaining units.",
                AssignTarget::User
            ),
            Remedy::UserCapacity
        );
        assert_eq!(
            hints.classify("No available licenses for this SKU", AssignTarget::Group),
            Remedy::GroupCapacity
        );
    }

    #[test]
    fn unrelated_message_has_no_remedy() {
        let hints = FailureHints::default();
        assert_eq!(
            hints.classify("Invalid object identifier 'abc'.", AssignTarget::User),
            Remedy::None
        );
    }

    #[test]
    fn custom_hints_replace_defaults() {
        let hints: FailureHints =
            serde_json::from_str(r#"{"licenseCapacity": ["quota exhausted"]}"#).unwrap();
        assert_eq!(hints.usage_location, FailureHints::default().usage_location);
        assert_eq!(
            hints.classify("Quota exhausted for SKU", AssignTarget::User),
            Remedy::UserCapacity
        );
        assert_eq!(
            hints.classify("license count exceeded", AssignTarget::User),
            Remedy::None
        );
    }

    #[test]
    fn enrich_extracts_envelope_message() {
        let hints = FailureHints::default();
        let err = GraphError::Api {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error":{"code":"Request_BadRequest","message":"Invalid usage location"}}"#
                .to_string(),
        };
        match hints.enrich(err, AssignTarget::User) {
            GraphError::License { message, remedy } => {
                assert_eq!(message, "Invalid usage location");
                assert_eq!(remedy, Remedy::UserUsageLocation);
            }
            other => panic!("expected License error, got {other:?}"),
        }
    }

    #[test]
    fn enrich_keeps_status_and_body_for_unstructured_errors() {
        let hints = FailureHints::default();
        let err = GraphError::Api {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream unavailable".to_string(),
        };
        let msg = hints.enrich(err, AssignTarget::Group).to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("upstream unavailable"));
    }

    #[test]
    fn part_numbers_resolve_from_skus() {
        let skus = vec![SubscribedSku {
            id: "x".to_string(),
            sku_id: "c7df2760-2c81-4ef7-b578-5b5392b571df".to_string(),
            sku_part_number: Some("ENTERPRISEPREMIUM".to_string()),
            consumed_units: 0,
            prepaid_units: PrepaidUnits::default(),
        }];
        let mut details = vec![
            LicenseDetail {
                id: None,
                sku_id: "C7DF2760-2C81-4EF7-B578-5B5392B571DF".to_string(),
                sku_part_number: None,
            },
            LicenseDetail {
                id: None,
                sku_id: "unknown".to_string(),
                sku_part_number: None,
            },
        ];
        resolve_part_numbers(&mut details, &skus);
        assert_eq!(details[0].sku_part_number.as_deref(), Some("ENTERPRISEPREMIUM"));
        assert!(details[1].sku_part_number.is_none());
    }
}
