//! Firewall policy model and trait implementations.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::client::{FortiClient, MovePosition};
use crate::cmdb;
use crate::error::Result;
use crate::models::common::NamedRef;
use crate::reorder::{fetch_projection, OrderedItem, SortKey};
use crate::traits::{Create, Delete, Get, List, Reorder, Update};

const TABLE: &str = "firewall/policy";

/// An IPv4/IPv6 firewall policy.
///
/// Policies are evaluated top to bottom in table order, which is why the
/// table supports [`Reorder`].
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Policy {
    /// The policy id (master key).
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub policyid: u64,

    /// Policy name; may be empty on older configurations.
    #[serde(default)]
    pub name: String,

    /// `enable` or `disable`.
    #[serde(default)]
    pub status: Option<String>,

    /// `accept`, `deny` or `ipsec`.
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub srcintf: Vec<NamedRef>,

    #[serde(default)]
    pub dstintf: Vec<NamedRef>,

    #[serde(default)]
    pub srcaddr: Vec<NamedRef>,

    #[serde(default)]
    pub dstaddr: Vec<NamedRef>,

    #[serde(default)]
    pub service: Vec<NamedRef>,

    #[serde(default)]
    pub schedule: Option<String>,

    /// Source NAT, `enable` or `disable`.
    #[serde(default)]
    pub nat: Option<String>,

    /// `all`, `utm` or `disable`.
    #[serde(default)]
    pub logtraffic: Option<String>,

    #[serde(default)]
    pub comments: Option<String>,
}

impl Policy {
    /// Whether the policy takes part in evaluation.
    pub fn is_enabled(&self) -> bool {
        self.status.as_deref() != Some("disable")
    }
}

/// Parameters for creating or updating a policy.
///
/// Unset fields are left out of the request body.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct PolicyParams {
    /// Requested id on create; the appliance assigns one when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policyid: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcintf: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dstintf: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcaddr: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dstaddr: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logtraffic: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// The `policyid|name` projection used for ordering.
#[serde_as]
#[derive(Debug, Deserialize)]
struct PolicyOrderEntry {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    policyid: u64,
    #[serde(default)]
    name: String,
}

#[async_trait]
impl Get for Policy {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FortiClient, id: u64) -> Result<Self> {
        cmdb::get_one(client, Self::ENTITY, TABLE, &id.to_string()).await
    }
}

#[async_trait]
impl List for Policy {
    #[tracing::instrument(skip(client))]
    async fn list(client: &FortiClient) -> Result<Vec<Self>> {
        cmdb::list(client, TABLE).await
    }
}

#[async_trait]
impl Create for Policy {
    type Id = u64;
    type Params = PolicyParams;

    #[tracing::instrument(skip(client))]
    async fn create(client: &FortiClient, params: Self::Params) -> Result<u64> {
        cmdb::create(client, TABLE, &params).await
    }
}

#[async_trait]
impl Update for Policy {
    type Id = u64;
    type Params = PolicyParams;

    #[tracing::instrument(skip(client))]
    async fn update(client: &FortiClient, id: u64, params: Self::Params) -> Result<Self> {
        cmdb::update(client, Self::ENTITY, TABLE, &id.to_string(), &params).await?;
        Self::get(client, id).await
    }
}

#[async_trait]
impl Delete for Policy {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &FortiClient, id: u64) -> Result<()> {
        cmdb::delete(client, Self::ENTITY, TABLE, &id.to_string()).await
    }
}

#[async_trait]
impl Reorder for Policy {
    type Id = u64;

    const ENTITY: &'static str = "Policy";
    const SORT_KEYS: &'static [SortKey] = &[SortKey::Id, SortKey::Name];

    #[tracing::instrument(skip(client))]
    async fn fetch_order(client: &FortiClient, key: SortKey) -> Result<Vec<OrderedItem<u64>>> {
        let entries: Vec<PolicyOrderEntry> =
            fetch_projection(client, Self::ENTITY, TABLE, "policyid|name").await?;

        Ok(entries
            .into_iter()
            .map(|entry| match key {
                SortKey::Id => OrderedItem::new(entry.policyid, entry.policyid),
                SortKey::Name => OrderedItem::new(entry.policyid, entry.name),
            })
            .collect())
    }

    #[tracing::instrument(skip(client))]
    async fn move_to(
        client: &FortiClient,
        id: &u64,
        position: MovePosition,
        target: &u64,
    ) -> Result<()> {
        let path = cmdb::entry_path(TABLE, &id.to_string());
        client.move_entry(&path, position, &target.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_deserialize() {
        let json = r#"{
            "policyid": 7,
            "q_origin_key": 7,
            "name": "allow-web",
            "uuid": "5e0a7a1c-0000-51ee-0000-4b0c0000a001",
            "srcintf": [{"name": "port2", "q_origin_key": "port2"}],
            "dstintf": [{"name": "wan1", "q_origin_key": "wan1"}],
            "action": "accept",
            "status": "enable",
            "srcaddr": [{"name": "lan-subnet"}],
            "dstaddr": [{"name": "all"}],
            "schedule": "always",
            "service": [{"name": "HTTP"}, {"name": "HTTPS"}],
            "nat": "enable",
            "logtraffic": "utm",
            "comments": ""
        }"#;

        let policy: Policy = serde_json::from_str(json).expect("Failed to deserialize policy");

        assert_eq!(policy.policyid, 7);
        assert_eq!(policy.name, "allow-web");
        assert_eq!(policy.action.as_deref(), Some("accept"));
        assert_eq!(policy.srcintf, vec![NamedRef::new("port2")]);
        assert_eq!(policy.service.len(), 2);
        assert!(policy.is_enabled());
    }

    #[test]
    fn test_policy_minimal() {
        let policy: Policy = serde_json::from_str(r#"{"policyid": 1}"#).unwrap();
        assert_eq!(policy.name, "");
        assert!(policy.srcaddr.is_empty());
        assert!(policy.is_enabled());
    }

    #[test]
    fn test_order_entry_accepts_string_ids() {
        let entry: PolicyOrderEntry =
            serde_json::from_str(r#"{"policyid": "12", "name": "x"}"#).unwrap();
        assert_eq!(entry.policyid, 12);

        let entry: PolicyOrderEntry = serde_json::from_str(r#"{"policyid": 4}"#).unwrap();
        assert_eq!(entry.policyid, 4);
        assert_eq!(entry.name, "");
    }

    #[test]
    fn test_params_skip_unset_fields() {
        let params = PolicyParams {
            name: Some("deny-all".to_string()),
            action: Some("deny".to_string()),
            srcaddr: Some(vec![NamedRef::new("all")]),
            ..Default::default()
        };

        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "deny-all",
                "action": "deny",
                "srcaddr": [{"name": "all"}]
            })
        );
    }
}
