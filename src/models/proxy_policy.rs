//! Explicit/transparent proxy policy model and trait implementations.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::client::{FortiClient, MovePosition};
use crate::cmdb;
use crate::error::Result;
use crate::models::common::{NamedRef, PolicyIdEntry};
use crate::reorder::{fetch_projection, OrderedItem, SortKey};
use crate::traits::{Create, Delete, Get, List, Reorder, Update};

const TABLE: &str = "firewall/proxy-policy";

/// A proxy policy.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProxyPolicy {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub policyid: u64,

    #[serde(default)]
    pub name: Option<String>,

    /// Proxy type, e.g. `explicit-web`, `transparent-web`, `ftp`.
    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

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

    #[serde(default)]
    pub logtraffic: Option<String>,

    #[serde(default)]
    pub comments: Option<String>,
}

/// Parameters for creating or updating a proxy policy.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ProxyPolicyParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policyid: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

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
    pub comments: Option<String>,
}

#[async_trait]
impl Get for ProxyPolicy {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FortiClient, id: u64) -> Result<Self> {
        cmdb::get_one(client, Self::ENTITY, TABLE, &id.to_string()).await
    }
}

#[async_trait]
impl List for ProxyPolicy {
    #[tracing::instrument(skip(client))]
    async fn list(client: &FortiClient) -> Result<Vec<Self>> {
        cmdb::list(client, TABLE).await
    }
}

#[async_trait]
impl Create for ProxyPolicy {
    type Id = u64;
    type Params = ProxyPolicyParams;

    #[tracing::instrument(skip(client))]
    async fn create(client: &FortiClient, params: Self::Params) -> Result<u64> {
        cmdb::create(client, TABLE, &params).await
    }
}

#[async_trait]
impl Update for ProxyPolicy {
    type Id = u64;
    type Params = ProxyPolicyParams;

    #[tracing::instrument(skip(client))]
    async fn update(client: &FortiClient, id: u64, params: Self::Params) -> Result<Self> {
        cmdb::update(client, Self::ENTITY, TABLE, &id.to_string(), &params).await?;
        Self::get(client, id).await
    }
}

#[async_trait]
impl Delete for ProxyPolicy {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &FortiClient, id: u64) -> Result<()> {
        cmdb::delete(client, Self::ENTITY, TABLE, &id.to_string()).await
    }
}

#[async_trait]
impl Reorder for ProxyPolicy {
    type Id = u64;

    const ENTITY: &'static str = "ProxyPolicy";
    const SORT_KEYS: &'static [SortKey] = &[SortKey::Id];

    #[tracing::instrument(skip(client))]
    async fn fetch_order(client: &FortiClient, _key: SortKey) -> Result<Vec<OrderedItem<u64>>> {
        let entries: Vec<PolicyIdEntry> =
            fetch_projection(client, Self::ENTITY, TABLE, "policyid").await?;
        Ok(entries.into_iter().map(OrderedItem::from).collect())
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
