//! Central SNAT map model and trait implementations.

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

const TABLE: &str = "firewall/central-snat-map";

/// An entry of the central SNAT table (active when `central-nat` is
/// enabled). Like policies, the first matching entry wins.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CentralSnatMap {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub policyid: u64,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub srcintf: Vec<NamedRef>,

    #[serde(default)]
    pub dstintf: Vec<NamedRef>,

    #[serde(default)]
    pub orig_addr: Vec<NamedRef>,

    #[serde(default)]
    pub dst_addr: Vec<NamedRef>,

    /// IP protocol number, 0 for any.
    #[serde(default)]
    pub protocol: Option<u8>,

    /// `enable` to translate, `disable` to exempt matching traffic.
    #[serde(default)]
    pub nat: Option<String>,

    #[serde(default)]
    pub nat_ippool: Vec<NamedRef>,

    #[serde(default)]
    pub comments: Option<String>,
}

/// Parameters for creating or updating a central SNAT entry.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CentralSnatMapParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policyid: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcintf: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dstintf: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_addr: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_addr: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_ippool: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[async_trait]
impl Get for CentralSnatMap {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FortiClient, id: u64) -> Result<Self> {
        cmdb::get_one(client, Self::ENTITY, TABLE, &id.to_string()).await
    }
}

#[async_trait]
impl List for CentralSnatMap {
    #[tracing::instrument(skip(client))]
    async fn list(client: &FortiClient) -> Result<Vec<Self>> {
        cmdb::list(client, TABLE).await
    }
}

#[async_trait]
impl Create for CentralSnatMap {
    type Id = u64;
    type Params = CentralSnatMapParams;

    #[tracing::instrument(skip(client))]
    async fn create(client: &FortiClient, params: Self::Params) -> Result<u64> {
        cmdb::create(client, TABLE, &params).await
    }
}

#[async_trait]
impl Update for CentralSnatMap {
    type Id = u64;
    type Params = CentralSnatMapParams;

    #[tracing::instrument(skip(client))]
    async fn update(client: &FortiClient, id: u64, params: Self::Params) -> Result<Self> {
        cmdb::update(client, Self::ENTITY, TABLE, &id.to_string(), &params).await?;
        Self::get(client, id).await
    }
}

#[async_trait]
impl Delete for CentralSnatMap {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &FortiClient, id: u64) -> Result<()> {
        cmdb::delete(client, Self::ENTITY, TABLE, &id.to_string()).await
    }
}

#[async_trait]
impl Reorder for CentralSnatMap {
    type Id = u64;

    const ENTITY: &'static str = "CentralSnatMap";
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
