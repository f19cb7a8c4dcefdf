//! Custom service model and trait implementations.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::FortiClient;
use crate::cmdb;
use crate::error::Result;
use crate::traits::{Create, Delete, Get, List, Update};

const TABLE: &str = "firewall.service/custom";
const ENTITY: &str = "ServiceCustom";

/// A custom service (protocol + port ranges). Keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceCustom {
    pub name: String,

    /// `TCP/UDP/SCTP`, `ICMP`, `ICMP6` or `IP`.
    #[serde(default)]
    pub protocol: Option<String>,

    /// Space separated ranges, e.g. `"80 443 8000-8080"`.
    #[serde(default)]
    pub tcp_portrange: Option<String>,

    #[serde(default)]
    pub udp_portrange: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,
}

impl ServiceCustom {
    /// Individual TCP port ranges.
    pub fn tcp_ranges(&self) -> Vec<&str> {
        self.tcp_portrange
            .as_deref()
            .map(|r| r.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Parameters for creating or updating a custom service.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceCustomParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_portrange: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_portrange: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[async_trait]
impl Get for ServiceCustom {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FortiClient, name: String) -> Result<Self> {
        cmdb::get_one(client, ENTITY, TABLE, &name).await
    }
}

#[async_trait]
impl List for ServiceCustom {
    #[tracing::instrument(skip(client))]
    async fn list(client: &FortiClient) -> Result<Vec<Self>> {
        cmdb::list(client, TABLE).await
    }
}

#[async_trait]
impl Create for ServiceCustom {
    type Id = String;
    type Params = ServiceCustomParams;

    #[tracing::instrument(skip(client))]
    async fn create(client: &FortiClient, params: Self::Params) -> Result<String> {
        cmdb::create(client, TABLE, &params).await
    }
}

#[async_trait]
impl Update for ServiceCustom {
    type Id = String;
    type Params = ServiceCustomParams;

    #[tracing::instrument(skip(client))]
    async fn update(client: &FortiClient, name: String, params: Self::Params) -> Result<Self> {
        cmdb::update(client, ENTITY, TABLE, &name, &params).await?;
        let current = params.name.unwrap_or(name);
        Self::get(client, current).await
    }
}

#[async_trait]
impl Delete for ServiceCustom {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &FortiClient, name: String) -> Result<()> {
        cmdb::delete(client, ENTITY, TABLE, &name).await
    }
}
