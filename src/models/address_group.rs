//! Address group model and trait implementations.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::FortiClient;
use crate::cmdb;
use crate::error::Result;
use crate::models::common::NamedRef;
use crate::traits::{Create, Delete, Get, List, Update};

const TABLE: &str = "firewall/addrgrp";
const ENTITY: &str = "AddressGroup";

/// A named group of firewall addresses. Keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddressGroup {
    pub name: String,

    #[serde(default)]
    pub member: Vec<NamedRef>,

    /// `default` or `folder`.
    #[serde(rename = "type", default)]
    pub group_type: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub color: Option<u32>,
}

/// Parameters for creating or updating an address group.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct AddressGroupParams {
    /// Required on create; renames the group on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<Vec<NamedRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

#[async_trait]
impl Get for AddressGroup {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FortiClient, name: String) -> Result<Self> {
        cmdb::get_one(client, ENTITY, TABLE, &name).await
    }
}

#[async_trait]
impl List for AddressGroup {
    #[tracing::instrument(skip(client))]
    async fn list(client: &FortiClient) -> Result<Vec<Self>> {
        cmdb::list(client, TABLE).await
    }
}

#[async_trait]
impl Create for AddressGroup {
    type Id = String;
    type Params = AddressGroupParams;

    #[tracing::instrument(skip(client))]
    async fn create(client: &FortiClient, params: Self::Params) -> Result<String> {
        cmdb::create(client, TABLE, &params).await
    }
}

#[async_trait]
impl Update for AddressGroup {
    type Id = String;
    type Params = AddressGroupParams;

    #[tracing::instrument(skip(client))]
    async fn update(client: &FortiClient, name: String, params: Self::Params) -> Result<Self> {
        cmdb::update(client, ENTITY, TABLE, &name, &params).await?;
        let current = params.name.unwrap_or(name);
        Self::get(client, current).await
    }
}

#[async_trait]
impl Delete for AddressGroup {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &FortiClient, name: String) -> Result<()> {
        cmdb::delete(client, ENTITY, TABLE, &name).await
    }
}
