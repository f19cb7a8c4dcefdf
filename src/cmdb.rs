//! Shared plumbing for `/api/v2/cmdb` tables.
//!
//! Every CMDB table answers with the same envelope
//! (`{"status": "success", "results": [...]}`) and addresses entries by
//! their master key (`mkey`), so the per-model trait impls delegate here.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::FortiClient;
use crate::error::{FortiError, Result};

const CMDB_ROOT: &str = "api/v2/cmdb";

/// Path of a whole table, e.g. `api/v2/cmdb/firewall/policy`.
pub(crate) fn table_path(table: &str) -> String {
    format!("{CMDB_ROOT}/{table}")
}

/// Path of one entry; the master key is percent-encoded.
pub(crate) fn entry_path(table: &str, mkey: &str) -> String {
    format!("{CMDB_ROOT}/{table}/{}", urlencoding::encode(mkey))
}

/// Response envelope of CMDB reads.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    results: Option<T>,
}

impl<T> Envelope<T> {
    pub(crate) fn into_results(self, table: &str) -> Result<T> {
        self.results.ok_or_else(|| {
            FortiError::MalformedResponse(format!("{table}: response has no 'results' field"))
        })
    }
}

/// Response envelope of CMDB writes.
#[derive(Debug, Deserialize)]
struct MutationEnvelope {
    mkey: Option<serde_json::Value>,
}

/// Read a body as JSON, reporting parse failures as `ParseError`.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

pub(crate) async fn list<T: DeserializeOwned>(client: &FortiClient, table: &str) -> Result<Vec<T>> {
    let response = client.get(&table_path(table)).await?;
    let envelope: Envelope<Vec<T>> = read_json(response).await?;
    envelope.into_results(table)
}

pub(crate) async fn get_one<T: DeserializeOwned>(
    client: &FortiClient,
    entity_type: &'static str,
    table: &str,
    mkey: &str,
) -> Result<T> {
    let not_found = || FortiError::NotFound {
        entity_type,
        id: mkey.to_string(),
    };

    let response = match client.get(&entry_path(table, mkey)).await {
        Ok(response) => response,
        Err(err) if err.is_not_found() => return Err(not_found()),
        Err(err) => return Err(err),
    };
    let envelope: Envelope<Vec<T>> = read_json(response).await?;
    envelope
        .into_results(table)?
        .into_iter()
        .next()
        .ok_or_else(not_found)
}

pub(crate) async fn create<B, I>(client: &FortiClient, table: &str, body: &B) -> Result<I>
where
    B: Serialize + ?Sized,
    I: DeserializeOwned,
{
    let response = client.post(&table_path(table), body).await?;
    let envelope: MutationEnvelope = read_json(response).await?;
    let mkey = envelope.mkey.ok_or_else(|| {
        FortiError::MalformedResponse(format!("{table}: create response has no 'mkey' field"))
    })?;
    Ok(serde_json::from_value(mkey)?)
}

pub(crate) async fn update<B: Serialize + ?Sized>(
    client: &FortiClient,
    entity_type: &'static str,
    table: &str,
    mkey: &str,
    body: &B,
) -> Result<()> {
    match client.put(&entry_path(table, mkey), body).await {
        Ok(_) => Ok(()),
        Err(err) if err.is_not_found() => Err(FortiError::NotFound {
            entity_type,
            id: mkey.to_string(),
        }),
        Err(err) => Err(err),
    }
}

pub(crate) async fn delete(
    client: &FortiClient,
    entity_type: &'static str,
    table: &str,
    mkey: &str,
) -> Result<()> {
    match client.delete(&entry_path(table, mkey)).await {
        Ok(_) => Ok(()),
        Err(err) if err.is_not_found() => Err(FortiError::NotFound {
            entity_type,
            id: mkey.to_string(),
        }),
        Err(err) => Err(err),
    }
}
