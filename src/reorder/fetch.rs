//! Snapshot of a table's current order.

use serde::de::DeserializeOwned;

use crate::client::FortiClient;
use crate::cmdb::{self, Envelope};
use crate::error::{FortiError, Result};

/// Fetch `table` projected to `fields`, in appliance order.
///
/// A missing table (404) is an empty snapshot so that absent tables sort
/// trivially. Every other failure is reported as `FortiError::Fetch`.
pub(crate) async fn fetch_projection<T: DeserializeOwned>(
    client: &FortiClient,
    entity_type: &'static str,
    table: &str,
    fields: &str,
) -> Result<Vec<T>> {
    fetch(client, table, fields)
        .await
        .map_err(|source| FortiError::Fetch {
            collection: entity_type,
            source: Box::new(source),
        })
}

async fn fetch<T: DeserializeOwned>(
    client: &FortiClient,
    table: &str,
    fields: &str,
) -> Result<Vec<T>> {
    let path = cmdb::table_path(table);
    let response = match client.get_with_query(&path, &[("format", fields)]).await {
        Ok(response) => response,
        Err(err) if err.is_not_found() => {
            tracing::debug!(table, "table not found, treating as empty");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    let envelope: Envelope<Vec<T>> = cmdb::read_json(response).await?;
    envelope.into_results(table)
}
