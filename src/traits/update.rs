//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::FortiClient;
use crate::error::Result;

/// Update an existing entity.
///
/// FortiOS acknowledges writes without echoing the entry, so
/// implementations read it back after the update.
///
/// # Example
///
/// ```ignore
/// use fortiapi::{FortiClient, Policy, Update, PolicyParams};
///
/// let client = FortiClient::from_env()?;
/// let updated = Policy::update(
///     &client,
///     12,
///     PolicyParams {
///         comments: Some("reviewed".to_string()),
///         ..Default::default()
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// The ID type for this entity.
    type Id: Send + 'static;

    /// Parameters for the update.
    type Params: Send + Sync;

    /// Update the entity and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &FortiClient, id: Self::Id, params: Self::Params) -> Result<Self>;
}
