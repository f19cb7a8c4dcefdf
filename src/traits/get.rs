//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::FortiClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually
/// by their master key (a numeric `policyid` or a name).
///
/// # Example
///
/// ```ignore
/// use fortiapi::{FortiClient, Policy, Get};
///
/// let client = FortiClient::from_env()?;
/// let policy = Policy::get(&client, 12).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id: Send + 'static;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist, or an error if the
    /// request fails.
    async fn get(client: &FortiClient, id: Self::Id) -> Result<Self>;
}
