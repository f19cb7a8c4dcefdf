//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::client::FortiClient;
use crate::error::Result;

/// Remove a table entry.
#[async_trait]
pub trait Delete {
    /// The ID type for this entity.
    type Id: Send + 'static;

    /// Delete the entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist.
    async fn delete(client: &FortiClient, id: Self::Id) -> Result<()>;
}
