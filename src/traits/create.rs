//! Create trait for adding entities.

use async_trait::async_trait;

use crate::client::FortiClient;
use crate::error::Result;

/// Create a new table entry.
#[async_trait]
pub trait Create: Sized {
    /// The ID type the appliance assigns or echoes back.
    type Id: Send + 'static;

    /// Parameters for the new entry.
    type Params: Send + Sync;

    /// Create the entry and return its master key.
    ///
    /// # Errors
    ///
    /// Returns an error if the appliance rejects the entry.
    async fn create(client: &FortiClient, params: Self::Params) -> Result<Self::Id>;
}
