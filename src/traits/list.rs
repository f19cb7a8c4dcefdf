//! List trait for fetching whole tables.

use async_trait::async_trait;

use crate::client::FortiClient;
use crate::error::Result;

/// List every entry of a table.
///
/// CMDB tables are returned in one response, in the order the appliance
/// keeps them (evaluation order for policy tables).
///
/// # Example
///
/// ```ignore
/// use fortiapi::{FortiClient, Policy, List};
///
/// let client = FortiClient::from_env()?;
/// let policies = Policy::list(&client).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// List all entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list(client: &FortiClient) -> Result<Vec<Self>>;
}
