//! FortiOS REST API client library.
//!
//! A Rust library for managing FortiGate configuration through the
//! `/api/v2/cmdb` REST API, using a trait-based architecture where each
//! operation (Get, List, Create, Update, Delete, Reorder) is a trait that
//! entity types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use fortiapi::{FortiClient, Get, List, Policy, Reorder, SortKey, SortSpec};
//!
//! #[tokio::main]
//! async fn main() -> fortiapi::Result<()> {
//!     // Create client from environment variables
//!     let client = FortiClient::from_env()?;
//!
//!     // Get a policy by id
//!     let policy = Policy::get(&client, 1).await?;
//!     println!("Policy: {}", policy.name);
//!
//!     // List the policy table in evaluation order
//!     let policies = Policy::list(&client).await?;
//!     println!("Found {} policies", policies.len());
//!
//!     // Re-sort the table by name
//!     let outcome = Policy::sort(&client, SortSpec::ascending(SortKey::Name)).await?;
//!     println!("Sorted with {} moves", outcome.moves);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around these traits:
//!
//! - [`Get`] - Fetch a single entry by master key
//! - [`List`] - Fetch a whole table
//! - [`Create`], [`Update`], [`Delete`] - Modify entries
//! - [`Reorder`] - Sort an ordered table (policies, proxy policies,
//!   central SNAT) using only the appliance's move primitive
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `FORTIOS_API_TOKEN` (required) - REST API administrator token
//! - `FORTIOS_API_URL` (required) - Appliance address, e.g. `https://192.0.2.1`
//! - `FORTIOS_VDOM` (optional) - VDOM to scope requests to
//! - `FORTIOS_INSECURE` (optional) - `1` to accept self-signed certificates

mod client;
mod cmdb;
mod error;
mod models;
mod output;
mod traits;

pub mod cli;
pub mod mcp;
pub mod reorder;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{FortiClient, FortiClientBuilder, MovePosition};
pub use error::{FortiError, MoveError, Result};
pub use output::PrettyPrint;

// Re-export traits
pub use traits::{Create, Delete, Get, List, Reorder, Update};

// Re-export the reorder vocabulary
pub use reorder::{
    Direction, OrderedCollection, OrderedItem, SortKey, SortOutcome, SortSpec, SortValue,
};

// Re-export models
pub use models::{
    join_names,
    // Address group types
    AddressGroup,
    AddressGroupParams,
    // Central SNAT types
    CentralSnatMap,
    CentralSnatMapParams,
    NamedRef,
    // Policy types
    Policy,
    PolicyParams,
    // Proxy policy types
    ProxyPolicy,
    ProxyPolicyParams,
    // Service types
    ServiceCustom,
    ServiceCustomParams,
};
