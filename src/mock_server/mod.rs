//! Mock FortiOS appliance for E2E testing.
//!
//! This module provides an in-memory emulation of the CMDB REST API for
//! integration and end-to-end testing. Unlike wiremock which mocks at the
//! HTTP level per-test, this server keeps table state across requests and
//! really applies moves, so a sort can be checked by reading the table
//! back. Every move request is logged, and the N-th one can be made to fail.
//!
//! # Example
//!
//! ```ignore
//! use fortiapi::mock_server::MockServer;
//! use fortiapi::{FortiClient, Policy, Reorder, SortKey, SortSpec};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = FortiClient::new("test-token", server.url()).unwrap();
//!
//!     // Default fixtures hold policies 30, 10, 20
//!     let outcome = Policy::sort(&client, SortSpec::ascending(SortKey::Id)).await.unwrap();
//!     assert_eq!(outcome.moves, 2);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{
    Fixtures, ADDRESS_GROUP_TABLE, CENTRAL_SNAT_TABLE, POLICY_TABLE, PROXY_POLICY_TABLE,
    SERVICE_TABLE,
};
pub use server::MockServer;
pub use state::{MockState, MockTable, MoveRecord, Rejection};
