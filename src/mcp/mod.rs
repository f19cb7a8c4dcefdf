//! MCP (Model Context Protocol) server and tool types.
//!
//! This module provides an MCP server implementation for the FortiOS API,
//! allowing AI assistants to inspect configuration tables and keep ordered
//! tables sorted.
//!
//! # Example
//!
//! ```no_run
//! use fortiapi::mcp::FortiServer;
//!
//! # fn main() -> fortiapi::Result<()> {
//! let server = FortiServer::from_env()?;
//! // Server can now be used with rmcp transport
//! # Ok(())
//! # }
//! ```

mod params;
mod server;

pub use params::*;
pub use server::FortiServer;
