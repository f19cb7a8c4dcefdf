//! HTTP request handlers for the mock server.

pub mod cmdb;

pub use cmdb::*;
