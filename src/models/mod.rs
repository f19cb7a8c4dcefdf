//! FortiOS CMDB model types.

mod address_group;
mod central_snat;
mod common;
mod policy;
mod proxy_policy;
mod service;

pub use address_group::*;
pub use central_snat::*;
pub use common::*;
pub use policy::*;
pub use proxy_policy::*;
pub use service::*;
