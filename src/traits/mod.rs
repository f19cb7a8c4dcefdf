//! Trait definitions for FortiOS operations.
//!
//! Each entity type implements the traits it supports, encapsulating
//! API differences in the implementations.

mod create;
mod delete;
mod get;
mod list;
mod reorder;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::List;
pub use reorder::Reorder;
pub use update::Update;
