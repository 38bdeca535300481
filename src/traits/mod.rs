//! Trait definitions for Easybill operations.
//!
//! Each resource type implements the traits it supports, encapsulating
//! endpoint differences in the implementations.

mod get;
mod list;

pub use get::Get;
pub use list::List;
