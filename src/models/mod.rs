//! Easybill resource models.

mod customer;
mod document;
mod project;

pub use customer::*;
pub use document::*;
pub use project::*;
