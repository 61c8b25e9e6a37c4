//! Shared response helpers.

mod response;

pub use response::NoContent;
