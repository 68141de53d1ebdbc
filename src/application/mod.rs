//! Application services layer.

pub mod access;
pub mod error;
