pub mod config;
pub mod domain;
mod error;
pub mod ingester;
pub mod store;
pub mod transformer;

#[cfg(test)]
mod tests;

pub use crate::error::IngestError;
