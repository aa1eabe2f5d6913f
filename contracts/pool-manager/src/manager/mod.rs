pub mod commands;
mod update_params;

pub use update_params::{update_params, validate_params};
