#[cfg(not(target_arch = "wasm32"))]
pub mod multi_test;
