pub mod mock_module;
mod unit_tests;
