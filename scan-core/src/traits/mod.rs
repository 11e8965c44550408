pub mod analyzer;
pub mod capture_provider;
pub mod history_store;
pub mod key_value_store;
pub mod scan_delegate;
