pub mod file_store;
pub mod history_ledger;
pub mod memory_store;
