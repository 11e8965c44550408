pub mod config;
pub mod error;
pub mod event;
pub mod history_entry;
pub mod image;
pub mod scan_record;
pub mod state;
