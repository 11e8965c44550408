pub mod scan_session;
pub mod stream_guard;
