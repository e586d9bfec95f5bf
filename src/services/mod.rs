//! Client and host services for test history.

pub mod history_client;
pub mod history_host;

pub use history_client::TestHistoryClient;
pub use history_host::HistoryHost;
