pub mod console_notifier;
pub mod http_fetcher;
pub mod memory_store;
pub mod multi_notifier;
pub mod slack_notifier;
pub mod sqlite_store;
