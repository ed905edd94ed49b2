//! Command implementations.

mod chat;
mod district;
mod extract;
mod ingest;
mod query;

pub use chat::execute_chat;
pub use district::execute_district;
pub use extract::execute_extract;
pub use ingest::execute_ingest;
pub use query::{execute_analytics, execute_categories, execute_history, execute_latest};
