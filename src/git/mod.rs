pub mod history;

pub use history::{fetch_log, fetch_repository_log, log_args};
