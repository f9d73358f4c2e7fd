pub mod client;
pub mod worker;

pub use client::{refresh_once, DataFetcher, DataSource, FetchError};
pub use worker::{run_cycle, run_refresh_worker};
