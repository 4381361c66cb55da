pub mod config;
pub mod logging;
pub mod pack;
pub mod rate_limit;
pub mod rdap;
pub mod scheduler;
pub mod task;
