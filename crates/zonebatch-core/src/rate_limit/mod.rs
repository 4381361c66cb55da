//! Cross-process mutual exclusion and sliding-window throttling.
//!
//! Every cooperating process points at the same lock file. Holding the
//! `flock` on it grants the right to read and rewrite the request log stored
//! in its content, and to run one action.

mod clock;
mod error;
mod limiter;
mod lock;
mod log;
mod memory;

pub use clock::{Clock, SystemClock};
pub use error::RateError;
pub use limiter::{DistributedRateLimiter, RateSettings};
pub use lock::{bootstrap, AdvisoryLock, FileLock};
pub use log::{format_stamp, parse_stamp, prune, FileRequestLog, RequestLog};
pub use memory::{MemoryLock, MemoryRequestLog};
