use std::path::Path;
use std::time::Duration;

use rand::Rng;

use crate::config::RateConfig;

use super::clock::{Clock, SystemClock};
use super::error::RateError;
use super::lock::{AdvisoryLock, FileLock};
use super::log::{prune, FileRequestLog, RequestLog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSettings {
    /// Actions allowed to begin within one window. Clamped to at least 1.
    pub request_per_window: usize,
    pub window: Duration,
    pub backoff_min: Duration,
    pub backoff_max: Duration,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self::from(&RateConfig::default())
    }
}

impl From<&RateConfig> for RateSettings {
    fn from(cfg: &RateConfig) -> Self {
        Self {
            request_per_window: cfg.request_per_window,
            window: Duration::from_secs(cfg.window_secs),
            backoff_min: Duration::from_millis(cfg.backoff_min_ms),
            backoff_max: Duration::from_millis(cfg.backoff_max_ms),
        }
    }
}

/// Serializes an action across processes and caps how many may begin per window.
///
/// The lock is held from the rate check until the action returns, so at most
/// one action runs system-wide and the request log is only touched by the holder.
pub struct DistributedRateLimiter<L, R, C = SystemClock> {
    lock: L,
    log: R,
    clock: C,
    settings: RateSettings,
}

impl DistributedRateLimiter<FileLock, FileRequestLog, SystemClock> {
    /// Limiter over one shared file that is both the lock and the request log.
    pub fn open(path: &Path, settings: RateSettings) -> Result<Self, RateError> {
        let lock = FileLock::open(path)?;
        let log = FileRequestLog::new(path);
        Ok(Self::new(lock, log, SystemClock, settings))
    }
}

impl<L: AdvisoryLock, R: RequestLog, C: Clock> DistributedRateLimiter<L, R, C> {
    pub fn new(lock: L, log: R, clock: C, settings: RateSettings) -> Self {
        Self {
            lock,
            log,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &RateSettings {
        &self.settings
    }

    /// Wait for the lock and a free slot, record the start, run `action`, release.
    pub fn throttle<T, E, F>(&mut self, action: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RateError>,
    {
        self.wait_lock()?;
        let result = self.wait_rate().map_err(E::from).and_then(|()| action());
        let released = self.lock.release();
        let value = result?;
        released?;
        Ok(value)
    }

    fn wait_lock(&mut self) -> Result<(), RateError> {
        while !self.lock.try_acquire()? {
            let pause = self.backoff();
            tracing::debug!("lock busy, retry in {:?}", pause);
            self.clock.sleep(pause);
        }
        Ok(())
    }

    fn wait_rate(&mut self) -> Result<(), RateError> {
        let limit = self.settings.request_per_window.max(1);
        let mut stamps = self.log.read()?;
        loop {
            let now = self.clock.now();
            stamps = prune(stamps, now, self.settings.window);
            if stamps.len() < limit {
                stamps.push(now);
                return self.log.write(&stamps);
            }
            let pause = self.backoff();
            tracing::debug!(
                fresh = stamps.len(),
                limit,
                "rate window full, retry in {:?}",
                pause
            );
            self.clock.sleep(pause);
        }
    }

    fn backoff(&self) -> Duration {
        let a = self.settings.backoff_min.as_millis() as u64;
        let b = self.settings.backoff_max.as_millis() as u64;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }
}
