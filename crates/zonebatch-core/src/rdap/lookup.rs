use std::path::Path;

use crate::config::{RdapConfig, ZonebatchConfig};
use crate::rate_limit::{
    AdvisoryLock, Clock, DistributedRateLimiter, FileLock, FileRequestLog, RateSettings,
    RequestLog, SystemClock,
};
use crate::scheduler::{ManagerSettings, TaskManager};
use crate::task::{Launcher, ProcessLauncher, TaskError};

use super::error::LookupError;
use super::events::Interval;
use super::fqdn::Fqdn;
use super::sink::{IntervalSink, RDAP_SOURCE};
use super::task::RdapTask;

/// Result of one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Whether the registry knows the name.
    pub found: bool,
    pub interval: Interval,
}

/// Rate-limited RDAP lookups shared by every worker that points at the same lock file.
pub struct RdapLookup<S, L = FileLock, R = FileRequestLog, C = SystemClock, P = ProcessLauncher>
{
    limiter: DistributedRateLimiter<L, R, C>,
    rdap: RdapConfig,
    launcher: P,
    sink: S,
}

impl<S: IntervalSink> RdapLookup<S> {
    pub fn open(lock_path: &Path, cfg: &ZonebatchConfig, sink: S) -> Result<Self, LookupError> {
        let limiter = DistributedRateLimiter::open(lock_path, RateSettings::from(&cfg.rate))?;
        Ok(Self::new(limiter, cfg.rdap.clone(), ProcessLauncher, sink))
    }
}

impl<S, L, R, C, P> RdapLookup<S, L, R, C, P>
where
    S: IntervalSink,
    L: AdvisoryLock,
    R: RequestLog,
    C: Clock,
    P: Launcher,
{
    pub fn new(
        limiter: DistributedRateLimiter<L, R, C>,
        rdap: RdapConfig,
        launcher: P,
        sink: S,
    ) -> Self {
        Self {
            limiter,
            rdap,
            launcher,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Look up one name under the shared lock and rate limit, then record its interval.
    pub fn request(&mut self, fqdn: &Fqdn) -> Result<Registration, LookupError> {
        let Self {
            limiter,
            rdap,
            launcher,
            sink,
        } = self;
        let registration = limiter.throttle(|| run_lookup(rdap, launcher, fqdn))?;
        tracing::debug!(
            %fqdn,
            found = registration.found,
            start = ?registration.interval.start,
            until = ?registration.interval.until,
            "rdap lookup"
        );
        sink.update_fqdn(RDAP_SOURCE, fqdn, &registration.interval)
            .map_err(LookupError::Report)?;
        Ok(registration)
    }
}

/// Run the lookup as the only task of a private manager.
fn run_lookup<P: Launcher>(
    rdap: &RdapConfig,
    launcher: &mut P,
    fqdn: &Fqdn,
) -> Result<Registration, LookupError> {
    let mut task = RdapTask::new(fqdn.clone(), rdap);
    let settings = ManagerSettings {
        idle: rdap.idle(),
        ..ManagerSettings::default()
    };
    let mut manager = TaskManager::with_launcher(settings, launcher);
    manager.add(&mut task);
    manager.execute().map_err(surface_outcome)?;
    drop(manager);

    Ok(Registration {
        found: task.found().unwrap_or(false),
        interval: task.interval().copied().unwrap_or_default(),
    })
}

/// Payload errors come back boxed inside `TaskError::Outcome`; unwrap them.
fn surface_outcome(err: TaskError) -> LookupError {
    match err {
        TaskError::Outcome { command, source } => match source.downcast::<LookupError>() {
            Ok(inner) => *inner,
            Err(source) => LookupError::Task(TaskError::Outcome { command, source }),
        },
        other => LookupError::Task(other),
    }
}
