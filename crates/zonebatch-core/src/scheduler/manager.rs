//! Bounded out-of-process task manager.
//!
//! Single-threaded poll loop: every iteration polls all tasks, launches at most
//! one waiting task if a slot is free, optionally reports progress, then
//! sleeps. Parallelism comes only from the launched processes.

use std::thread;
use std::time::{Duration, Instant};

use crate::config::ZonebatchConfig;
use crate::task::{Launcher, ProcessLauncher, Scheduled, Task, TaskError, TaskLevel};

use super::direction::Direction;
use super::snapshot::Snapshot;

/// Loop parameters for one [`TaskManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSettings {
    /// Logged at start and finish when set.
    pub label: Option<String>,
    /// Maximum number of BUSY tasks. Clamped to at least 1.
    pub core_total: usize,
    /// Sleep between poll iterations.
    pub idle: Duration,
    /// Progress interval; `None` disables reporting.
    pub track: Option<Duration>,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            label: None,
            core_total: 1,
            idle: Duration::from_secs(1),
            track: None,
        }
    }
}

impl ManagerSettings {
    pub fn from_config(cfg: &ZonebatchConfig) -> Self {
        Self {
            label: None,
            core_total: cfg.core_total.max(1),
            idle: cfg.idle(),
            track: cfg.track_freq_secs.map(Duration::from_secs),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_core_total(mut self, core_total: usize) -> Self {
        self.core_total = core_total.max(1);
        self
    }
}

type ProgressFn = Box<dyn FnMut(&Direction)>;

/// Owns a batch of tasks and runs them with at most `core_total` in flight.
pub struct TaskManager<T, L = ProcessLauncher> {
    settings: ManagerSettings,
    tasks: Vec<Scheduled<T>>,
    launcher: L,
    on_progress: Option<ProgressFn>,
}

impl<T: Task> TaskManager<T, ProcessLauncher> {
    pub fn new(settings: ManagerSettings) -> Self {
        Self::with_launcher(settings, ProcessLauncher)
    }
}

impl<T: Task, L: Launcher> TaskManager<T, L> {
    pub fn with_launcher(settings: ManagerSettings, launcher: L) -> Self {
        Self {
            settings,
            tasks: Vec::new(),
            launcher,
            on_progress: None,
        }
    }

    /// Called with every progress report, in addition to the log line.
    pub fn on_progress(&mut self, f: impl FnMut(&Direction) + 'static) {
        self.on_progress = Some(Box::new(f));
    }

    /// Register a task. Tasks must be added before [`execute`](Self::execute).
    pub fn add_task(&mut self, task: Scheduled<T>) {
        self.tasks.push(task);
    }

    /// Register a task with no marker and no log.
    pub fn add(&mut self, task: T) {
        self.add_task(Scheduled::new(task));
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn tasks(&self) -> &[Scheduled<T>] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Scheduled<T>> {
        self.tasks
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.tasks.iter().map(Scheduled::level))
    }

    /// Run until every task is DONE. The first fatal task error stops the
    /// batch; processes already running are left to finish on their own.
    pub fn execute(&mut self) -> Result<(), TaskError> {
        let core_total = self.settings.core_total.max(1);
        if let Some(label) = &self.settings.label {
            tracing::info!("Start: {}", label);
        }

        self.update()?;
        let head = self.snapshot();
        let mut tracked_at: Option<Instant> = None;
        loop {
            self.update()?;
            let tail = self.snapshot();
            if tail.left_total() == 0 {
                break;
            }

            if tail.busy_total() < core_total && tail.wait_total() > 0 {
                self.launch_next()?;
            }

            if let Some(track) = self.settings.track {
                if tracked_at.map_or(true, |at| at.elapsed() >= track) {
                    tracked_at = Some(Instant::now());
                    let direction = Direction::between(core_total, &head, &tail);
                    self.report(&direction);
                }
            }

            if !self.settings.idle.is_zero() {
                thread::sleep(self.settings.idle);
            }
        }

        if let Some(label) = &self.settings.label {
            tracing::info!("Finish: {}", label);
        }
        Ok(())
    }

    fn update(&mut self) -> Result<(), TaskError> {
        for task in &mut self.tasks {
            task.update()?;
        }
        Ok(())
    }

    /// Launch the first WAIT task in registration order.
    fn launch_next(&mut self) -> Result<(), TaskError> {
        let Some(task) = self
            .tasks
            .iter_mut()
            .find(|t| t.level() == TaskLevel::Wait)
        else {
            return Ok(());
        };
        task.launch(&mut self.launcher)?;
        if let Some(command) = task.command() {
            tracing::debug!(command = %crate::task::present_command(command), "launched");
        }
        Ok(())
    }

    fn report(&mut self, direction: &Direction) {
        tracing::info!("{}", direction.summary());
        if let Some(f) = self.on_progress.as_mut() {
            f(direction);
        }
    }
}
