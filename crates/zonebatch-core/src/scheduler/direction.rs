//! Throughput and ETA between two snapshots.
//!
//! The estimate is `remaining × (elapsed / completed)`. It is withheld until at
//! least `core_total` tasks have completed since the head snapshot; earlier
//! figures mostly measure process start-up. With no completions there is no
//! throughput and therefore no estimate, never an infinite one.

use chrono::{DateTime, Duration, Local};

use super::snapshot::Snapshot;

/// Projected finish for the remaining tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    /// Time still needed at the observed rate. Never negative.
    pub remaining: Duration,
    /// Wall-clock completion time.
    pub complete_at: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct Direction {
    core_total: usize,
    tail: Snapshot,
    achieved: usize,
    estimate: Option<Estimate>,
}

impl Direction {
    pub fn between(core_total: usize, head: &Snapshot, tail: &Snapshot) -> Self {
        let elapsed = (tail.taken_at() - head.taken_at()).max(Duration::zero());
        let achieved = tail.done_total().saturating_sub(head.done_total());
        let estimate = if achieved > 0 && achieved >= core_total {
            let per_task_ms = elapsed.num_milliseconds() as f64 / achieved as f64;
            let remaining_ms = per_task_ms * tail.left_total() as f64;
            let remaining = Duration::milliseconds(remaining_ms.round() as i64);
            Some(Estimate {
                remaining,
                complete_at: tail.taken_at() + remaining,
            })
        } else {
            None
        };
        Self {
            core_total,
            tail: tail.clone(),
            achieved,
            estimate,
        }
    }

    /// The later of the two snapshots.
    pub fn tail(&self) -> &Snapshot {
        &self.tail
    }

    /// Tasks that reached DONE between the two snapshots.
    pub fn achieved(&self) -> usize {
        self.achieved
    }

    pub fn estimate(&self) -> Option<&Estimate> {
        self.estimate.as_ref()
    }

    /// One-line progress summary.
    pub fn summary(&self) -> String {
        let (duration, complete) = match &self.estimate {
            Some(e) => (
                format_duration(e.remaining),
                e.complete_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
            None => ("Calculating".to_string(), "Calculating".to_string()),
        };
        format!(
            "{}% Task: [{} of {}] Core: [{} of {}] Duration: {} Complete: {}",
            self.tail.percent(),
            self.tail.done_total(),
            self.tail.full_total(),
            self.tail.busy_total(),
            self.core_total,
            duration,
            complete
        )
    }
}

/// `H:MM:SS`, with a day prefix once it runs past 24 hours.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    if days > 0 {
        format!("{}d {}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskLevel::{self, Busy, Done, Wait};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Local> {
        Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn snap(done: usize, busy: usize, wait: usize, secs: i64) -> Snapshot {
        let levels = std::iter::repeat(Done)
            .take(done)
            .chain(std::iter::repeat(Busy).take(busy))
            .chain(std::iter::repeat(Wait).take(wait));
        Snapshot::at(levels.collect::<Vec<TaskLevel>>(), at(secs))
    }

    #[test]
    fn no_estimate_until_core_total_tasks_completed() {
        let head = snap(0, 0, 10, 0);
        let tail = snap(1, 2, 7, 30);
        let d = Direction::between(2, &head, &tail);
        assert_eq!(d.achieved(), 1);
        assert!(d.estimate().is_none());
        assert!(d.summary().ends_with("Duration: Calculating Complete: Calculating"));
    }

    #[test]
    fn estimate_scales_remaining_by_average_task_time() {
        let head = snap(0, 0, 10, 0);
        let tail = snap(2, 2, 6, 60);
        let d = Direction::between(2, &head, &tail);
        let e = d.estimate().expect("two completions with core_total 2");
        // 30s per task, 8 left.
        assert_eq!(e.remaining, Duration::seconds(240));
        assert_eq!(e.complete_at, at(300));
    }

    #[test]
    fn zero_throughput_yields_no_estimate() {
        let head = snap(0, 1, 4, 0);
        let tail = snap(0, 1, 4, 3_600);
        let d = Direction::between(1, &head, &tail);
        assert!(d.estimate().is_none());
    }

    #[test]
    fn faster_throughput_gives_shorter_estimate() {
        let head = snap(0, 0, 20, 0);
        let slow = Direction::between(1, &head, &snap(2, 1, 17, 100));
        let fast = Direction::between(1, &head, &snap(4, 1, 15, 100));
        let slow = slow.estimate().unwrap().remaining;
        let fast = fast.estimate().unwrap().remaining;
        assert!(fast < slow);
        assert!(fast >= Duration::zero());
    }

    #[test]
    fn finished_batch_estimates_zero_remaining() {
        let head = snap(0, 0, 3, 0);
        let tail = snap(3, 0, 0, 9);
        let d = Direction::between(2, &head, &tail);
        assert_eq!(d.estimate().unwrap().remaining, Duration::zero());
    }

    #[test]
    fn summary_line_layout() {
        let head = snap(0, 0, 4, 0);
        let tail = snap(2, 1, 1, 20);
        let d = Direction::between(1, &head, &tail);
        assert_eq!(
            d.summary(),
            format!(
                "50% Task: [2 of 4] Core: [1 of 1] Duration: 0:00:20 Complete: {}",
                at(40).format("%Y-%m-%d %H:%M:%S")
            )
        );
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::seconds(5)), "0:00:05");
        assert_eq!(format_duration(Duration::seconds(3_725)), "1:02:05");
        assert_eq!(format_duration(Duration::seconds(90_061)), "1d 1:01:01");
        assert_eq!(format_duration(Duration::seconds(-3)), "0:00:00");
    }
}
