//! MonitoringSnapshot - one point-in-time sample of a project's task counters.

/// Task counters of one project at one instant.
///
/// The backend takes one snapshot per project every monitoring interval and
/// keeps a bounded history of them. Timestamps are whole seconds since the
/// Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitoringSnapshot {
    /// Seconds since the Unix epoch when the snapshot was taken.
    #[cfg_attr(feature = "serde", serde(rename = "time_stamp"))]
    pub timestamp: i64,

    /// Tasks waiting to be assigned.
    #[cfg_attr(feature = "serde", serde(default))]
    pub new_task_count: u64,

    /// Tasks that ran out of retries.
    #[cfg_attr(feature = "serde", serde(default))]
    pub failed_task_count: u64,

    /// Tasks completed successfully.
    #[cfg_attr(feature = "serde", serde(default))]
    pub closed_task_count: u64,

    /// Tasks submitted by workers but waiting on verification.
    #[cfg_attr(feature = "serde", serde(default))]
    pub awaiting_verification_count: u64,

    /// Workers holding an access grant on the project.
    #[cfg_attr(feature = "serde", serde(default))]
    pub worker_access_count: u64,
}

impl MonitoringSnapshot {
    /// Create an all-zero snapshot at the given timestamp.
    pub fn at(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> MonitoringSnapshotBuilder {
        MonitoringSnapshotBuilder::default()
    }

    /// Counter value for one task status.
    pub fn count(&self, status: TaskStatus) -> u64 {
        match status {
            TaskStatus::New => self.new_task_count,
            TaskStatus::Failed => self.failed_task_count,
            TaskStatus::Closed => self.closed_task_count,
            TaskStatus::AwaitingVerification => self.awaiting_verification_count,
        }
    }

    /// Sum of the four task counters, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        TaskStatus::ALL.iter().fold(0u64, |acc, s| acc.saturating_add(self.count(*s)))
    }

    /// True when every task counter is zero.
    pub fn is_idle(&self) -> bool {
        TaskStatus::ALL.iter().all(|s| self.count(*s) == 0)
    }
}

/// The task status categories tracked by a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TaskStatus {
    New,
    Failed,
    Closed,
    AwaitingVerification,
}

impl TaskStatus {
    /// All statuses, in display order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::New,
        TaskStatus::Failed,
        TaskStatus::Closed,
        TaskStatus::AwaitingVerification,
    ];

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::New => "New",
            TaskStatus::Failed => "Failed",
            TaskStatus::Closed => "Closed",
            TaskStatus::AwaitingVerification => "Awaiting verification",
        }
    }
}

/// Builder for `MonitoringSnapshot`.
#[derive(Debug, Default)]
pub struct MonitoringSnapshotBuilder {
    inner: MonitoringSnapshot,
}

impl MonitoringSnapshotBuilder {
    pub fn timestamp(mut self, ts: i64) -> Self {
        self.inner.timestamp = ts;
        self
    }

    pub fn new_tasks(mut self, n: u64) -> Self {
        self.inner.new_task_count = n;
        self
    }

    pub fn failed_tasks(mut self, n: u64) -> Self {
        self.inner.failed_task_count = n;
        self
    }

    pub fn closed_tasks(mut self, n: u64) -> Self {
        self.inner.closed_task_count = n;
        self
    }

    pub fn awaiting_verification(mut self, n: u64) -> Self {
        self.inner.awaiting_verification_count = n;
        self
    }

    pub fn worker_access(mut self, n: u64) -> Self {
        self.inner.worker_access_count = n;
        self
    }

    pub fn build(self) -> MonitoringSnapshot {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_counters() {
        let s = MonitoringSnapshot::builder()
            .timestamp(160)
            .new_tasks(5)
            .failed_tasks(1)
            .closed_tasks(70)
            .awaiting_verification(2)
            .worker_access(3)
            .build();

        assert_eq!(s.timestamp, 160);
        assert_eq!(s.count(TaskStatus::New), 5);
        assert_eq!(s.count(TaskStatus::Failed), 1);
        assert_eq!(s.count(TaskStatus::Closed), 70);
        assert_eq!(s.count(TaskStatus::AwaitingVerification), 2);
        assert_eq!(s.total(), 78);
    }

    #[test]
    fn test_idle_ignores_worker_access() {
        let s = MonitoringSnapshot::builder().timestamp(1).worker_access(4).build();
        assert!(s.is_idle());

        let s = MonitoringSnapshot::builder().timestamp(1).awaiting_verification(1).build();
        assert!(!s.is_idle());
    }

    #[test]
    fn test_total_saturates() {
        let s = MonitoringSnapshot::builder().timestamp(1).new_tasks(u64::MAX).closed_tasks(1).build();
        assert_eq!(s.total(), u64::MAX);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_backend_json() {
        let json = r#"{
            "new_task_count": 12,
            "failed_task_count": 0,
            "closed_task_count": 340,
            "worker_access_count": 2,
            "awaiting_verification_count": 1,
            "time_stamp": 1546300800
        }"#;

        let s: MonitoringSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(s.timestamp, 1546300800);
        assert_eq!(s.new_task_count, 12);
        assert_eq!(s.closed_task_count, 340);
        assert_eq!(s.awaiting_verification_count, 1);
        assert_eq!(s.worker_access_count, 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_missing_counters_default_to_zero() {
        let s: MonitoringSnapshot = serde_json::from_str(r#"{"time_stamp": 5}"#).unwrap();
        assert_eq!(s, MonitoringSnapshot::at(5));
    }
}
