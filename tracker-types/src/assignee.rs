//! Per-assignee task counts.

use uuid::Uuid;

/// Number of open tasks held by one assignee.
///
/// The backend groups a project's tasks by assignee and reports the nil UUID
/// for tasks nobody holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignedTasks {
    /// Worker holding the tasks, or the nil UUID for unassigned tasks.
    pub assignee: Uuid,
    pub task_count: u64,
}

impl AssignedTasks {
    pub fn new(assignee: Uuid, task_count: u64) -> Self {
        Self {
            assignee,
            task_count,
        }
    }

    /// Tasks not held by any worker.
    pub fn unassigned(task_count: u64) -> Self {
        Self::new(Uuid::nil(), task_count)
    }

    /// True for the reserved "no assignee" entry.
    pub fn is_unassigned(&self) -> bool {
        self.assignee.is_nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_uuid_is_unassigned() {
        assert!(AssignedTasks::unassigned(3).is_unassigned());
        assert!(!AssignedTasks::new(Uuid::from_u128(7), 3).is_unassigned());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_sentinel() {
        let json = r#"{"assignee": "00000000-0000-0000-0000-000000000000", "task_count": 9}"#;
        let a: AssignedTasks = serde_json::from_str(json).unwrap();
        assert!(a.is_unassigned());
        assert_eq!(a.task_count, 9);
    }
}
