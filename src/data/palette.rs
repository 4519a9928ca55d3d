//! Fixed chart colors and the assignee color policy.

use rand::Rng;
use serde::Deserialize;
use tracker_types::TaskStatus;
use uuid::Uuid;

/// Color reserved for unassigned tasks.
pub const UNASSIGNED_COLOR: &str = "#AAAAAA";

/// Twelve-color "Paired" qualitative scheme used for assignees.
pub const ASSIGNEE_PALETTE: [&str; 12] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
    "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];

/// Color of a status series. Independent of data so identity is stable across refreshes.
pub fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::New => "#31a6a2",
        TaskStatus::Failed => "#8c2627",
        TaskStatus::Closed => "#62f24b",
        TaskStatus::AwaitingVerification => "#e0a526",
    }
}

/// How assignees are mapped to palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPolicy {
    /// Hash of the assignee id: the same worker keeps its color across refreshes.
    #[default]
    Stable,
    /// Fresh pseudo-random pick on every build. Colors change between refreshes.
    #[serde(alias = "random")]
    Shuffled,
}

impl ColorPolicy {
    /// Pick a palette color for an assignee.
    pub fn color_for(&self, assignee: &Uuid) -> &'static str {
        if assignee.is_nil() {
            return UNASSIGNED_COLOR;
        }
        let index = match self {
            ColorPolicy::Stable => (fnv1a(assignee.as_bytes()) % ASSIGNEE_PALETTE.len() as u64) as usize,
            ColorPolicy::Shuffled => rand::rng().random_range(0..ASSIGNEE_PALETTE.len()),
        };
        ASSIGNEE_PALETTE[index]
    }
}

impl std::str::FromStr for ColorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stable" => Ok(ColorPolicy::Stable),
            "shuffled" | "random" => Ok(ColorPolicy::Shuffled),
            other => Err(format!("unknown color policy: {}", other)),
        }
    }
}

// 64-bit FNV-1a; fixed across platforms and toolchains unlike std's hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    bytes.iter().fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}
