//! Project metadata as returned by `/project/get/{id}`.

/// A task_tracker project.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub priority: i64,
    pub motd: String,
    pub clone_url: String,
    pub git_repo: String,
    pub version: String,
    pub public: bool,
    pub hidden: bool,
    pub paused: bool,
    /// Project that receives this project's closed tasks, 0 for none.
    pub chain: i64,
    /// Task assignments per second allowed by the backend.
    pub assign_rate: f64,
    /// Task submissions per second allowed by the backend.
    pub submit_rate: f64,
}

impl Project {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }
}
