//! Response envelope and endpoint payloads.

use core::fmt;

use crate::{AssignedTasks, MonitoringSnapshot, Project};

/// Envelope wrapping every backend response.
///
/// ```json
/// {"ok": true, "content": {"snapshots": [...]}}
/// {"ok": false, "message": "Invalid request"}
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub message: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub content: Option<T>,
}

impl<T: Default> ApiResponse<T> {
    /// Successful response carrying `content`.
    pub fn success(content: T) -> Self {
        Self {
            ok: true,
            message: None,
            content: Some(content),
        }
    }

    /// Failed response carrying an error message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            content: None,
        }
    }

    /// Unwrap the payload, or the backend's rejection message.
    ///
    /// An `ok` response without content yields `T::default()`; the backend
    /// omits empty payloads.
    pub fn into_content(self) -> Result<T, ApiRejection> {
        if self.ok {
            Ok(self.content.unwrap_or_default())
        } else {
            Err(ApiRejection {
                message: self.message.unwrap_or_else(|| "request rejected".to_string()),
            })
        }
    }
}

/// An `ok: false` answer from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRejection {
    pub message: String,
}

impl fmt::Display for ApiRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiRejection {}

/// Payload of `/project/monitoring/{id}?count=n`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotsContent {
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "null_as_empty"))]
    pub snapshots: Vec<MonitoringSnapshot>,
}

/// Answer of `/project/monitoring/{id}?count=n`.
///
/// Unlike the other endpoints the backend puts `snapshots` at the top level
/// instead of inside `content`. Both shapes are accepted.
///
/// ```json
/// {"ok": true, "snapshots": [...]}
/// {"ok": true, "content": {"snapshots": [...]}}
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotsResponse {
    pub ok: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub message: Option<String>,
    /// `None` when the field is absent; `null` decodes to an empty list.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "null_as_present",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub snapshots: Option<Vec<MonitoringSnapshot>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub content: Option<SnapshotsContent>,
}

impl SnapshotsResponse {
    /// The snapshot list from whichever shape carried it.
    ///
    /// `Ok(None)` means an `ok` answer with no snapshot payload at all.
    pub fn into_snapshots(self) -> Result<Option<Vec<MonitoringSnapshot>>, ApiRejection> {
        if !self.ok {
            return Err(ApiRejection {
                message: self.message.unwrap_or_else(|| "request rejected".to_string()),
            });
        }
        Ok(self.snapshots.or(self.content.map(|c| c.snapshots)))
    }
}

/// Payload of `/project/assignees/{id}`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssigneesContent {
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "null_as_empty"))]
    pub assignees: Vec<AssignedTasks>,
}

/// Payload of `/project/get/{id}`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectContent {
    #[cfg_attr(feature = "serde", serde(default))]
    pub project: Option<Project>,
}

// The backend serializes empty slices as `null`.
#[cfg(feature = "serde")]
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// Present-but-null becomes `Some(vec![])`; only an absent field stays `None`.
#[cfg(feature = "serde")]
fn null_as_present<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Some(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default()))
}
