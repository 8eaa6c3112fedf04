//! Entry model and the request/event payloads shared by the service and the
//! transport layer.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// Processing state of a queue entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    #[default]
    Pending,
    Done,
    Skipped,
}

impl EntryStatus {
    pub const ALL: [EntryStatus; 3] =
        [EntryStatus::Pending, EntryStatus::Done, EntryStatus::Skipped];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Done => "DONE",
            EntryStatus::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = QueueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| {
                QueueError::validation(format!(
                    "invalid status '{value}', expected one of PENDING, DONE, SKIPPED"
                ))
            })
    }
}

/// A single song request as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new entry. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub body: String,
    pub status: EntryStatus,
}

/// Validated partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<EntryStatus>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.status.is_none()
    }
}

/// Wire form of a create call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CreateEntryRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            status: None,
        }
    }
}

impl TryFrom<CreateEntryRequest> for NewEntry {
    type Error = QueueError;

    fn try_from(request: CreateEntryRequest) -> Result<Self, Self::Error> {
        let status = match request.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => EntryStatus::default(),
        };

        Ok(Self {
            title: require_text("title", request.title)?,
            body: require_text("body", request.body)?,
            status,
        })
    }
}

/// Wire form of an update call; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UpdateEntryRequest {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

impl TryFrom<UpdateEntryRequest> for EntryPatch {
    type Error = QueueError;

    fn try_from(request: UpdateEntryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: request
                .title
                .map(|title| require_text("title", title))
                .transpose()?,
            body: request
                .body
                .map(|body| require_text("body", body))
                .transpose()?,
            status: request.status.as_deref().map(str::parse).transpose()?,
        })
    }
}

fn require_text(field: &str, value: String) -> Result<String, QueueError> {
    if value.trim().is_empty() {
        return Err(QueueError::validation(format!(
            "{field} must not be empty"
        )));
    }
    if value.contains('\0') {
        return Err(QueueError::validation(format!(
            "{field} must not contain NUL characters"
        )));
    }
    Ok(value)
}

/// Change notification pushed to every connected viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent {
    pub message: String,
    pub entry: Option<Entry>,
}

impl QueueEvent {
    pub fn created(entry: Entry) -> Self {
        Self {
            message: format!("New song added: {}", entry.title),
            entry: Some(entry),
        }
    }

    pub fn updated(entry: Entry) -> Self {
        Self {
            message: format!("Song updated: {}", entry.title),
            entry: Some(entry),
        }
    }

    pub fn cleared() -> Self {
        Self {
            message: "All songs cleared from database".to_string(),
            entry: None,
        }
    }
}
