//! Task items and their lifecycle.
//!
//! An [`Item`] keeps its completion date consistent with its status: the
//! date is present exactly when the status is [`Status::Completed`]. Both
//! fields are private and only change through [`Item::set_status`] and the
//! quick actions built on it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Stable identifier of an item (lowercase ULID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn generate() -> Self {
        Self(Ulid::new().to_string().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_ascii_lowercase())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Status::NotStarted => "not_started",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "not_started" | "notstarted" | "todo" => Ok(Status::NotStarted),
            "in_progress" | "inprogress" | "started" => Ok(Status::InProgress),
            "completed" | "complete" | "done" => Ok(Status::Completed),
            _ => Err(Error::InvalidArgument(format!(
                "unknown status '{}' (expected not_started, in_progress or completed)",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidArgument(format!(
                "unknown priority '{}' (expected low, medium or high)",
                s.trim()
            ))),
        }
    }
}

pub(crate) fn normalize_key(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
}

/// Input for [`Item::create`].
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

impl NewItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn due(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// A full edit of an item. `None` leaves the field untouched; `due_date`
/// uses `Some(None)` to clear the due date.
#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
}

impl ItemEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord")]
pub struct Item {
    id: ItemId,
    title: String,
    description: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<DateTime<Utc>>,
    priority: Priority,
    creation_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completion_date: Option<DateTime<Utc>>,
}

/// Wire shape of a stored item, checked before it becomes an [`Item`].
#[derive(Deserialize)]
struct ItemRecord {
    id: ItemId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    priority: Priority,
    creation_date: DateTime<Utc>,
    #[serde(default)]
    completion_date: Option<DateTime<Utc>>,
}

impl TryFrom<ItemRecord> for Item {
    type Error = String;

    fn try_from(record: ItemRecord) -> std::result::Result<Self, Self::Error> {
        let completed = record.status == Status::Completed;
        if completed != record.completion_date.is_some() {
            return Err(format!(
                "item {} has status '{}' but {} completion date",
                record.id,
                record.status.key(),
                if completed { "no" } else { "a" }
            ));
        }
        Ok(Item {
            id: record.id,
            title: record.title,
            description: record.description,
            status: record.status,
            due_date: record.due_date,
            priority: record.priority,
            creation_date: record.creation_date,
            completion_date: record.completion_date,
        })
    }
}

impl Item {
    /// Build a new item stamped with `now`. An item created as completed is
    /// considered completed at creation time.
    pub fn create(new: NewItem, now: DateTime<Utc>) -> Self {
        let completion_date = (new.status == Status::Completed).then_some(now);
        Self {
            id: ItemId::generate(),
            title: new.title,
            description: new.description,
            status: new.status,
            due_date: new.due_date,
            priority: new.priority,
            creation_date: now,
            completion_date,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn completion_date(&self) -> Option<DateTime<Utc>> {
        self.completion_date
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Past due and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && !self.is_completed(),
            None => false,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Change status, keeping the completion date in step. Re-completing a
    /// completed item keeps its first completion date.
    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        match status {
            Status::Completed => {
                if self.status != Status::Completed {
                    self.completion_date = Some(now);
                }
            }
            Status::NotStarted | Status::InProgress => self.completion_date = None,
        }
        self.status = status;
    }

    pub fn mark_complete(&mut self, now: DateTime<Utc>) {
        self.set_status(Status::Completed, now);
    }

    /// Move a not-started item into progress.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.status != Status::NotStarted {
            return Err(Error::InvalidTransition {
                from: self.status.to_string(),
                to: Status::InProgress.to_string(),
            });
        }
        self.set_status(Status::InProgress, now);
        Ok(())
    }

    pub fn apply_edit(&mut self, edit: ItemEdit, now: DateTime<Utc>) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(due_date) = edit.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = edit.priority {
            self.priority = priority;
        }
        if let Some(status) = edit.status {
            self.set_status(status, now);
        }
    }

    #[cfg(test)]
    pub(crate) fn with_id(mut self, id: &str) -> Self {
        self.id = ItemId::from(id);
        self
    }
}
