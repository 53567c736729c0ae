//! Search, filter and sort over an item collection.
//!
//! [`view`] is pure: it borrows the collection, applies the search text,
//! the status filter and the priority filter in that order, then sorts the
//! survivors with a stable sort so equal keys keep their input order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::{normalize_key, Item, Priority, Status};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    DueDate,
    Priority,
    Title,
    Status,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::DueDate,
        SortOption::Priority,
        SortOption::Title,
        SortOption::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortOption::DueDate => "Due Date",
            SortOption::Priority => "Priority",
            SortOption::Title => "Title",
            SortOption::Status => "Status",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "due_date" | "duedate" | "due" => Ok(SortOption::DueDate),
            "priority" => Ok(SortOption::Priority),
            "title" => Ok(SortOption::Title),
            "status" => Ok(SortOption::Status),
            _ => Err(Error::InvalidArgument(format!(
                "unknown sort '{}' (expected due_date, priority, title or status)",
                s.trim()
            ))),
        }
    }
}

/// Parameters of a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub search: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub sort: SortOption,
}

impl ItemQuery {
    pub fn sorted_by(sort: SortOption) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// True when a status or priority filter narrows the view.
    pub fn is_filtered(&self) -> bool {
        self.status.is_some() || self.priority.is_some()
    }

    /// Drop search text and both filters; the sort stays.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.status = None;
        self.priority = None;
    }
}

pub fn view<'a>(items: &'a [Item], query: &ItemQuery) -> Vec<&'a Item> {
    let needle = query.search.to_lowercase();
    let mut visible: Vec<&Item> = items
        .iter()
        .filter(|item| needle.is_empty() || matches_search(item, &needle))
        .filter(|item| query.status.map_or(true, |status| item.status() == status))
        .filter(|item| {
            query
                .priority
                .map_or(true, |priority| item.priority() == priority)
        })
        .collect();
    sort_items(&mut visible, query.sort);
    visible
}

pub fn sort_items(items: &mut [&Item], sort: SortOption) {
    items.sort_by(|left, right| compare(left, right, sort));
}

fn compare(left: &Item, right: &Item, sort: SortOption) -> Ordering {
    match sort {
        SortOption::DueDate => match (left.due_date(), right.due_date()) {
            (Some(left_due), Some(right_due)) => left_due.cmp(&right_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => left.creation_date().cmp(&right.creation_date()),
        },
        SortOption::Priority => priority_rank(left.priority())
            .cmp(&priority_rank(right.priority()))
            .then_with(|| left.title().cmp(right.title())),
        SortOption::Title => left.title().cmp(right.title()),
        SortOption::Status => status_rank(left.status())
            .cmp(&status_rank(right.status()))
            .then_with(|| left.title().cmp(right.title())),
    }
}

fn matches_search(item: &Item, needle: &str) -> bool {
    item.title().to_lowercase().contains(needle)
        || item.description().to_lowercase().contains(needle)
}

fn priority_rank(priority: Priority) -> usize {
    match priority {
        Priority::High => 0,
        Priority::Medium => 1,
        Priority::Low => 2,
    }
}

fn status_rank(status: Status) -> usize {
    match status {
        Status::InProgress => 0,
        Status::NotStarted => 1,
        Status::Completed => 2,
    }
}
