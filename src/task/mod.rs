//! Task and user domain model shared by the API client, board, and CLI

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Board column identifiers, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Backlog,
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Backlog, Status::Todo, Status::InProgress, Status::Done];

    /// Column heading shown in the TUI and CLI tables.
    pub fn title(&self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    /// Wire identifier, as the server stores it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Backlog => "backlog",
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        match s.to_lowercase().as_str() {
            "backlog" => Some(Status::Backlog),
            "todo" => Some(Status::Todo),
            "in_progress" | "in-progress" | "inprogress" => Some(Status::InProgress),
            "done" => Some(Status::Done),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        Status::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Account record as the server reports it. Embedded in task responses for
/// the assignee and creator; timestamps are naive because the server emits
/// ISO strings without an offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// A task as the server reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Option<User>,
    #[serde(default)]
    pub created_by: Option<User>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Task {
    pub fn assignee_name(&self) -> Option<&str> {
        self.assigned_to.as_ref().map(|u| u.full_name.as_str())
    }
}

/// The write shape for create and full-update requests.
///
/// `assigned_to` and `due_date` serialize to explicit `null` when unset;
/// the server treats a null assignee as "unassign", so the keys must never
/// be omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<i64>,
}

impl TaskPayload {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: String::new(),
            status: Status::default(),
            priority: Priority::default(),
            due_date: None,
            assigned_to: None,
        }
    }

    /// Seeds a payload from an existing task, for edits.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            assigned_to: task.assigned_to.as_ref().map(|u| u.id),
        }
    }
}
