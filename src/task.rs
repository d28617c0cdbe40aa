//! Task records and the pure transforms that mutate a task list.
//!
//! A task list is an ordered `Vec<Task>`, newest first. Every transform takes
//! the current list by reference and returns a new one; existing records are
//! never edited in place. Transforms that touch a task refresh its
//! `updated_at`, clamped so that it never moves backwards.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Length of the random part of a task id
const ID_SUFFIX_LEN: usize = 9;
const ID_SUFFIX_CHARSET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority '{}': must be low, medium, or high",
                s
            ))),
        }
    }
}

/// Which tasks the list view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStatus {
    #[default]
    All,
    Completed,
    Pending,
}

impl FilterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterStatus::All => "all",
            FilterStatus::Completed => "completed",
            FilterStatus::Pending => "pending",
        }
    }

    /// Whether a task with the given completion flag passes this filter
    pub fn matches(self, completed: bool) -> bool {
        match self {
            FilterStatus::All => true,
            FilterStatus::Completed => completed,
            FilterStatus::Pending => !completed,
        }
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterStatus::All),
            "completed" => Ok(FilterStatus::Completed),
            "pending" => Ok(FilterStatus::Pending),
            _ => Err(Error::InvalidArgument(format!(
                "invalid filter '{}': must be all, completed, or pending",
                s
            ))),
        }
    }
}

/// One to-do item, as persisted under the `tasks` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    /// Milliseconds since the Unix epoch; never less than `created_at`
    pub updated_at: i64,
}

impl Task {
    pub fn new(id: String, title: String, priority: Priority, now: i64) -> Self {
        Self {
            id,
            title,
            completed: false,
            priority,
            created_at: now,
            updated_at: now,
        }
    }

    fn touched(&self, now: i64) -> Self {
        Self {
            updated_at: now.max(self.updated_at),
            ..self.clone()
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a task id of the form `<millis>-<9 base36 chars>`
///
/// The suffix comes from a ULID's random bits. Ids already present in
/// `existing` are never returned.
pub fn generate_id(now: i64, existing: &[Task]) -> String {
    loop {
        let id = format!("{}-{}", now, random_suffix(Ulid::new().random()));
        if !existing.iter().any(|task| task.id == id) {
            return id;
        }
    }
}

fn random_suffix(mut bits: u128) -> String {
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(ID_SUFFIX_CHARSET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    suffix
}

/// Trim a user-supplied title; `None` if nothing is left
///
/// Callers validate titles with this before `add` or `edit_title`; the
/// transforms below accept whatever they are given.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn position(tasks: &[Task], id: &str) -> Option<usize> {
    tasks.iter().position(|task| task.id == id)
}

/// New list with `task` in front
pub fn prepend(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.push(task);
    next.extend_from_slice(tasks);
    next
}

fn map_matching(tasks: &[Task], id: &str, f: impl Fn(&Task) -> Task) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| if task.id == id { f(task) } else { task.clone() })
        .collect()
}

/// New list with the completion flag of `id` flipped
pub fn toggled(tasks: &[Task], id: &str, now: i64) -> Vec<Task> {
    map_matching(tasks, id, |task| Task {
        completed: !task.completed,
        ..task.touched(now)
    })
}

/// New list without `id`
pub fn without(tasks: &[Task], id: &str) -> Vec<Task> {
    tasks.iter().filter(|task| task.id != id).cloned().collect()
}

/// New list with the title of `id` replaced
pub fn retitled(tasks: &[Task], id: &str, title: &str, now: i64) -> Vec<Task> {
    map_matching(tasks, id, |task| Task {
        title: title.to_string(),
        ..task.touched(now)
    })
}

/// New list with the priority of `id` replaced
pub fn reprioritized(tasks: &[Task], id: &str, priority: Priority, now: i64) -> Vec<Task> {
    map_matching(tasks, id, |task| Task {
        priority,
        ..task.touched(now)
    })
}

/// Resolve user input to a task id
///
/// Accepts a full id, a unique prefix of an id, or a unique prefix of the
/// random suffix after the `-`. Returns `Ok(None)` when nothing matches.
pub fn resolve_id(tasks: &[Task], input: &str) -> Result<Option<String>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
    }
    let needle = trimmed.to_ascii_lowercase();

    if let Some(task) = tasks.iter().find(|task| task.id == trimmed) {
        return Ok(Some(task.id.clone()));
    }

    let mut matches: Vec<&str> = tasks
        .iter()
        .filter(|task| {
            let id = task.id.to_ascii_lowercase();
            let suffix = id.split_once('-').map(|(_, s)| s).unwrap_or("");
            id.starts_with(&needle) || suffix.starts_with(&needle)
        })
        .map(|task| task.id.as_str())
        .collect();
    matches.sort_unstable();
    matches.dedup();

    match matches.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.to_string())),
        many => Err(Error::InvalidArgument(format!(
            "ambiguous task id '{}': {}",
            trimmed,
            many.join(", ")
        ))),
    }
}
