//! taskpad command implementations.
//!
//! Each command loads the board, validates its input at this boundary
//! (trimmed non-empty titles, known priorities and filters), applies one
//! board operation and reports the result. Ids that match nothing are a
//! no-op reported as a warning, never an error.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

use crate::board::TaskBoard;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;
use crate::task::{normalize_title, FilterStatus, Priority, Task};
use crate::view::{self, Counts};

/// Settings shared by every command
pub struct Env {
    pub data_dir: PathBuf,
    pub lock_timeout_ms: u64,
    pub default_priority: Priority,
    pub output: OutputOptions,
}

impl Env {
    fn load_board(&self) -> TaskBoard {
        TaskBoard::load(Storage::open_dir(&self.data_dir, self.lock_timeout_ms))
    }
}

pub struct AddOptions {
    pub title: String,
    pub priority: Option<String>,
}

pub struct ListOptions {
    pub filter: Option<String>,
}

pub struct EditOptions {
    pub id: String,
    pub title: String,
}

pub struct PriorityOptions {
    pub id: String,
    pub priority: String,
}

pub fn run_add(env: &Env, options: AddOptions) -> Result<()> {
    let title = require_title(&options.title)?;
    let priority = match options.priority.as_deref() {
        Some(value) => value.parse::<Priority>()?,
        None => env.default_priority,
    };

    let mut board = env.load_board();
    let task = board.add(&title, priority);

    let mut human = HumanOutput::new("Task added");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Priority", task.priority.to_string());
    push_unsaved_warning(&board, &mut human);

    emit_success(env.output, "add", &board.tasks()[0], Some(&human))
}

pub fn run_list(env: &Env, options: ListOptions) -> Result<()> {
    let board = env.load_board();
    let override_filter = options
        .filter
        .as_deref()
        .map(str::parse::<FilterStatus>)
        .transpose()?;

    let (filter, tasks) = match override_filter {
        Some(filter) => (filter, view::visible_tasks(board.tasks(), filter)),
        None => (board.filter(), board.visible_tasks()),
    };
    let counts = board.counts();

    let output = TaskListOutput {
        filter,
        counts,
        total: tasks.len(),
        tasks,
    };

    let mut human = if counts.all == 0 {
        let mut human = HumanOutput::new("No tasks yet");
        human.push_next_step("taskpad add <title>");
        human
    } else if output.tasks.is_empty() {
        HumanOutput::new(format!("No {filter} tasks"))
    } else {
        HumanOutput::new(format!("Tasks ({filter})"))
    };
    if counts.all > 0 {
        push_counts(&mut human, counts);
    }
    for task in &output.tasks {
        human.push_detail(task_line(task));
    }
    push_unsaved_warning(&board, &mut human);

    emit_success(env.output, "list", &output, Some(&human))
}

pub fn run_show(env: &Env, input: &str) -> Result<()> {
    let board = env.load_board();
    let id = board
        .resolve_id(input)?
        .ok_or_else(|| Error::InvalidArgument(format!("task not found: {}", input.trim())))?;
    let task = board
        .get(&id)
        .ok_or_else(|| Error::InvalidArgument(format!("task not found: {id}")))?;

    let mut human = HumanOutput::new(task.title.clone());
    human.push_summary("ID", task.id.clone());
    human.push_summary("Status", status_label(task.completed));
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Created", format_millis(task.created_at));
    human.push_summary("Updated", format_millis(task.updated_at));

    emit_success(env.output, "show", task, Some(&human))
}

pub fn run_toggle(env: &Env, input: &str) -> Result<()> {
    let mut board = env.load_board();
    let Some(id) = board.resolve_id(input)? else {
        return emit_no_match(env, "toggle", input);
    };
    let Some(task) = board.toggle(&id).cloned() else {
        return emit_no_match(env, "toggle", input);
    };

    let header = if task.completed {
        "Task completed"
    } else {
        "Task reopened"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", status_label(task.completed));
    push_unsaved_warning(&board, &mut human);

    emit_success(env.output, "toggle", &task, Some(&human))
}

pub fn run_edit(env: &Env, options: EditOptions) -> Result<()> {
    let title = require_title(&options.title)?;

    let mut board = env.load_board();
    let Some(id) = board.resolve_id(&options.id)? else {
        return emit_no_match(env, "edit", &options.id);
    };
    let Some(task) = board.edit_title(&id, &title).cloned() else {
        return emit_no_match(env, "edit", &options.id);
    };

    let mut human = HumanOutput::new("Task updated");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    push_unsaved_warning(&board, &mut human);

    emit_success(env.output, "edit", &task, Some(&human))
}

pub fn run_priority(env: &Env, options: PriorityOptions) -> Result<()> {
    let priority = options.priority.parse::<Priority>()?;

    let mut board = env.load_board();
    let Some(id) = board.resolve_id(&options.id)? else {
        return emit_no_match(env, "priority", &options.id);
    };
    let Some(task) = board.set_priority(&id, priority).cloned() else {
        return emit_no_match(env, "priority", &options.id);
    };

    let mut human = HumanOutput::new("Task priority updated");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Priority", task.priority.to_string());
    push_unsaved_warning(&board, &mut human);

    emit_success(env.output, "priority", &task, Some(&human))
}

pub fn run_rm(env: &Env, input: &str) -> Result<()> {
    let mut board = env.load_board();
    let Some(id) = board.resolve_id(input)? else {
        return emit_no_match(env, "rm", input);
    };
    let Some(task) = board.delete(&id) else {
        return emit_no_match(env, "rm", input);
    };

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    push_unsaved_warning(&board, &mut human);

    emit_success(env.output, "rm", &task, Some(&human))
}

pub fn run_filter(env: &Env, status: Option<&str>) -> Result<()> {
    let mut board = env.load_board();
    let header = match status {
        Some(value) => {
            board.set_filter(value.parse::<FilterStatus>()?);
            "Filter set"
        }
        None => "Filter",
    };

    let filter = board.filter();
    let output = FilterOutput {
        filter,
        visible: board.view().visible_len(),
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("Filter", filter.to_string());
    human.push_summary("Showing", output.visible.to_string());

    emit_success(env.output, "filter", &output, Some(&human))
}

pub fn run_count(env: &Env, filter: Option<&str>) -> Result<()> {
    let board = env.load_board();
    let filter = match filter {
        Some(value) => value.parse::<FilterStatus>()?,
        None => board.filter(),
    };
    let output = CountOutput {
        filter,
        total: board.counts().for_filter(filter),
    };

    let human = HumanOutput::new(output.total.to_string());
    emit_success(env.output, "count", &output, Some(&human))
}

pub fn run_stats(env: &Env) -> Result<()> {
    let board = env.load_board();
    let counts = board.counts();
    let output = StatsOutput {
        total: counts.all,
        completed: counts.completed,
        pending: counts.pending,
        completion_rate: board.completion_rate(),
    };

    let mut human = HumanOutput::new("Task stats");
    human.push_summary("Total", output.total.to_string());
    human.push_summary("Done", output.completed.to_string());
    human.push_summary("Pending", output.pending.to_string());
    human.push_summary(
        "Progress",
        format!(
            "{}% {}",
            output.completion_rate,
            progress_bar(output.completion_rate)
        ),
    );

    emit_success(env.output, "stats", &output, Some(&human))
}

fn require_title(raw: &str) -> Result<String> {
    normalize_title(raw).ok_or_else(|| Error::InvalidArgument("title cannot be empty".to_string()))
}

fn emit_no_match(env: &Env, command: &str, input: &str) -> Result<()> {
    let output = NoMatchOutput {
        id: input.trim().to_string(),
        changed: false,
    };
    let mut human = HumanOutput::new("No task matched");
    human.push_warning(format!("no task matches '{}'; nothing changed", output.id));
    emit_success(env.output, command, &output, Some(&human))
}

fn push_unsaved_warning(board: &TaskBoard, human: &mut HumanOutput) {
    if board.tasks_unreadable() {
        human.push_warning("stored tasks could not be read; task changes were not saved");
    }
}

fn push_counts(human: &mut HumanOutput, counts: Counts) {
    human.push_summary("All", counts.all.to_string());
    human.push_summary("Pending", counts.pending.to_string());
    human.push_summary("Completed", counts.completed.to_string());
}

fn task_line(task: &Task) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    format!("[{}][{}] {} {}", check, task.priority, task.id, task.title)
}

fn status_label(completed: bool) -> &'static str {
    if completed {
        "completed"
    } else {
        "pending"
    }
}

fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}

fn progress_bar(rate: u8) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(rate.min(100)) * WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    filter: FilterStatus,
    counts: Counts,
    total: usize,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct FilterOutput {
    filter: FilterStatus,
    visible: usize,
}

#[derive(Serialize)]
struct CountOutput {
    filter: FilterStatus,
    total: usize,
}

#[derive(Serialize)]
struct StatsOutput {
    total: usize,
    completed: usize,
    pending: usize,
    completion_rate: u8,
}

#[derive(Serialize)]
struct NoMatchOutput {
    id: String,
    changed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_line_marks_completion() {
        let mut task = Task::new("1-abc".to_string(), "Buy milk".to_string(), Priority::High, 0);
        assert_eq!(task_line(&task), "[ ][high] 1-abc Buy milk");
        task.completed = true;
        assert_eq!(task_line(&task), "[x][high] 1-abc Buy milk");
    }

    #[test]
    fn progress_bar_scales() {
        assert_eq!(progress_bar(0), format!("[{}]", "-".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn format_millis_is_rfc3339() {
        assert_eq!(format_millis(0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn require_title_rejects_blank() {
        assert!(matches!(require_title("  "), Err(Error::InvalidArgument(_))));
        assert_eq!(require_title(" Call mom ").unwrap(), "Call mom");
    }
}
