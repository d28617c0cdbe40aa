//! The task board: the one owned state container for a session.
//!
//! A `TaskBoard` holds the task list and the active filter, both loaded from
//! [`Storage`] and written back after every change. All mutation goes through
//! its methods so `updated_at` and persistence stay consistent.
//!
//! If the stored task list exists but cannot be read (lock held elsewhere,
//! permissions, I/O), the board starts empty and stops writing tasks back,
//! so the stored list is never replaced by one that was never loaded.

use std::cell::OnceCell;

use crate::error::Result;
use crate::storage::{Storage, FILTER_KEY, TASKS_KEY};
use crate::task::{self, FilterStatus, Priority, Task};
use crate::view::{Counts, View};

#[derive(Debug)]
pub struct TaskBoard {
    storage: Storage,
    tasks: Vec<Task>,
    filter: FilterStatus,
    tasks_unreadable: bool,
    view: OnceCell<View>,
}

impl TaskBoard {
    /// Load tasks and filter, falling back to an empty list and `all`
    pub fn load(storage: Storage) -> Self {
        let (tasks, tasks_unreadable) = match storage.read_status::<Vec<Task>>(TASKS_KEY) {
            Ok(tasks) => (tasks.unwrap_or_default(), false),
            Err(err) => {
                tracing::warn!(
                    key = TASKS_KEY,
                    error = %err,
                    "failed to read stored tasks; changes will not be saved"
                );
                (Vec::new(), true)
            }
        };
        let filter = storage.read(FILTER_KEY, FilterStatus::default());
        tracing::debug!(tasks = tasks.len(), filter = %filter, "loaded task board");
        Self {
            storage,
            tasks,
            filter,
            tasks_unreadable,
            view: OnceCell::new(),
        }
    }

    /// Whether task changes are kept in memory only for this session
    pub fn tasks_unreadable(&self) -> bool {
        self.tasks_unreadable
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> FilterStatus {
        self.filter
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// See [`task::resolve_id`]
    pub fn resolve_id(&self, input: &str) -> Result<Option<String>> {
        task::resolve_id(&self.tasks, input)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Prepend a new task; `title` is expected to be normalized already
    pub fn add(&mut self, title: &str, priority: Priority) -> &Task {
        let now = task::now_millis();
        let id = task::generate_id(now, &self.tasks);
        let new_task = Task::new(id, title.to_string(), priority, now);
        self.replace_tasks(task::prepend(&self.tasks, new_task));
        &self.tasks[0]
    }

    /// Flip completion of `id`; `None` if there is no such task
    pub fn toggle(&mut self, id: &str) -> Option<&Task> {
        let index = task::position(&self.tasks, id)?;
        self.replace_tasks(task::toggled(&self.tasks, id, task::now_millis()));
        self.tasks.get(index)
    }

    /// Remove `id`, returning the removed task
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = task::position(&self.tasks, id)?;
        let removed = self.tasks[index].clone();
        self.replace_tasks(task::without(&self.tasks, id));
        Some(removed)
    }

    /// Replace the title of `id`; `title` is expected to be normalized already
    pub fn edit_title(&mut self, id: &str, title: &str) -> Option<&Task> {
        let index = task::position(&self.tasks, id)?;
        self.replace_tasks(task::retitled(&self.tasks, id, title, task::now_millis()));
        self.tasks.get(index)
    }

    pub fn set_priority(&mut self, id: &str, priority: Priority) -> Option<&Task> {
        let index = task::position(&self.tasks, id)?;
        self.replace_tasks(task::reprioritized(
            &self.tasks,
            id,
            priority,
            task::now_millis(),
        ));
        self.tasks.get(index)
    }

    pub fn set_filter(&mut self, filter: FilterStatus) {
        self.filter = filter;
        self.view = OnceCell::new();
        self.storage.write(FILTER_KEY, &self.filter);
    }

    fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.view = OnceCell::new();
        if self.tasks_unreadable {
            tracing::warn!(key = TASKS_KEY, "stored tasks were not loaded; skipping write");
            return;
        }
        self.storage.write(TASKS_KEY, &self.tasks);
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// Counts and visible tasks for the active filter, computed once per change
    pub fn view(&self) -> &View {
        self.view.get_or_init(|| View::compute(&self.tasks, self.filter))
    }

    pub fn counts(&self) -> Counts {
        self.view().counts
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.view().tasks(&self.tasks).collect()
    }

    pub fn completion_rate(&self) -> u8 {
        self.view().completion_rate()
    }
}
