//! Derived views over a task list: per-filter counts, the visible subset,
//! and the completion percentage.

use serde::Serialize;

use crate::task::{FilterStatus, Task};

/// Number of tasks in each filter bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    pub all: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Counts {
    pub fn for_filter(&self, filter: FilterStatus) -> usize {
        match filter {
            FilterStatus::All => self.all,
            FilterStatus::Completed => self.completed,
            FilterStatus::Pending => self.pending,
        }
    }
}

pub fn counts(tasks: &[Task]) -> Counts {
    let completed = tasks.iter().filter(|task| task.completed).count();
    Counts {
        all: tasks.len(),
        completed,
        pending: tasks.len() - completed,
    }
}

/// Tasks passing `filter`, in list order
pub fn visible_tasks(tasks: &[Task], filter: FilterStatus) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task.completed))
        .collect()
}

/// Percentage of completed tasks, rounded half up; 0 for an empty list
pub fn completion_rate(total: usize, completed: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

/// Memoized projection of a task list through a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub counts: Counts,
    visible: Vec<usize>,
}

impl View {
    pub fn compute(tasks: &[Task], filter: FilterStatus) -> Self {
        let visible = tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| filter.matches(task.completed))
            .map(|(index, _)| index)
            .collect();
        Self {
            counts: counts(tasks),
            visible,
        }
    }

    /// Resolve the visible tasks against the list this view was computed from
    pub fn tasks<'a>(&'a self, tasks: &'a [Task]) -> impl Iterator<Item = &'a Task> + 'a {
        self.visible.iter().filter_map(move |&index| tasks.get(index))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn completion_rate(&self) -> u8 {
        completion_rate(self.counts.all, self.counts.completed)
    }
}
