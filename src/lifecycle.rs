//! Pure transformations over a task collection.
//!
//! Each operation borrows the current collection and returns a new one, so a
//! failed operation leaves the caller's copy untouched.

use log::debug;

use crate::error::TaskError;
use crate::models::{format_task_date, NewTask, SortKey, StatusFilter, Task, TaskId, TaskPatch, TaskStatus};

fn require(field: &'static str, value: &str) -> Result<(), TaskError> {
    if value.trim().is_empty() {
        return Err(TaskError::Validation { field });
    }
    Ok(())
}

fn validate(title: &str, description: &str, location: &str) -> Result<(), TaskError> {
    require("Title", title)?;
    require("Description", description)?;
    require("Location", location)
}

/// Appends a new in-progress task with a freshly generated id.
pub fn add(tasks: &[Task], new: NewTask) -> Result<Vec<Task>, TaskError> {
    add_with_id(tasks, new, TaskId::generate())
}

/// Like [`add`], with the caller supplying the id.
///
/// Fails with [`TaskError::DuplicateId`] if `id` is already present.
pub fn add_with_id(tasks: &[Task], new: NewTask, id: TaskId) -> Result<Vec<Task>, TaskError> {
    validate(&new.title, &new.description, &new.location)?;
    if find(tasks, &id).is_some() {
        return Err(TaskError::DuplicateId(id));
    }
    debug!("lifecycle::add: id={}", id);
    let mut out = tasks.to_vec();
    out.push(Task {
        id,
        title: new.title,
        description: new.description,
        date: format_task_date(new.date),
        location: new.location,
        status: TaskStatus::InProgress,
    });
    Ok(out)
}

/// Replaces the status of the task with `id`. Unknown ids are a no-op.
pub fn update_status(tasks: &[Task], id: &TaskId, status: TaskStatus) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if &t.id == id {
                Task { status, ..t.clone() }
            } else {
                t.clone()
            }
        })
        .collect()
}

/// Applies `patch` to the task with `id`. Unknown ids are a no-op.
///
/// Fails if the edited title, description or location would be empty.
pub fn edit(tasks: &[Task], id: &TaskId, patch: &TaskPatch) -> Result<Vec<Task>, TaskError> {
    let mut out = tasks.to_vec();
    let Some(task) = out.iter_mut().find(|t| &t.id == id) else {
        debug!("lifecycle::edit: id={} not found", id);
        return Ok(out);
    };
    if let Some(title) = &patch.title {
        task.title = title.clone();
    }
    if let Some(description) = &patch.description {
        task.description = description.clone();
    }
    if let Some(location) = &patch.location {
        task.location = location.clone();
    }
    if let Some(date) = patch.date {
        task.date = format_task_date(date);
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    validate(&task.title, &task.description, &task.location)?;
    Ok(out)
}

/// Drops the task with `id`. Unknown ids are a no-op.
pub fn remove(tasks: &[Task], id: &TaskId) -> Vec<Task> {
    tasks.iter().filter(|t| &t.id != id).cloned().collect()
}

/// Stable ascending sort on the string form of the chosen field.
///
/// Status ordering follows the labels alphabetically:
/// `Cancelled` < `Completed` < `In Progress`.
pub fn sort(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let mut out = tasks.to_vec();
    match key {
        SortKey::Date => out.sort_by(|a, b| a.date.cmp(&b.date)),
        SortKey::Status => out.sort_by(|a, b| a.status.label().cmp(b.status.label())),
    }
    out
}

/// Returns the tasks selected by `filter`, in their original order.
pub fn filter(tasks: &[Task], filter: StatusFilter) -> Vec<Task> {
    tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
}

pub fn find<'a>(tasks: &'a [Task], id: &TaskId) -> Option<&'a Task> {
    tasks.iter().find(|t| &t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_whitespace() {
        let err = require("Title", " \t\n").unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }
}
