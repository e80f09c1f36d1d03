use std::collections::BTreeMap;

use log::warn;

use crate::models::{Task, DAY_FORMAT};

/// Tasks keyed by `yyyy-MM-dd`, each group in collection order.
pub type CalendarIndex = BTreeMap<String, Vec<Task>>;

/// Day part of a task's date, or `None` when the date is unreadable.
pub fn day_key(task: &Task) -> Option<String> {
    task.due().map(|d| d.format(DAY_FORMAT).to_string())
}

/// Groups tasks by calendar day. Tasks with unreadable dates are skipped.
pub fn group_by_date(tasks: &[Task]) -> CalendarIndex {
    let mut index = CalendarIndex::new();
    for t in tasks {
        match day_key(t) {
            Some(day) => index.entry(day).or_default().push(t.clone()),
            None => warn!("calendar::group_by_date: invalid task date '{}' id={}", t.date, t.id),
        }
    }
    index
}

/// The group for `date`, empty when nothing falls on that day.
pub fn tasks_on<'a>(index: &'a CalendarIndex, date: &str) -> &'a [Task] {
    index.get(date).map(Vec::as_slice).unwrap_or(&[])
}

/// Days carrying at least one task, with their task count, ascending.
pub fn marked_dates(index: &CalendarIndex) -> Vec<(&str, usize)> {
    index.iter().map(|(day, tasks)| (day.as_str(), tasks.len())).collect()
}
