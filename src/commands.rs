use std::io::{self, Write};

use chrono::{Local, NaiveDateTime};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::calendar::{group_by_date, marked_dates, tasks_on};
use crate::geocode::{resolve_location, Geocoder};
use crate::lifecycle;
use crate::models::{parse_date_input, NewTask, Profile, SortKey, StatusFilter, Task, TaskId, TaskPatch, TaskStatus};
use crate::stats::{self, StatusCounts};
use crate::storage::{KeyValueStore, TaskStore};

const WEEKDAY_LABELS: [&str; 7] = ["6d", "5d", "4d", "3d", "2d", "1d", "Now"];

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => Color::Green,
        TaskStatus::InProgress => Color::Yellow,
        TaskStatus::Cancelled => Color::Red,
    }
}

fn persist<S: KeyValueStore>(store: &mut TaskStore<S>, tasks: &[Task], done: &str, silent: bool) -> bool {
    match store.save(tasks) {
        Ok(()) => {
            if !silent { println!("{}", done); }
            true
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
            false
        }
    }
}

/// Adds a new task.
///
/// The location is taken from `location` when given, otherwise it is resolved
/// from `coords` through the geocoder. `at` defaults to the current time.
pub fn cmd_add<S: KeyValueStore, G: Geocoder + ?Sized>(
    store: &mut TaskStore<S>,
    title: String,
    description: String,
    at: Option<String>,
    location: Option<String>,
    coords: Option<(f64, f64)>,
    geocoder: &G,
    silent: bool,
) -> Option<TaskId> {
    let date = match at {
        Some(s) => match parse_date_input(&s) {
            Ok(d) => d,
            Err(e) => {
                if !silent { eprintln!("{}", e); }
                return None;
            }
        },
        None => now(),
    };
    let location = match (location, coords) {
        (Some(l), _) => l,
        (None, Some((lat, lng))) => resolve_location(geocoder, lat, lng),
        (None, None) => String::new(),
    };

    let tasks = store.load();
    let id = TaskId::generate();
    let new = NewTask { title, description, date, location };
    let tasks = match lifecycle::add_with_id(&tasks, new, id.clone()) {
        Ok(t) => t,
        Err(e) => {
            if !silent { eprintln!("Validation Error: {}", e); }
            return None;
        }
    };
    if persist(store, &tasks, &format!("Task added (id = {})", id), silent) {
        Some(id)
    } else {
        None
    }
}

/// Sets the status of a task.
pub fn cmd_status<S: KeyValueStore>(store: &mut TaskStore<S>, id: &TaskId, status: TaskStatus, silent: bool) {
    let tasks = store.load();
    if lifecycle::find(&tasks, id).is_none() {
        if !silent { eprintln!("Task {} not found.", id); }
        return;
    }
    let tasks = lifecycle::update_status(&tasks, id, status);
    persist(store, &tasks, &format!("Task {} marked as {}.", id, status), silent);
}

/// Edits an existing task's details.
pub fn cmd_edit<S: KeyValueStore>(store: &mut TaskStore<S>, id: &TaskId, patch: TaskPatch, silent: bool) {
    let tasks = store.load();
    if lifecycle::find(&tasks, id).is_none() {
        if !silent { eprintln!("Task {} not found.", id); }
        return;
    }
    if patch.is_empty() {
        if !silent { println!("Nothing to update."); }
        return;
    }
    match lifecycle::edit(&tasks, id, &patch) {
        Ok(tasks) => {
            persist(store, &tasks, &format!("Task {} updated.", id), silent);
        }
        Err(e) => {
            if !silent { eprintln!("Validation Error: {}", e); }
        }
    }
}

/// Removes a task by ID.
pub fn cmd_remove<S: KeyValueStore>(store: &mut TaskStore<S>, id: &TaskId, silent: bool) {
    let tasks = store.load();
    let len_before = tasks.len();
    let tasks = lifecycle::remove(&tasks, id);
    if tasks.len() == len_before {
        if !silent { eprintln!("Task {} not found.", id); }
    } else {
        persist(store, &tasks, &format!("Task {} removed.", id), silent);
    }
}

/// Lists tasks in a formatted table.
pub fn cmd_list<S: KeyValueStore>(store: &TaskStore<S>, sort: SortKey, filter: StatusFilter) {
    let all = store.load();
    let counts = StatusCounts::of(&all);
    let tasks = lifecycle::sort(&lifecycle::filter(&all, filter), sort);
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Location").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);
    for t in tasks {
        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(&t.title),
            Cell::new(&t.date),
            Cell::new(&t.location),
            Cell::new(t.status).fg(status_color(t.status)),
        ]);
    }
    println!("{table}");
    let summary: Vec<String> = TaskStatus::ALL
        .iter()
        .map(|s| format!("{}: {}", s, counts.get(*s)))
        .collect();
    println!("All: {} | {}", counts.total, summary.join(" | "));
}

/// Prints a single task.
pub fn cmd_show<S: KeyValueStore>(store: &TaskStore<S>, id: &TaskId) {
    let tasks = store.load();
    let Some(t) = lifecycle::find(&tasks, id) else {
        eprintln!("Task {} not found.", id);
        return;
    };
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec![Cell::new("Title").add_attribute(Attribute::Bold), Cell::new(&t.title)]);
    table.add_row(vec![Cell::new("Description").add_attribute(Attribute::Bold), Cell::new(&t.description)]);
    table.add_row(vec![Cell::new("Due").add_attribute(Attribute::Bold), Cell::new(&t.date)]);
    table.add_row(vec![Cell::new("Location").add_attribute(Attribute::Bold), Cell::new(&t.location)]);
    table.add_row(vec![
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new(t.status).fg(status_color(t.status)),
    ]);
    println!("{table}");
}

/// Prints profile statistics: level, XP, counts and weekly activity.
pub fn cmd_stats<S: KeyValueStore>(store: &TaskStore<S>) {
    let tasks = store.load();
    let profile = store.profile();
    let s = stats::compute(&tasks, now(), &mut rand::rng());

    println!("{} <{}>", profile.name, profile.email);
    println!("Level {}", s.level);
    let filled = (s.progress().clamp(0.0, 1.0) * 20.0).round() as usize;
    println!("[{}{}] XP: {} / {}", "#".repeat(filled), "-".repeat(20 - filled), s.xp_current, s.xp_required);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Total", "Done", "Progress", "Cancelled"]);
    table.add_row(vec![
        Cell::new(s.counts.total),
        Cell::new(s.counts.completed).fg(Color::Green),
        Cell::new(s.counts.in_progress).fg(Color::Yellow),
        Cell::new(s.counts.cancelled).fg(Color::Red),
    ]);
    println!("{table}");

    let mut weekly = Table::new();
    weekly.load_preset(UTF8_FULL).set_header(WEEKDAY_LABELS.to_vec());
    weekly.add_row(s.weekly.iter().map(Cell::new).collect::<Vec<_>>());
    println!("Weekly Activity");
    println!("{weekly}");

    if s.badge_unlocked { println!("Badge Unlocked"); }
    if s.master_achiever { println!("Master Achiever"); }
    println!("\"{}\"", s.quote);
}

/// Shows the tasks on `date`, or every marked day when no date is given.
pub fn cmd_calendar<S: KeyValueStore>(store: &TaskStore<S>, date: Option<String>) {
    let index = group_by_date(&store.load());
    match date {
        Some(day) => {
            let tasks = tasks_on(&index, &day);
            if tasks.is_empty() {
                println!("No tasks for {}.", day);
                return;
            }
            for t in tasks {
                println!("{}  {}  [{}]  {}", t.date, t.title, t.status, t.id);
            }
        }
        None => {
            let marked = marked_dates(&index);
            if marked.is_empty() {
                println!("No tasks found.");
                return;
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec!["Date", "Tasks"]);
            for (day, count) in marked {
                table.add_row(vec![Cell::new(day), Cell::new(count)]);
            }
            println!("{table}");
        }
    }
}

/// Shows the profile, or updates the given fields.
pub fn cmd_profile<S: KeyValueStore>(store: &mut TaskStore<S>, name: Option<String>, email: Option<String>, silent: bool) {
    let current = store.profile();
    if name.is_none() && email.is_none() {
        if !silent {
            println!("Name:  {}", current.name);
            println!("Email: {}", current.email);
            if let Ok(Some(uri)) = store.avatar_uri() { println!("Avatar: {}", uri); }
            println!("Dark mode: {}", if store.dark_mode().unwrap_or(false) { "on" } else { "off" });
        }
        return;
    }
    let profile = Profile {
        name: name.unwrap_or(current.name),
        email: email.unwrap_or(current.email),
    };
    match store.save_profile(&profile) {
        Ok(()) => { if !silent { println!("Profile updated."); } }
        Err(e) => { if !silent { eprintln!("Failed to save profile: {}", e); } }
    }
}

pub fn cmd_avatar<S: KeyValueStore>(store: &mut TaskStore<S>, uri: String, silent: bool) {
    match store.set_avatar_uri(&uri) {
        Ok(()) => { if !silent { println!("Avatar updated."); } }
        Err(e) => { if !silent { eprintln!("Failed to save avatar: {}", e); } }
    }
}

pub fn cmd_dark_mode<S: KeyValueStore>(store: &mut TaskStore<S>, enabled: bool, silent: bool) {
    match store.set_dark_mode(enabled) {
        Ok(()) => { if !silent { println!("Dark mode {}.", if enabled { "on" } else { "off" }); } }
        Err(e) => { if !silent { eprintln!("Failed to save preference: {}", e); } }
    }
}

/// Deletes all tasks. Profile and preferences are kept.
pub fn cmd_clear<S: KeyValueStore>(store: &mut TaskStore<S>, force: bool) {
    if !force {
        print!("This will delete all your tasks permanently. Continue? [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = store.clear() {
        eprintln!("Failed to clear tasks: {}", e);
    } else {
        println!("All tasks cleared.");
    }
}
