use chrono::NaiveDate;
use qara::lifecycle::{add, add_with_id, edit, filter, find, remove, sort, update_status};
use qara::models::{NewTask, SortKey, StatusFilter, Task, TaskId, TaskPatch, TaskStatus};
use qara::TaskError;

fn new_task(title: &str, date: (i32, u32, u32, u32, u32)) -> NewTask {
    let (y, m, d, h, min) = date;
    NewTask {
        title: title.into(),
        description: "Something to do".into(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap(),
        location: "Abay Ave 10, Almaty".into(),
    }
}

fn task(id: &str, date: &str, status: TaskStatus) -> Task {
    Task {
        id: id.into(),
        title: format!("Task {}", id),
        description: "desc".into(),
        date: date.into(),
        location: "Home".into(),
        status,
    }
}

#[test]
fn test_add_appends_in_progress_task() {
    let tasks = vec![task("a", "2024-01-01 09:00", TaskStatus::Completed)];
    let out = add(&tasks, new_task("Buy milk", (2024, 2, 3, 10, 5))).unwrap();

    assert_eq!(out.len(), 2);
    let added = &out[1];
    assert_eq!(added.title, "Buy milk");
    assert_eq!(added.date, "2024-02-03 10:05");
    assert_eq!(added.status, TaskStatus::InProgress);
    assert_ne!(added.id, out[0].id);
}

#[test]
fn test_add_generates_unique_ids() {
    let mut tasks = Vec::new();
    for i in 0..50 {
        tasks = add(&tasks, new_task(&format!("t{}", i), (2024, 1, 1, 9, 0))).unwrap();
    }
    let mut ids: Vec<&TaskId> = tasks.iter().map(|t| &t.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn test_add_rejects_blank_fields() {
    let tasks = vec![task("a", "2024-01-01 09:00", TaskStatus::InProgress)];

    let mut blank_title = new_task("   ", (2024, 1, 1, 9, 0));
    let err = add(&tasks, blank_title.clone()).unwrap_err();
    assert!(matches!(err, TaskError::Validation { field: "Title" }));

    blank_title.title = "ok".into();
    blank_title.description = "\t".into();
    let err = add(&tasks, blank_title.clone()).unwrap_err();
    assert!(matches!(err, TaskError::Validation { field: "Description" }));

    blank_title.description = "ok".into();
    blank_title.location = String::new();
    let err = add(&tasks, blank_title).unwrap_err();
    assert!(matches!(err, TaskError::Validation { field: "Location" }));

    assert_eq!(tasks.len(), 1);
}

#[test]
fn test_add_with_id_uses_given_id() {
    let out = add_with_id(&[], new_task("x", (2024, 1, 1, 9, 0)), TaskId::from("1700000000000")).unwrap();
    assert_eq!(out[0].id.as_str(), "1700000000000");
}

#[test]
fn test_add_with_id_rejects_existing_id() {
    let tasks = add_with_id(&[], new_task("first", (2024, 1, 1, 9, 0)), TaskId::from("1700000000000")).unwrap();
    let err = add_with_id(&tasks, new_task("second", (2024, 1, 2, 9, 0)), TaskId::from("1700000000000")).unwrap_err();
    assert!(matches!(err, TaskError::DuplicateId(ref id) if id.as_str() == "1700000000000"));
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "first");

    // removing the id still drops exactly one task
    assert_eq!(remove(&tasks, &"1700000000000".into()).len(), 0);
}

#[test]
fn test_update_status() {
    let tasks = vec![
        task("a", "2024-01-01 09:00", TaskStatus::InProgress),
        task("b", "2024-01-02 09:00", TaskStatus::InProgress),
    ];
    let out = update_status(&tasks, &"b".into(), TaskStatus::Cancelled);
    assert_eq!(find(&out, &"b".into()).unwrap().status, TaskStatus::Cancelled);
    assert_eq!(find(&out, &"a".into()).unwrap().status, TaskStatus::InProgress);

    // any state is reachable from any other
    let back = update_status(&out, &"b".into(), TaskStatus::InProgress);
    assert_eq!(find(&back, &"b".into()).unwrap().status, TaskStatus::InProgress);
}

#[test]
fn test_update_status_unknown_id_is_noop() {
    let tasks = vec![task("a", "2024-01-01 09:00", TaskStatus::InProgress)];
    let out = update_status(&tasks, &"zzz".into(), TaskStatus::Completed);
    assert_eq!(out, tasks);
}

#[test]
fn test_edit_replaces_fields() {
    let tasks = vec![task("a", "2024-01-01 09:00", TaskStatus::InProgress)];
    let patch = TaskPatch {
        title: Some("Renamed".into()),
        date: Some(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(7, 8, 0).unwrap()),
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    let out = edit(&tasks, &"a".into(), &patch).unwrap();
    assert_eq!(out[0].title, "Renamed");
    assert_eq!(out[0].date, "2024-05-06 07:08");
    assert_eq!(out[0].status, TaskStatus::Completed);
    assert_eq!(out[0].description, "desc");
}

#[test]
fn test_edit_rejects_blank_result() {
    let tasks = vec![task("a", "2024-01-01 09:00", TaskStatus::InProgress)];
    let patch = TaskPatch {
        location: Some("  ".into()),
        ..Default::default()
    };
    let err = edit(&tasks, &"a".into(), &patch).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(tasks[0].location, "Home");
}

#[test]
fn test_edit_unknown_id_is_noop() {
    let tasks = vec![task("a", "2024-01-01 09:00", TaskStatus::InProgress)];
    let patch = TaskPatch {
        title: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(edit(&tasks, &"b".into(), &patch).unwrap(), tasks);
}

#[test]
fn test_remove() {
    let tasks = vec![
        task("a", "2024-01-01 09:00", TaskStatus::InProgress),
        task("b", "2024-01-02 09:00", TaskStatus::InProgress),
    ];
    let out = remove(&tasks, &"a".into());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id.as_str(), "b");

    assert_eq!(remove(&tasks, &"nope".into()), tasks);
}

#[test]
fn test_sort_by_date() {
    let tasks = vec![
        task("a", "2024-03-01 09:00", TaskStatus::InProgress),
        task("b", "2023-12-31 23:59", TaskStatus::InProgress),
        task("c", "2024-03-01 08:00", TaskStatus::InProgress),
    ];
    let out = sort(&tasks, SortKey::Date);
    let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert!(out.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn test_sort_by_status_is_alphabetical_and_stable() {
    let tasks = vec![
        task("a", "2024-01-01 09:00", TaskStatus::InProgress),
        task("b", "2024-01-01 09:00", TaskStatus::Completed),
        task("c", "2024-01-01 09:00", TaskStatus::Cancelled),
        task("d", "2024-01-01 09:00", TaskStatus::Completed),
    ];
    let out = sort(&tasks, SortKey::Status);
    let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "b", "d", "a"]);
}

#[test]
fn test_filter() {
    let tasks = vec![
        task("a", "2024-01-01 09:00", TaskStatus::InProgress),
        task("b", "2024-01-01 09:00", TaskStatus::Completed),
        task("c", "2024-01-01 09:00", TaskStatus::Completed),
    ];
    assert_eq!(filter(&tasks, StatusFilter::All), tasks);
    let done = filter(&tasks, StatusFilter::Only(TaskStatus::Completed));
    let ids: Vec<&str> = done.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);
    assert!(filter(&tasks, StatusFilter::Only(TaskStatus::Cancelled)).is_empty());
}
