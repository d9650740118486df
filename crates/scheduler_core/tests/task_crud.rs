use chrono::NaiveDate;
use scheduler_core::db::open_db_in_memory;
use scheduler_core::{
    parse_calendar_date, CompletionOutcome, LifecycleError, RepoError, SqliteTaskRepository,
    TaskDraft, TaskRecord, TaskRepository, TaskService, TaskServiceError,
};

fn date(value: &str) -> NaiveDate {
    parse_calendar_date(value).unwrap()
}

fn record(date: &str, title: &str, repeat: &str) -> TaskRecord {
    TaskRecord {
        id: None,
        date: date.to_string(),
        title: title.to_string(),
        comment: String::new(),
        repeat: repeat.to_string(),
    }
}

fn draft(date: Option<&str>, title: &str, repeat: &str) -> TaskDraft {
    TaskDraft {
        id: None,
        date: date.map(str::to_string),
        title: title.to_string(),
        comment: "note".to_string(),
        repeat: repeat.to_string(),
    }
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let id = repo.insert_task(&record("20240105", "dentist", "")).unwrap();
    let loaded = repo.get_task(id).unwrap().unwrap();

    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.date, "20240105");
    assert_eq!(loaded.title, "dentist");
    assert_eq!(loaded.repeat, "");
}

#[test]
fn insert_ignores_caller_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let mut first = record("20240105", "a", "");
    first.id = Some(999);
    let id = repo.insert_task(&first).unwrap();

    assert_ne!(id, 999);
    assert!(repo.get_task(999).unwrap().is_none());
}

#[test]
fn update_and_delete_missing_rows_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let mut missing = record("20240105", "ghost", "");
    missing.id = Some(77);
    assert!(matches!(
        repo.update_task(&missing).unwrap_err(),
        RepoError::NotFound(77)
    ));
    assert!(matches!(
        repo.delete_task(77).unwrap_err(),
        RepoError::NotFound(77)
    ));
    assert!(matches!(
        repo.update_task(&record("20240105", "unsaved", "")).unwrap_err(),
        RepoError::MissingId
    ));
}

#[test]
fn list_upcoming_orders_by_date_then_id_and_applies_limit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let late = repo.insert_task(&record("20240310", "late", "")).unwrap();
    let early = repo.insert_task(&record("20240102", "early", "")).unwrap();
    let tie = repo.insert_task(&record("20240310", "tie", "")).unwrap();

    let ids = repo
        .list_upcoming(None)
        .unwrap()
        .into_iter()
        .map(|task| task.id.unwrap())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![early, late, tie]);

    let limited = repo.list_upcoming(Some(2)).unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn list_upcoming_default_limit_is_ten() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    for day in 1..=12 {
        repo.insert_task(&record(&format!("202401{day:02}"), "daily", ""))
            .unwrap();
    }

    assert_eq!(repo.list_upcoming(None).unwrap().len(), 10);
    assert_eq!(repo.list_upcoming(Some(100)).unwrap().len(), 12);
}

#[test]
fn service_add_normalizes_past_date() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let today = date("20240601");

    let plain = service
        .add_task(&draft(Some("20200101"), "old", ""), today)
        .unwrap();
    let weekly = service
        .add_task(&draft(Some("20240501"), "weekly", "d 7"), today)
        .unwrap();
    let defaulted = service.add_task(&draft(None, "now", ""), today).unwrap();

    assert_eq!(service.get_task(plain).unwrap().date, "20240601");
    assert_eq!(service.get_task(weekly).unwrap().date, "20240605");
    assert_eq!(service.get_task(weekly).unwrap().repeat, "d 7");
    assert_eq!(service.get_task(defaulted).unwrap().date, "20240601");
}

#[test]
fn service_add_rejects_bad_input_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let today = date("20240601");

    let empty_title = service.add_task(&draft(None, "", ""), today).unwrap_err();
    assert!(matches!(
        empty_title,
        TaskServiceError::Lifecycle(LifecycleError::EmptyTitle)
    ));
    assert!(empty_title.is_client_error());

    let bad_date = service
        .add_task(&draft(Some("01/06/2024"), "t", ""), today)
        .unwrap_err();
    assert!(matches!(
        bad_date,
        TaskServiceError::Lifecycle(LifecycleError::InvalidDate(_))
    ));

    let bad_rule = service
        .add_task(&draft(Some("20300101"), "t", "d 0"), today)
        .unwrap_err();
    assert!(matches!(
        bad_rule,
        TaskServiceError::Lifecycle(LifecycleError::Recurrence(_))
    ));

    assert!(service.list_upcoming(None).unwrap().is_empty());
}

#[test]
fn service_edit_replaces_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let today = date("20240601");

    let id = service
        .add_task(&draft(Some("20240701"), "draft", "y"), today)
        .unwrap();

    let mut edit = draft(Some("20240801"), "final", "");
    edit.id = Some(id);
    edit.comment = String::new();
    service.edit_task(&edit, today).unwrap();

    let loaded = service.get_task(id).unwrap();
    assert_eq!(loaded.date, "20240801");
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.comment, "");
    assert_eq!(loaded.repeat, "");
}

#[test]
fn service_edit_requires_existing_id() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let today = date("20240601");

    let no_id = service.edit_task(&draft(None, "x", ""), today).unwrap_err();
    assert!(matches!(no_id, TaskServiceError::MissingId));

    let mut unknown = draft(None, "x", "");
    unknown.id = Some(404);
    let missing = service.edit_task(&unknown, today).unwrap_err();
    assert!(matches!(missing, TaskServiceError::TaskNotFound(404)));
}

#[test]
fn completing_non_recurring_task_deletes_row() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let today = date("20240601");

    let id = service.add_task(&draft(None, "once", ""), today).unwrap();
    let outcome = service.complete_task(id, today).unwrap();

    assert_eq!(outcome, CompletionOutcome::Deleted);
    assert!(matches!(
        service.get_task(id).unwrap_err(),
        TaskServiceError::TaskNotFound(found) if found == id
    ));
}

#[test]
fn completing_recurring_task_reschedules_and_keeps_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let id = service
        .add_task(&draft(Some("20240603"), "weekly review", "d 7"), date("20240601"))
        .unwrap();
    let outcome = service.complete_task(id, date("20240612")).unwrap();

    assert_eq!(outcome, CompletionOutcome::Rescheduled(date("20240617")));
    let loaded = service.get_task(id).unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.date, "20240617");
    assert_eq!(loaded.title, "weekly review");
    assert_eq!(loaded.comment, "note");
    assert_eq!(loaded.repeat, "d 7");
}

#[test]
fn completion_failure_leaves_row_untouched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let bad_rule = repo.insert_task(&record("20240101", "legacy", "m 1")).unwrap();
    let bad_date = repo.insert_task(&record("2024-01-01", "legacy", "y")).unwrap();
    let service = TaskService::new(repo);
    let today = date("20240601");

    let err = service.complete_task(bad_rule, today).unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Lifecycle(LifecycleError::Recurrence(_))
    ));
    assert_eq!(service.get_task(bad_rule).unwrap().date, "20240101");

    let err = service.complete_task(bad_date, today).unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Lifecycle(LifecycleError::CorruptState(_))
    ));
    assert!(!err.is_client_error());
    assert_eq!(service.get_task(bad_date).unwrap().date, "2024-01-01");
}

#[test]
fn remove_task_deletes_recurring_rows_too() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let today = date("20240601");

    let id = service.add_task(&draft(None, "yearly", "y"), today).unwrap();
    service.remove_task(id).unwrap();

    assert!(matches!(
        service.remove_task(id).unwrap_err(),
        TaskServiceError::TaskNotFound(_)
    ));
}
