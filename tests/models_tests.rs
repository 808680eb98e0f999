use serde_json::json;
use todo_summary::core::models::{NewTask, Task, TaskPatch};

#[test]
fn test_task_row_with_legacy_text_and_numeric_id() {
    let task: Task = serde_json::from_value(json!({
        "id": 42,
        "text": "Connect to Supabase",
        "completed": false
    }))
    .unwrap();

    assert_eq!(task.id, "42");
    assert_eq!(task.title, "Connect to Supabase");
    assert_eq!(task.description, "");
    assert!(task.is_pending());
}

#[test]
fn test_task_row_with_both_title_and_text_prefers_title() {
    let task: Task = serde_json::from_value(json!({
        "id": "1715000000000",
        "text": "old",
        "title": "new",
        "description": null,
        "completed": true,
        "created_at": "2024-05-06T12:00:00.123456+00:00"
    }))
    .unwrap();

    assert_eq!(task.title, "new");
    assert_eq!(task.description, "");
    assert!(task.completed);
    assert_eq!(task.created_at.to_rfc3339(), "2024-05-06T12:00:00.123456+00:00");
}

#[test]
fn test_missing_completed_flag_means_pending() {
    let task: Task = serde_json::from_value(json!({ "id": "a", "title": "x" })).unwrap();
    assert!(task.is_pending());

    let task: Task =
        serde_json::from_value(json!({ "id": "a", "title": "x", "completed": null })).unwrap();
    assert!(task.is_pending());
}

#[test]
fn test_task_serializes_canonical_fields_only() {
    let task = Task::from_new(NewTask::new("Buy milk", None));
    let value = serde_json::to_value(&task).unwrap();

    assert_eq!(value["title"], "Buy milk");
    assert_eq!(value["description"], "");
    assert_eq!(value["completed"], false);
    assert!(value.get("text").is_none());
    assert!(value["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[test]
fn test_new_task_accepts_text_alias() {
    let new_task: NewTask = serde_json::from_value(json!({ "text": "From old client" })).unwrap();
    assert_eq!(new_task.title, "From old client");

    let validated = NewTask::new("  padded ", Some(" d ".to_string()))
        .validated()
        .unwrap();
    assert_eq!(validated.title, "padded");
    assert_eq!(validated.description.as_deref(), Some("d"));
}

#[test]
fn test_patch_keeps_blank_title_for_validation() {
    let patch: TaskPatch = serde_json::from_value(json!({ "title": "" })).unwrap();
    assert_eq!(patch.title.as_deref(), Some(""));
    assert!(patch.validated().is_err());

    let patch: TaskPatch = serde_json::from_value(json!({ "completed": true })).unwrap();
    assert_eq!(patch, TaskPatch::completed(true));
    assert!(!patch.is_empty());
}

#[test]
fn test_patch_serializes_only_present_fields() {
    let value = serde_json::to_value(TaskPatch::completed(false)).unwrap();
    assert_eq!(value, json!({ "completed": false }));
}
