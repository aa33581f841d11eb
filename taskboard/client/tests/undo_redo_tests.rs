use axum::Router;
use axum::routing::post;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use taskboard_client::{Action, HttpCompletionService, Intent, Session, Status, TaskDraft};
use taskboard_core::{HttpTaskStore, Priority, TaskStore};
use taskboard_server::completion::api::create_completion_router;
use taskboard_server::task::TaskState;
use taskboard_server::task::api::create_task_router;
use taskboard_server::web::UpstreamState;
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

/// A task store plus a completion service reading from it.
async fn start_services() -> (String, String) {
    let task_store_url = serve(create_task_router(TaskState::default())).await;
    let upstream = HttpTaskStore::new(&task_store_url, TIMEOUT).unwrap();
    let completion_url =
        serve(create_completion_router(UpstreamState::new(Arc::new(upstream)))).await;
    (task_store_url, completion_url)
}

fn new_session(
    task_store_url: &str,
    completion_url: &str,
) -> Session<HttpTaskStore, HttpCompletionService> {
    Session::new(
        HttpTaskStore::new(task_store_url, TIMEOUT).unwrap(),
        HttpCompletionService::new(completion_url, TIMEOUT).unwrap(),
    )
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: "from the end-to-end suite".to_string(),
        due_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        priority: Priority::High,
    }
}

#[tokio::test]
async fn undone_task_is_gone_from_the_store() {
    // Arrange
    let (task_store_url, completion_url) = start_services().await;
    let mut session = new_session(&task_store_url, &completion_url);
    session.apply_and_record(Intent::AddTask(draft("A"))).await;

    // Act
    let status = session.undo().await;

    // Assert
    assert_eq!(
        status,
        Status::Done("Undo: Addition of task 'A' has been reverted.".to_string())
    );
    assert!(session.tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn redo_recreates_the_same_record() {
    // Arrange
    let (task_store_url, completion_url) = start_services().await;
    let mut session = new_session(&task_store_url, &completion_url);
    let added = session.apply_and_record(Intent::AddTask(draft("A"))).await;
    let original = session.tasks().await.unwrap();

    // Act
    let undo = session.undo().await;
    let redo = session.redo().await;

    // Assert
    assert_eq!(added, Status::Done("Task 'A' added successfully!".to_string()));
    assert!(undo.is_done());
    assert_eq!(
        redo,
        Status::Done("Redo: Addition of task 'A' has been reapplied.".to_string())
    );
    let restored = session.tasks().await.unwrap();
    assert_eq!(original.len(), 1);
    assert_eq!(restored, original);
    assert_eq!(
        serde_json::to_string(&restored[0]).unwrap(),
        serde_json::to_string(&original[0]).unwrap()
    );
}

#[tokio::test]
async fn completion_round_trips_through_undo_and_redo() {
    // Arrange
    let (task_store_url, completion_url) = start_services().await;
    let mut session = new_session(&task_store_url, &completion_url);
    session.apply_and_record(Intent::AddTask(draft("A"))).await;
    let task_id = session.log().peek_undo().unwrap().task_id();

    // Act
    let completed = session.apply_and_record(Intent::MarkComplete(task_id)).await;
    let after_complete = session.tasks().await.unwrap();
    let undone = session.undo().await;
    let after_undo = session.tasks().await.unwrap();
    let redone = session.redo().await;
    let after_redo = session.tasks().await.unwrap();

    // Assert
    assert_eq!(completed, Status::Done("Task marked as complete!".to_string()));
    assert!(after_complete[0].completed);
    assert!(after_complete[0].stopped_at.is_some());

    assert_eq!(
        undone,
        Status::Done(format!(
            "Undo: Completion of task ID '{task_id}' has been reverted."
        ))
    );
    assert!(!after_undo[0].completed);

    assert_eq!(
        redone,
        Status::Done(format!(
            "Redo: Completion of task ID '{task_id}' has been reapplied."
        ))
    );
    assert!(after_redo[0].completed);
    assert!(after_redo[0].stopped_at.is_some());
    assert_eq!((session.log().undo_len(), session.log().redo_len()), (2, 0));
}

#[tokio::test]
async fn completing_unknown_task_is_not_recorded() {
    // Arrange
    let (task_store_url, completion_url) = start_services().await;
    let mut session = new_session(&task_store_url, &completion_url);
    let task_id = taskboard_core::TaskId::new();

    // Act
    let status = session.apply_and_record(Intent::MarkComplete(task_id)).await;

    // Assert
    assert_eq!(
        status,
        Status::Failed(format!(
            "Error marking task as complete: task '{task_id}' not found."
        ))
    );
    assert!(session.log().is_empty());
}

#[tokio::test]
async fn redo_colliding_with_live_task_keeps_action_redoable() {
    // Arrange
    let (task_store_url, completion_url) = start_services().await;
    let mut session = new_session(&task_store_url, &completion_url);
    session.apply_and_record(Intent::AddTask(draft("A"))).await;
    let Some(Action::AddTask { task }) = session.log().peek_undo().cloned() else {
        panic!("Expected a recorded AddTask");
    };
    session.undo().await;
    let other_client = HttpTaskStore::new(&task_store_url, TIMEOUT).unwrap();
    other_client.create(&task).await.unwrap();
    let before = session.log().clone();

    // Act
    let status = session.redo().await;

    // Assert
    assert_eq!(
        status,
        Status::Failed(format!(
            "Error redoing add task action: task '{}' already exists.",
            task.id
        ))
    );
    assert_eq!(session.log(), &before);
    assert_eq!(session.tasks().await.unwrap(), vec![task]);
}

#[tokio::test]
async fn unreachable_task_store_fails_without_touching_the_log() {
    // Arrange
    let (_, completion_url) = start_services().await;
    let mut session = new_session("http://127.0.0.1:9", &completion_url);

    // Act
    let status = session.apply_and_record(Intent::AddTask(draft("A"))).await;

    // Assert
    assert_eq!(status, Status::Failed("Error adding task.".to_string()));
    assert!(session.log().is_empty());
    assert_eq!(session.undo().await.message(), "No actions to undo.");
}

#[tokio::test]
async fn completion_success_without_message_is_still_recorded() {
    // Arrange
    let (task_store_url, _) = start_services().await;
    let terse_completion = serve(Router::new().route(
        "/mark_complete",
        post(|| async { axum::Json(serde_json::json!({ "status": "ok" })) }),
    ))
    .await;
    let mut session = new_session(&task_store_url, &terse_completion);
    session.apply_and_record(Intent::AddTask(draft("A"))).await;
    let task_id = session.log().peek_undo().unwrap().task_id();

    // Act
    let completed = session.apply_and_record(Intent::MarkComplete(task_id)).await;
    let undone = session.undo().await;
    let redone = session.redo().await;

    // Assert
    assert_eq!(completed, Status::Done("Task marked as complete!".to_string()));
    assert!(undone.is_done());
    assert!(redone.is_done());
    assert_eq!((session.log().undo_len(), session.log().redo_len()), (2, 0));
    assert_eq!(
        session.log().peek_undo(),
        Some(&Action::MarkComplete { task_id })
    );
}
