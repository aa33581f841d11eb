#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{NaiveDate, TimeZone, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use taskboard_core::{Priority, Task, TaskId};
use tower::ServiceExt;

/// Sends a request to the router and returns the status plus the raw body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub async fn get_json<T: DeserializeOwned>(app: &Router, uri: &str) -> (StatusCode, T) {
    let (status, body) = send(app, Method::GET, uri, None).await;
    (status, serde_json::from_str(&body).unwrap())
}

pub async fn post_json<B: Serialize>(app: &Router, uri: &str, body: &B) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, Method::POST, uri, Some(serde_json::to_string(body).unwrap())).await;
    (status, serde_json::from_str(&body).unwrap())
}

/// A pending task created at a fixed instant so timings are deterministic.
pub fn test_task(title: &str, priority: Priority) -> Task {
    Task {
        id: TaskId::new(),
        title: title.to_string(),
        description: format!("{title} description"),
        due_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        priority,
        completed: false,
        created_at: Utc.with_ymd_and_hms(2024, 4, 30, 9, 0, 0).unwrap(),
        stopped_at: None,
    }
}
