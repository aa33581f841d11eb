//! Task store connectivity.
//!
//! The `TaskStore` trait is the only way other components touch task records.
//! `HttpTaskStore` talks to a running task store service; tests substitute the
//! generated `MockTaskStore`.

use crate::error::Error;
use crate::task::{Task, TaskId, TaskPatch};
use crate::wire::{TaskIdRequest, TasksResponse, UpdateTaskRequest};
use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Remote operations offered by the task store.
#[automock]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task under its caller-supplied id.
    ///
    /// Fails with `Error::AlreadyExists` if the id is already live.
    async fn create(&self, task: &Task) -> Result<(), Error>;

    /// Returns every live task in insertion order.
    async fn list_all(&self) -> Result<Vec<Task>, Error>;

    /// Merges `patch` into the task with the given id.
    ///
    /// Fails with `Error::NotFound` if no such task exists.
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), Error>;

    /// Removes the task with the given id. Removing an absent id succeeds.
    async fn delete(&self, id: &TaskId) -> Result<(), Error>;
}

/// `TaskStore` backed by the task store's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    base_url: String,
}

impl HttpTaskStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    #[tracing::instrument(skip(self, task), fields(task_id = %task.id))]
    async fn create(&self, task: &Task) -> Result<(), Error> {
        let response = self
            .client
            .post(self.url("/add_task"))
            .json(task)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(Error::AlreadyExists(task.id)),
            status => Err(Error::Status(status.as_u16())),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Task>, Error> {
        let response = self.client.get(self.url("/view_tasks")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        let body: TasksResponse = response.json().await?;
        Ok(body.tasks)
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), Error> {
        let request = UpdateTaskRequest {
            id: *id,
            patch: patch.clone(),
        };
        let response = self
            .client
            .post(self.url("/update_task"))
            .json(&request)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(Error::NotFound(*id)),
            status => Err(Error::Status(status.as_u16())),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &TaskId) -> Result<(), Error> {
        let response = self
            .client
            .post(self.url("/delete_task"))
            .json(&TaskIdRequest { id: *id })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Status(status.as_u16()))
        }
    }
}
