//! Read-only views served by the task store and the projection services.
use crate::config::Config;
use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use taskboard_core::wire::{
    FilterQuery, FilteredTasksResponse, ProductivityResponse, RemindersResponse, TaskStats,
};
use taskboard_core::{Error, Task};

#[automock]
#[async_trait]
pub trait Reports: Send + Sync {
    async fn stats(&self) -> Result<TaskStats, Error>;

    /// Percentage of tasks that are completed.
    async fn productivity(&self) -> Result<f64, Error>;

    async fn filter(&self, query: &FilterQuery) -> Result<Vec<Task>, Error>;

    /// Tasks due on or before tomorrow, completed ones included.
    async fn reminders(&self) -> Result<Vec<Task>, Error>;
}

/// `Reports` backed by each service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpReports {
    client: Client,
    task_store_url: String,
    completion_url: String,
    filter_url: String,
    productivity_url: String,
}

impl HttpReports {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        let base = |url: &str| url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            task_store_url: base(&config.task_store_url),
            completion_url: base(&config.completion_url),
            filter_url: base(&config.filter_url),
            productivity_url: base(&config.productivity_url),
        })
    }

    async fn get<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, Error> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Reports for HttpReports {
    #[tracing::instrument(skip(self))]
    async fn stats(&self) -> Result<TaskStats, Error> {
        self.get(self.client.get(format!("{}/stats", self.task_store_url)))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn productivity(&self) -> Result<f64, Error> {
        let body: ProductivityResponse = self
            .get(self.client.get(format!("{}/productivity", self.productivity_url)))
            .await?;
        Ok(body.productivity_percentage)
    }

    #[tracing::instrument(skip(self))]
    async fn filter(&self, query: &FilterQuery) -> Result<Vec<Task>, Error> {
        let body: FilteredTasksResponse = self
            .get(
                self.client
                    .get(format!("{}/filter_tasks", self.filter_url))
                    .query(query),
            )
            .await?;
        Ok(body.filtered_tasks)
    }

    #[tracing::instrument(skip(self))]
    async fn reminders(&self) -> Result<Vec<Task>, Error> {
        let body: RemindersResponse = self
            .get(self.client.get(format!("{}/reminders", self.completion_url)))
            .await?;
        Ok(body.upcoming_tasks)
    }
}
