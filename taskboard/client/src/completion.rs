//! Completion service connectivity.
use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use taskboard_core::wire::{MessageResponse, TaskIdRequest};
use taskboard_core::{Error, TaskId};

/// Remote operations offered by the completion service.
#[automock]
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Marks a task complete via the service's read-modify-write against the
    /// task store, returning the service's confirmation message if it sent one.
    ///
    /// Any 2xx status counts as success, whatever the body holds.
    async fn mark_complete(&self, id: &TaskId) -> Result<Option<String>, Error>;
}

/// `CompletionService` backed by the completion service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCompletionService {
    client: Client,
    base_url: String,
}

impl HttpCompletionService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    #[tracing::instrument(skip(self))]
    async fn mark_complete(&self, id: &TaskId) -> Result<Option<String>, Error> {
        let response = self
            .client
            .post(format!("{}/mark_complete", self.base_url))
            .json(&TaskIdRequest { id: *id })
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response
                .json::<MessageResponse>()
                .await
                .inspect_err(|err| tracing::debug!("Ignoring completion body: {}", err))
                .ok()
                .map(|body| body.message)),
            StatusCode::NOT_FOUND => Err(Error::NotFound(*id)),
            status => Err(Error::Status(status.as_u16())),
        }
    }
}
