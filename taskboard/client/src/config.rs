use serde::Deserialize;
use std::time::Duration;

/// Where the client finds its collaborator services.
#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_task_store_url")]
    pub task_store_url: String,
    #[serde(default = "default_completion_url")]
    pub completion_url: String,
    #[serde(default = "default_filter_url")]
    pub filter_url: String,
    #[serde(default = "default_productivity_url")]
    pub productivity_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_task_store_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_completion_url() -> String {
    "http://localhost:5002".to_string()
}

fn default_filter_url() -> String {
    "http://localhost:5003".to_string()
}

fn default_productivity_url() -> String {
    "http://localhost:5004".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}
