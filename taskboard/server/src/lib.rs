pub mod config {
    use serde::Deserialize;
    use std::time::Duration;

    /// Which taskboard service this process runs.
    #[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum ServiceKind {
        TaskStore,
        Completion,
        Filter,
        Productivity,
        Users,
    }

    impl ServiceKind {
        /// Port the service listens on when none is configured.
        pub fn default_port(self) -> u16 {
            match self {
                ServiceKind::TaskStore => 5001,
                ServiceKind::Completion => 5002,
                ServiceKind::Filter => 5003,
                ServiceKind::Productivity => 5004,
                ServiceKind::Users => 5006,
            }
        }

        /// Whether the service reads its tasks from a task store.
        pub fn needs_task_store(self) -> bool {
            matches!(
                self,
                ServiceKind::Completion | ServiceKind::Filter | ServiceKind::Productivity
            )
        }
    }

    #[derive(Deserialize, Debug)]
    pub struct Config {
        pub service: ServiceKind,
        #[serde(default)]
        pub port: Option<u16>,
        #[serde(default = "default_task_store_url")]
        pub task_store_url: String,
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

        pub fn port(&self) -> u16 {
            self.port.unwrap_or_else(|| self.service.default_port())
        }

        pub fn request_timeout(&self) -> Duration {
            Duration::from_secs(self.request_timeout_secs)
        }
    }

    fn default_task_store_url() -> String {
        "http://task_store:5001".to_string()
    }

    fn default_request_timeout_secs() -> u64 {
        10
    }

}

pub mod completion;
pub mod filter;
pub mod productivity;
pub mod task;
pub mod user;
pub mod web;
