use taskboard_client::config::Config;
use taskboard_client::repl;
use taskboard_client::{HttpCompletionService, HttpReports, Session};
use taskboard_core::HttpTaskStore;
use tokio::io::{BufReader, stdin, stdout};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let config = Config::from_env()?;

    let task_store = HttpTaskStore::new(&config.task_store_url, config.request_timeout())?;
    let completion = HttpCompletionService::new(&config.completion_url, config.request_timeout())?;
    let reports = HttpReports::new(&config)?;
    let mut session = Session::new(task_store, completion);

    repl::run(&mut session, &reports, BufReader::new(stdin()), stdout()).await
}
