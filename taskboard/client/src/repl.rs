//! The interactive command loop.
use crate::completion::CompletionService;
use crate::reports::Reports;
use crate::session::{Intent, Session, TaskDraft};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use taskboard_core::wire::FilterQuery;
use taskboard_core::{Priority, Task, TaskId, TaskStore};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "taskboard")]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Due date as YYYY-MM-DD, today when omitted
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(short, long, default_value_t = Priority::Low)]
        priority: Priority,
    },
    /// Mark a task complete
    Complete { id: TaskId },
    /// Revert the most recent action
    Undo,
    /// Reapply the most recently undone action
    Redo,
    /// Show every task in the task store
    List,
    /// Show the undo and redo stacks
    History,
    /// Show task counts and the average completion time
    Stats,
    /// Show the share of completed tasks
    Productivity,
    /// Show tasks matching every given criterion
    Filter {
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(long)]
        completed: Option<bool>,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Show pending tasks due by tomorrow
    Reminders,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parses one input line. Help and usage errors come back as printable text.
pub fn parse(line: &str) -> Result<Command, String> {
    Line::try_parse_from(split_words(line))
        .map(|line| line.command)
        .map_err(|err| err.render().to_string())
}

/// Splits on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut started = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    words.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        words.push(current);
    }
    words
}

fn task_line(task: &Task) -> String {
    format!(
        "{} [{}] {} (priority: {}, due: {})",
        task.id,
        if task.completed { "x" } else { " " },
        task.title,
        task.priority,
        task.due_date
    )
}

fn task_lines(tasks: &[Task], when_empty: &str) -> String {
    if tasks.is_empty() {
        return when_empty.to_string();
    }
    tasks.iter().map(task_line).collect::<Vec<_>>().join("\n")
}

/// Runs a parsed command against the session and writes its outcome.
pub async fn execute<S, C, W>(
    session: &mut Session<S, C>,
    reports: &dyn Reports,
    command: Command,
    output: &mut W,
) -> anyhow::Result<Flow>
where
    S: TaskStore,
    C: CompletionService,
    W: AsyncWrite + Unpin,
{
    let text = match command {
        Command::Add {
            title,
            description,
            due,
            priority,
        } => {
            let draft = TaskDraft {
                title: title.join(" "),
                description,
                due_date: due.unwrap_or_else(|| Utc::now().date_naive()),
                priority,
            };
            session
                .apply_and_record(Intent::AddTask(draft))
                .await
                .to_string()
        }
        Command::Complete { id } => session
            .apply_and_record(Intent::MarkComplete(id))
            .await
            .to_string(),
        Command::Undo => session.undo().await.to_string(),
        Command::Redo => session.redo().await.to_string(),
        Command::List => match session.tasks().await {
            Ok(tasks) => task_lines(&tasks, "No tasks."),
            Err(err) => {
                tracing::warn!("Failed to list tasks: {}", err);
                "Error fetching tasks.".to_string()
            }
        },
        Command::History => serde_json::to_string_pretty(&serde_json::json!({
            "undo": session.log().undo_history(),
            "redo": session.log().redo_history(),
        }))?,
        Command::Stats => match reports.stats().await {
            Ok(stats) => format!(
                "Total tasks: {}\nCompleted tasks: {}\nPending tasks: {}\nAverage completion time: {}",
                stats.total_tasks,
                stats.completed_tasks,
                stats.pending_tasks,
                stats.avg_completion_time
            ),
            Err(err) => {
                tracing::warn!("Failed to fetch stats: {}", err);
                "Error fetching stats.".to_string()
            }
        },
        Command::Productivity => match reports.productivity().await {
            Ok(percentage) => format!("Productivity Percentage: {percentage:.2}%"),
            Err(err) => {
                tracing::warn!("Failed to fetch productivity: {}", err);
                "Error fetching productivity data.".to_string()
            }
        },
        Command::Filter {
            priority,
            completed,
            due,
        } => {
            let query = FilterQuery {
                priority,
                completed,
                due_date: due,
            };
            match reports.filter(&query).await {
                Ok(tasks) => task_lines(&tasks, "No tasks match."),
                Err(err) => {
                    tracing::warn!("Failed to filter tasks: {}", err);
                    "Error filtering tasks.".to_string()
                }
            }
        }
        Command::Reminders => match reports.reminders().await {
            Ok(tasks) => {
                let pending: Vec<Task> = tasks.into_iter().filter(|task| !task.completed).collect();
                task_lines(&pending, "No upcoming tasks.")
            }
            Err(err) => {
                tracing::warn!("Failed to fetch reminders: {}", err);
                "Error fetching reminders.".to_string()
            }
        },
        Command::Quit => return Ok(Flow::Quit),
    };

    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    Ok(Flow::Continue)
}

/// Reads commands line by line until end of input or `quit`.
pub async fn run<S, C, R, W>(
    session: &mut Session<S, C>,
    reports: &dyn Reports,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    S: TaskStore,
    C: CompletionService,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse(&line) {
            Ok(command) => {
                if execute(session, reports, command, &mut output).await? == Flow::Quit {
                    break;
                }
            }
            Err(usage) => output.write_all(usage.as_bytes()).await?,
        }
    }
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::MockCompletionService;
    use crate::reports::MockReports;
    use taskboard_core::MockTaskStore;
    use taskboard_core::wire::TaskStats;

    #[test]
    fn parses_add_with_options() {
        let command = parse(r#"add Buy milk -d "two litres" --due 2024-05-01 -p high"#).unwrap();

        assert_eq!(
            command,
            Command::Add {
                title: vec!["Buy".to_string(), "milk".to_string()],
                description: "two litres".to_string(),
                due: NaiveDate::from_ymd_opt(2024, 5, 1),
                priority: Priority::High,
            }
        );
    }

    #[test]
    fn parses_bare_commands() {
        assert_eq!(parse("undo").unwrap(), Command::Undo);
        assert_eq!(parse("redo").unwrap(), Command::Redo);
        assert_eq!(parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_malformed_task_id() {
        assert!(parse("complete not-a-uuid").is_err());
        assert!(parse("frobnicate").is_err());
    }

    #[test]
    fn splits_quoted_words() {
        assert_eq!(
            split_words(r#"add "Write report" -d """#),
            vec!["add", "Write report", "-d", ""]
        );
    }

    #[tokio::test]
    async fn runs_until_quit() {
        // Arrange
        let mut task_store = MockTaskStore::new();
        task_store.expect_create().times(1).returning(|_| Ok(()));
        task_store.expect_delete().times(1).returning(|_| Ok(()));
        let mut session = Session::new(task_store, MockCompletionService::new());
        let input: &[u8] = b"add Buy milk\nundo\nundo\nquit\nadd ignored\n";
        let mut output = Vec::new();

        // Act
        run(&mut session, &MockReports::new(), input, &mut output).await.unwrap();

        // Assert
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Task 'Buy milk' added successfully!"));
        assert!(output.contains("Undo: Addition of task 'Buy milk' has been reverted."));
        assert!(output.contains("No actions to undo."));
        assert!(!output.contains("ignored"));
        assert_eq!(session.log().redo_len(), 1);
    }

    #[tokio::test]
    async fn lists_tasks_from_store() {
        // Arrange
        let task = Task::new(
            "Write report",
            "",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            Priority::Medium,
        );
        let expected = format!(
            "{} [ ] Write report (priority: medium, due: 2024-05-01)\n",
            task.id
        );
        let mut task_store = MockTaskStore::new();
        task_store
            .expect_list_all()
            .returning(move || Ok(vec![task.clone()]));
        let mut session = Session::new(task_store, MockCompletionService::new());
        let mut output = Vec::new();

        // Act
        let flow = execute(&mut session, &MockReports::new(), Command::List, &mut output)
            .await
            .unwrap();

        // Assert
        assert_eq!(flow, Flow::Continue);
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[tokio::test]
    async fn history_prints_recorded_actions_as_json() {
        // Arrange
        let task_id = TaskId::new();
        let mut completion = MockCompletionService::new();
        completion
            .expect_mark_complete()
            .returning(|_| Ok(Some("Task marked as complete!".to_string())));
        let mut session = Session::new(MockTaskStore::new(), completion);
        session
            .apply_and_record(Intent::MarkComplete(task_id))
            .await;
        let mut output = Vec::new();

        // Act
        execute(&mut session, &MockReports::new(), Command::History, &mut output)
            .await
            .unwrap();

        // Assert
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "undo": [{ "action": "mark_complete", "task_id": task_id.to_string() }],
                "redo": [],
            })
        );
    }

    fn task(title: &str, completed: bool) -> Task {
        let mut task = Task::new(
            title,
            "",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            Priority::Low,
        );
        task.completed = completed;
        task
    }

    async fn report(reports: MockReports, command: Command) -> String {
        let mut session = Session::new(MockTaskStore::new(), MockCompletionService::new());
        let mut output = Vec::new();
        execute(&mut session, &reports, command, &mut output)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parses_filter_criteria() {
        assert_eq!(
            parse("filter -p high --completed false").unwrap(),
            Command::Filter {
                priority: Some(Priority::High),
                completed: Some(false),
                due: None,
            }
        );
        assert_eq!(
            parse("filter").unwrap(),
            Command::Filter {
                priority: None,
                completed: None,
                due: None,
            }
        );
    }

    #[tokio::test]
    async fn prints_stats() {
        let mut reports = MockReports::new();
        reports.expect_stats().returning(|| {
            Ok(TaskStats {
                total_tasks: 4,
                completed_tasks: 1,
                pending_tasks: 3,
                avg_completion_time: "1 min 30 sec".to_string(),
            })
        });

        let output = report(reports, Command::Stats).await;

        assert_eq!(
            output,
            "Total tasks: 4\nCompleted tasks: 1\nPending tasks: 3\nAverage completion time: 1 min 30 sec\n"
        );
    }

    #[tokio::test]
    async fn prints_productivity_with_two_decimals() {
        let mut reports = MockReports::new();
        reports.expect_productivity().returning(|| Ok(100.0 / 3.0));

        let output = report(reports, Command::Productivity).await;

        assert_eq!(output, "Productivity Percentage: 33.33%\n");
    }

    #[tokio::test]
    async fn forwards_filter_criteria() {
        let matching = task("Write report", false);
        let expected = format!("{}\n", task_line(&matching));
        let mut reports = MockReports::new();
        reports
            .expect_filter()
            .withf(|query| {
                *query
                    == FilterQuery {
                        priority: Some(Priority::Low),
                        completed: None,
                        due_date: None,
                    }
            })
            .returning(move |_| Ok(vec![matching.clone()]));

        let output = report(
            reports,
            Command::Filter {
                priority: Some(Priority::Low),
                completed: None,
                due: None,
            },
        )
        .await;

        assert_eq!(output, expected);
    }

    #[tokio::test]
    async fn reminders_leave_out_completed_tasks() {
        let mut reports = MockReports::new();
        reports
            .expect_reminders()
            .returning(|| Ok(vec![task("Done already", true), task("Still open", false)]));

        let output = report(reports, Command::Reminders).await;

        assert!(output.contains("Still open"));
        assert!(!output.contains("Done already"));
    }

    #[tokio::test]
    async fn report_failures_print_an_error_line() {
        let mut reports = MockReports::new();
        reports
            .expect_reminders()
            .returning(|| Err(taskboard_core::Error::Status(500)));

        let output = report(reports, Command::Reminders).await;

        assert_eq!(output, "Error fetching reminders.\n");
    }
}
