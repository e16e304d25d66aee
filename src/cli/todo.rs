use anyhow::Result;
use clap::{ArgGroup, Args, Subcommand};
use serde_json::Value;

use crate::api::M365Client;
use crate::config::Config;
use crate::error;
use crate::types::{DateTimeTimeZone, ItemBody, TodoTaskUpdate};
use crate::validation::{id_or_name, require_iso_date_time, require_one_of, split_list, IdOrName};

use super::output::print_value;
use super::OutputFormat;

const STATUSES: &[&str] = &["notStarted", "inProgress", "completed", "waitingOnOthers", "deferred"];
const IMPORTANCES: &[&str] = &["low", "normal", "high"];
const BODY_CONTENT_TYPES: &[&str] = &["text", "html"];

#[derive(Args, Debug)]
pub struct TodoCommand {
    #[command(subcommand)]
    pub command: TodoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TodoSubcommand {
    /// Microsoft To Do tasks
    Task(TaskCommand),
}

#[derive(Args, Debug)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TaskSubcommand {
    /// Update a task
    Set(TaskSetOptions),
}

#[derive(Args, Debug, Clone, Default)]
#[command(group(ArgGroup::new("list").required(true).args(["list_id", "list_name"])))]
pub struct TaskSetOptions {
    /// ID of the task
    #[arg(short, long)]
    pub id: String,

    /// ID of the task list
    #[arg(long)]
    pub list_id: Option<String>,

    /// Display name of the task list
    #[arg(long)]
    pub list_name: Option<String>,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// notStarted, inProgress, completed, waitingOnOthers or deferred
    #[arg(short, long)]
    pub status: Option<String>,

    #[arg(long)]
    pub body_content: Option<String>,

    /// text or html; defaults to text
    #[arg(long)]
    pub body_content_type: Option<String>,

    /// low, normal or high
    #[arg(long)]
    pub importance: Option<String>,

    #[arg(long)]
    pub due_date_time: Option<String>,

    #[arg(long)]
    pub reminder_date_time: Option<String>,

    #[arg(long)]
    pub start_date_time: Option<String>,

    #[arg(long)]
    pub completed_date_time: Option<String>,

    /// Comma-separated categories
    #[arg(long)]
    pub categories: Option<String>,
}

impl TaskSetOptions {
    pub fn validate(&self) -> error::Result<()> {
        id_or_name(
            self.list_id.as_deref(),
            self.list_name.as_deref(),
            "--list-id",
            "--list-name",
        )?;

        if let Some(status) = &self.status {
            require_one_of(status, STATUSES)?;
        }
        if let Some(importance) = &self.importance {
            require_one_of(&importance.to_lowercase(), IMPORTANCES)?;
        }
        if let Some(content_type) = &self.body_content_type {
            require_one_of(&content_type.to_lowercase(), BODY_CONTENT_TYPES)?;
        }

        let dates = [
            ("--due-date-time", &self.due_date_time),
            ("--reminder-date-time", &self.reminder_date_time),
            ("--start-date-time", &self.start_date_time),
            ("--completed-date-time", &self.completed_date_time),
        ];
        for (option, value) in dates {
            if let Some(value) = value {
                require_iso_date_time(option, value)?;
            }
        }

        Ok(())
    }
}

/// PATCH payload carrying only the options that were given
pub fn task_update(opts: &TaskSetOptions) -> TodoTaskUpdate {
    let date = |value: &Option<String>| value.as_deref().map(DateTimeTimeZone::gmt);

    TodoTaskUpdate {
        title: opts.title.clone(),
        status: opts.status.clone(),
        body: opts.body_content.as_ref().map(|content| ItemBody {
            content: content.clone(),
            content_type: opts
                .body_content_type
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_else(|| "text".to_string()),
        }),
        importance: opts.importance.as_deref().map(str::to_lowercase),
        due_date_time: date(&opts.due_date_time),
        reminder_date_time: date(&opts.reminder_date_time),
        start_date_time: date(&opts.start_date_time),
        completed_date_time: date(&opts.completed_date_time),
        categories: opts.categories.as_deref().map(split_list),
    }
}

pub async fn task_set(client: &M365Client, opts: &TaskSetOptions) -> error::Result<Value> {
    let list_id = match id_or_name(
        opts.list_id.as_deref(),
        opts.list_name.as_deref(),
        "--list-id",
        "--list-name",
    )? {
        IdOrName::Id(id) => id.to_string(),
        IdOrName::Name(name) => client.todo_list_id_by_name(name).await?,
    };

    let url = client.graph(&format!("me/todo/lists/{}/tasks/{}", list_id, opts.id));
    client.patch(&url, &task_update(opts)).await
}

pub async fn execute(cmd: TodoCommand, config: &Config, format: OutputFormat) -> Result<()> {
    let TodoSubcommand::Task(task) = cmd.command;

    match task.command {
        TaskSubcommand::Set(opts) => {
            opts.validate()?;
            let client = M365Client::new(config)?;
            let task = task_set(&client, &opts).await?;
            print_value(&task, format, &[]);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts() -> TaskSetOptions {
        TaskSetOptions {
            id: "abc".to_string(),
            title: Some("New task".to_string()),
            list_name: Some("Tasks List".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_options() {
        let mut o = opts();
        o.status = Some("notStarted".to_string());
        o.importance = Some("high".to_string());
        o.due_date_time = Some("2023-01-01".to_string());
        assert!(o.validate().is_ok());
    }

    #[test]
    fn test_list_id_and_name() {
        let mut o = opts();
        o.list_id = Some("AQMkADlhMTRk".to_string());
        assert!(o.validate().is_err());

        let mut o = opts();
        o.list_name = None;
        assert!(o.validate().is_err());
    }

    #[test]
    fn test_invalid_status() {
        let mut o = opts();
        o.status = Some("test".to_string());
        assert_eq!(
            o.validate().unwrap_err().to_string(),
            "test is not a valid value. Allowed values are notStarted|inProgress|completed|waitingOnOthers|deferred"
        );
    }

    #[test]
    fn test_invalid_importance_and_content_type() {
        let mut o = opts();
        o.importance = Some("invalid".to_string());
        assert!(o.validate().is_err());

        let mut o = opts();
        o.body_content_type = Some("invalid".to_string());
        assert!(o.validate().is_err());
    }

    #[test]
    fn test_invalid_dates() {
        let mut o = opts();
        o.due_date_time = Some("01/01/2022".to_string());
        assert_eq!(
            o.validate().unwrap_err().to_string(),
            "01/01/2022 is not a valid ISO date string for option --due-date-time"
        );

        let setters: [fn(&mut TaskSetOptions); 3] = [
            |o| o.reminder_date_time = Some("01/01/2022".to_string()),
            |o| o.start_date_time = Some("01/01/2022".to_string()),
            |o| o.completed_date_time = Some("01/01/2022".to_string()),
        ];
        for set in setters {
            let mut o = opts();
            set(&mut o);
            assert!(o.validate().is_err());
        }
    }

    #[test]
    fn test_update_only_given_fields() {
        let body = serde_json::to_value(task_update(&opts())).unwrap();
        assert_eq!(body, json!({"title": "New task"}));
    }

    #[test]
    fn test_update_body_defaults_to_text() {
        let mut o = opts();
        o.body_content = Some("Lorem ipsum".to_string());
        let update = task_update(&o);
        assert_eq!(update.body.unwrap().content_type, "text");

        o.body_content = Some("<h3>Lorem ipsum</h3>".to_string());
        o.body_content_type = Some("html".to_string());
        let body = task_update(&o).body.unwrap();
        assert_eq!(body.content, "<h3>Lorem ipsum</h3>");
        assert_eq!(body.content_type, "html");
    }

    #[test]
    fn test_update_dates_and_categories() {
        let mut o = opts();
        o.due_date_time = Some("2023-01-01".to_string());
        o.completed_date_time = Some("2023-01-02T10:00:00".to_string());
        o.categories = Some("None,Preset24".to_string());

        let body = serde_json::to_value(task_update(&o)).unwrap();
        assert_eq!(
            body["dueDateTime"],
            json!({"dateTime": "2023-01-01", "timeZone": "Etc/GMT"})
        );
        assert_eq!(
            body["completedDateTime"],
            json!({"dateTime": "2023-01-02T10:00:00", "timeZone": "Etc/GMT"})
        );
        assert_eq!(body["categories"], json!(["None", "Preset24"]));
    }
}
