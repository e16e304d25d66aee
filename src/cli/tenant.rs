use std::sync::OnceLock;

use anyhow::Result;
use clap::{Args, Subcommand};
use regex::Regex;
use serde_json::Value;

use crate::api::odata::{append_query, encode_query_value};
use crate::api::M365Client;
use crate::config::Config;
use crate::error::{self, CommandError};

use super::output::print_value;
use super::OutputFormat;

const MESSAGE_LIST_PROPERTIES: &[&str] = &["id", "title"];

fn message_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^MC\d+$").expect("valid message id pattern"))
}

#[derive(Args, Debug)]
pub struct TenantCommand {
    #[command(subcommand)]
    pub command: TenantSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TenantSubcommand {
    /// Microsoft 365 service announcements
    #[command(name = "serviceannouncement")]
    ServiceAnnouncement(ServiceAnnouncementCommand),
}

#[derive(Args, Debug)]
pub struct ServiceAnnouncementCommand {
    #[command(subcommand)]
    pub command: ServiceAnnouncementSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ServiceAnnouncementSubcommand {
    /// Message center posts
    Message(MessageCommand),
}

#[derive(Args, Debug)]
pub struct MessageCommand {
    #[command(subcommand)]
    pub command: MessageSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MessageSubcommand {
    /// Get a message center post
    Get(MessageGetOptions),

    /// List message center posts
    List(MessageListOptions),
}

#[derive(Args, Debug, Clone)]
pub struct MessageGetOptions {
    /// ID of the message, e.g. MC001337
    #[arg(short, long)]
    pub id: String,
}

impl MessageGetOptions {
    pub fn validate(&self) -> error::Result<()> {
        if message_id_regex().is_match(&self.id) {
            Ok(())
        } else {
            Err(CommandError::validation(format!(
                "{} is not a valid message ID",
                self.id
            )))
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct MessageListOptions {
    /// Only list posts for this service, e.g. "Microsoft Teams"
    #[arg(short, long)]
    pub service: Option<String>,
}

pub fn messages_url(client: &M365Client) -> String {
    client.graph("admin/serviceAnnouncement/messages")
}

pub async fn message_get(client: &M365Client, opts: &MessageGetOptions) -> error::Result<Value> {
    client
        .get(&format!("{}/{}", messages_url(client), opts.id))
        .await
}

pub async fn message_list(client: &M365Client, opts: &MessageListOptions) -> error::Result<Value> {
    let mut url = messages_url(client);
    if let Some(service) = &opts.service {
        url = append_query(
            &url,
            &format!(
                "$filter=services/any(c:c eq '{}')",
                encode_query_value(service)
            ),
        );
    }

    Ok(Value::Array(client.get_all(&url).await?))
}

pub async fn execute(cmd: TenantCommand, config: &Config, format: OutputFormat) -> Result<()> {
    let TenantSubcommand::ServiceAnnouncement(announcement) = cmd.command;
    let ServiceAnnouncementSubcommand::Message(message) = announcement.command;

    match message.command {
        MessageSubcommand::Get(opts) => {
            opts.validate()?;
            let client = M365Client::new(config)?;
            let message = message_get(&client, &opts).await?;
            print_value(&message, format, &[]);
        }
        MessageSubcommand::List(opts) => {
            let client = M365Client::new(config)?;
            let messages = message_list(&client, &opts).await?;
            print_value(&messages, format, MESSAGE_LIST_PROPERTIES);
        }
    }

    Ok(())
}
