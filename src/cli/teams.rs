use anyhow::Result;
use clap::{ArgGroup, Args, Subcommand};
use serde_json::Value;

use crate::api::odata::encode_path_segment;
use crate::api::M365Client;
use crate::config::Config;
use crate::error::{self, CommandError};
use crate::validation::{id_or_name, is_valid_teams_channel_id, require_guid, IdOrName};

use super::output::print_value;
use super::OutputFormat;

const TAB_LIST_PROPERTIES: &[&str] = &["id", "displayName", "teamsAppTabId"];

#[derive(Args, Debug)]
pub struct TeamsCommand {
    #[command(subcommand)]
    pub command: TeamsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TeamsSubcommand {
    /// Manage channel tabs
    Tab(TabCommand),
}

#[derive(Args, Debug)]
pub struct TabCommand {
    #[command(subcommand)]
    pub command: TabSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TabSubcommand {
    /// Get a tab of a channel
    Get(TabGetOptions),

    /// List the tabs of a channel
    List(TabListOptions),
}

/// Team and channel a tab command operates on
#[derive(Args, Debug, Clone, Default)]
#[command(group(ArgGroup::new("team").required(true).args(["team_id", "team_name"])))]
#[command(group(ArgGroup::new("channel").required(true).args(["channel_id", "channel_name"])))]
pub struct ChannelSelector {
    /// ID of the team
    #[arg(long)]
    pub team_id: Option<String>,

    /// Display name of the team
    #[arg(long)]
    pub team_name: Option<String>,

    /// ID of the channel (19:...@thread.skype)
    #[arg(long)]
    pub channel_id: Option<String>,

    /// Display name of the channel
    #[arg(long)]
    pub channel_name: Option<String>,
}

impl ChannelSelector {
    pub fn validate(&self) -> error::Result<()> {
        match id_or_name(
            self.team_id.as_deref(),
            self.team_name.as_deref(),
            "--team-id",
            "--team-name",
        )? {
            IdOrName::Id(id) => require_guid(id)?,
            IdOrName::Name(_) => {}
        }

        match id_or_name(
            self.channel_id.as_deref(),
            self.channel_name.as_deref(),
            "--channel-id",
            "--channel-name",
        )? {
            IdOrName::Id(id) if !is_valid_teams_channel_id(id) => {
                return Err(CommandError::validation(format!(
                    "{} is not a valid Teams ChannelId",
                    id
                )))
            }
            _ => {}
        }

        Ok(())
    }

    /// Resolve team and channel names to their ids
    pub async fn resolve(&self, client: &M365Client) -> error::Result<(String, String)> {
        let team_id = match id_or_name(
            self.team_id.as_deref(),
            self.team_name.as_deref(),
            "--team-id",
            "--team-name",
        )? {
            IdOrName::Id(id) => id.to_string(),
            IdOrName::Name(name) => client.team_id_by_name(name).await?,
        };

        let channel_id = match id_or_name(
            self.channel_id.as_deref(),
            self.channel_name.as_deref(),
            "--channel-id",
            "--channel-name",
        )? {
            IdOrName::Id(id) => id.to_string(),
            IdOrName::Name(name) => client.channel_id_by_name(&team_id, name).await?,
        };

        Ok((team_id, channel_id))
    }
}

#[derive(Args, Debug, Clone, Default)]
#[command(group(ArgGroup::new("tab").required(true).args(["id", "name"])))]
pub struct TabGetOptions {
    #[command(flatten)]
    pub channel: ChannelSelector,

    /// ID of the tab
    #[arg(short, long)]
    pub id: Option<String>,

    /// Display name of the tab
    #[arg(short, long)]
    pub name: Option<String>,
}

impl TabGetOptions {
    pub fn validate(&self) -> error::Result<()> {
        self.channel.validate()?;
        match id_or_name(self.id.as_deref(), self.name.as_deref(), "--id", "--name")? {
            IdOrName::Id(id) => require_guid(id),
            IdOrName::Name(_) => Ok(()),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct TabListOptions {
    #[command(flatten)]
    pub channel: ChannelSelector,
}

pub fn tabs_url(client: &M365Client, team_id: &str, channel_id: &str) -> String {
    client.graph(&format!(
        "teams/{}/channels/{}/tabs",
        team_id,
        encode_path_segment(channel_id)
    ))
}

pub fn tab_url(client: &M365Client, team_id: &str, channel_id: &str, tab_id: &str) -> String {
    format!(
        "{}/{}?$expand=teamsApp",
        tabs_url(client, team_id, channel_id),
        tab_id
    )
}

/// Get a channel tab, resolving any names given instead of ids
pub async fn tab_get(client: &M365Client, opts: &TabGetOptions) -> error::Result<Value> {
    let (team_id, channel_id) = opts.channel.resolve(client).await?;

    let tab_id = match id_or_name(opts.id.as_deref(), opts.name.as_deref(), "--id", "--name")? {
        IdOrName::Id(id) => id.to_string(),
        IdOrName::Name(name) => client.tab_id_by_name(&team_id, &channel_id, name).await?,
    };

    client
        .get(&tab_url(client, &team_id, &channel_id, &tab_id))
        .await
}

pub async fn tab_list(client: &M365Client, opts: &TabListOptions) -> error::Result<Value> {
    let (team_id, channel_id) = opts.channel.resolve(client).await?;
    let url = format!("{}?$expand=teamsApp", tabs_url(client, &team_id, &channel_id));
    let tabs = client.get_all(&url).await?;

    // teamsApp is expanded inline; surface its id for table output
    let tabs = tabs
        .into_iter()
        .map(|mut tab| {
            let app_id = tab
                .pointer("/teamsApp/id")
                .cloned()
                .unwrap_or(Value::Null);
            if let Some(obj) = tab.as_object_mut() {
                obj.insert("teamsAppTabId".to_string(), app_id);
            }
            tab
        })
        .collect();

    Ok(Value::Array(tabs))
}

pub async fn execute(cmd: TeamsCommand, config: &Config, format: OutputFormat) -> Result<()> {
    match cmd.command {
        TeamsSubcommand::Tab(tab) => match tab.command {
            TabSubcommand::Get(opts) => {
                opts.validate()?;
                let client = M365Client::new(config)?;
                let tab = tab_get(&client, &opts).await?;
                print_value(&tab, format, &[]);
            }
            TabSubcommand::List(opts) => {
                opts.channel.validate()?;
                let client = M365Client::new(config)?;
                let tabs = tab_list(&client, &opts).await?;
                print_value(&tabs, format, TAB_LIST_PROPERTIES);
            }
        },
    }

    Ok(())
}
