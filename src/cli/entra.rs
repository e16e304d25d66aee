use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::api::M365Client;
use crate::config::Config;
use crate::error::{self, CommandError};
use crate::types::{GroupSetting, SettingValue};
use crate::validation::split_list;

use super::output::print_value;
use super::OutputFormat;

const UNIFIED_GROUP_SETTING: &str = "Group.Unified";

#[derive(Args, Debug)]
pub struct EntraCommand {
    #[command(subcommand)]
    pub command: EntraSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum EntraSubcommand {
    /// Site classification of Microsoft 365 groups
    #[command(name = "siteclassification")]
    SiteClassification(SiteClassificationCommand),
}

#[derive(Args, Debug)]
pub struct SiteClassificationCommand {
    #[command(subcommand)]
    pub command: SiteClassificationSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SiteClassificationSubcommand {
    /// Enable site classification
    Enable(SiteClassificationEnableOptions),

    /// Show the site classification configuration
    Get,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SiteClassificationEnableOptions {
    /// Comma-separated classifications, e.g. "High, Medium, Low"
    #[arg(short, long)]
    pub classifications: String,

    /// Classification applied when none is picked
    #[arg(short, long)]
    pub default_classification: String,

    /// URL of the usage guidelines for members
    #[arg(short, long)]
    pub usage_guidelines_url: Option<String>,

    /// URL of the usage guidelines for guests
    #[arg(short, long)]
    pub guest_usage_guidelines_url: Option<String>,
}

/// Group setting that enables classification, built from the unified group template.
///
/// Every template value is carried over with its default, except the
/// classification list and default classification, and the guideline urls
/// when they are given.
pub fn build_group_setting(
    template: &GroupSetting,
    opts: &SiteClassificationEnableOptions,
) -> GroupSetting {
    let values = template
        .values
        .iter()
        .map(|setting| {
            let value = match setting.name.as_str() {
                "ClassificationList" => Some(opts.classifications.clone()),
                "DefaultClassification" => Some(opts.default_classification.clone()),
                "UsageGuidelinesUrl" => opts
                    .usage_guidelines_url
                    .clone()
                    .or_else(|| setting.default_value.clone()),
                "GuestUsageGuidelinesUrl" => opts
                    .guest_usage_guidelines_url
                    .clone()
                    .or_else(|| setting.default_value.clone()),
                _ => setting.default_value.clone(),
            };
            SettingValue {
                name: setting.name.clone(),
                value,
                default_value: None,
            }
        })
        .collect();

    GroupSetting {
        template_id: template.id.clone(),
        values,
        ..Default::default()
    }
}

fn find_unified(settings: Vec<GroupSetting>) -> Option<GroupSetting> {
    settings
        .into_iter()
        .find(|s| s.display_name.as_deref() == Some(UNIFIED_GROUP_SETTING))
}

async fn group_settings(client: &M365Client, path: &str) -> error::Result<Vec<GroupSetting>> {
    client
        .get_all(&client.graph(path))
        .await?
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(CommandError::from))
        .collect()
}

pub async fn enable(
    client: &M365Client,
    opts: &SiteClassificationEnableOptions,
) -> error::Result<()> {
    let template = find_unified(group_settings(client, "groupSettingTemplates").await?)
        .ok_or_else(|| {
            CommandError::not_found(format!(
                "Missing DirectorySettingTemplate for \"{}\"",
                UNIFIED_GROUP_SETTING
            ))
        })?;

    let setting = build_group_setting(&template, opts);
    client.post(&client.graph("groupSettings"), &setting).await?;
    Ok(())
}

pub async fn get(client: &M365Client) -> error::Result<Value> {
    let setting = find_unified(group_settings(client, "groupSettings").await?)
        .ok_or_else(|| CommandError::not_found("Site classification is not enabled."))?;

    let value = |name: &str| setting.value_of(name).unwrap_or_default().to_string();
    Ok(json!({
        "Classifications": split_list(&value("ClassificationList")),
        "DefaultClassification": value("DefaultClassification"),
        "UsageGuidelinesUrl": value("UsageGuidelinesUrl"),
        "GuestUsageGuidelinesUrl": value("GuestUsageGuidelinesUrl"),
    }))
}

pub async fn execute(cmd: EntraCommand, config: &Config, format: OutputFormat) -> Result<()> {
    let EntraSubcommand::SiteClassification(classification) = cmd.command;
    let client = M365Client::new(config)?;

    match classification.command {
        SiteClassificationSubcommand::Enable(opts) => enable(&client, &opts).await?,
        SiteClassificationSubcommand::Get => {
            let classification = get(&client).await?;
            print_value(&classification, format, &[]);
        }
    }

    Ok(())
}
