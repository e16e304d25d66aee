use anyhow::Result;
use clap::{ArgGroup, Args, Subcommand};
use serde_json::Value;
use url::Url;

use crate::api::odata::{append_query, encode_query_value};
use crate::api::M365Client;
use crate::config::Config;
use crate::error::{self, CommandError};
use crate::validation::{is_valid_sharepoint_url, require_guid};

use super::output::print_value;
use super::OutputFormat;

const FIELD_LIST_PROPERTIES: &[&str] = &["Id", "Title", "InternalName", "Hidden"];

#[derive(Args, Debug)]
pub struct SpoCommand {
    #[command(subcommand)]
    pub command: SpoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SpoSubcommand {
    /// Site and list columns
    Field(FieldCommand),
}

#[derive(Args, Debug)]
pub struct FieldCommand {
    #[command(subcommand)]
    pub command: FieldSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FieldSubcommand {
    /// List the columns of a site or list
    List(FieldListOptions),
}

#[derive(Args, Debug, Clone, Default)]
#[command(group(ArgGroup::new("list").multiple(false).args(["list_id", "list_title", "list_url"])))]
pub struct FieldListOptions {
    /// Absolute URL of the site
    #[arg(short = 'u', long)]
    pub web_url: String,

    /// ID of the list to list columns of
    #[arg(long)]
    pub list_id: Option<String>,

    /// Title of the list to list columns of
    #[arg(long)]
    pub list_title: Option<String>,

    /// Server- or site-relative URL of the list
    #[arg(long)]
    pub list_url: Option<String>,

    /// Comma-separated properties to retrieve
    #[arg(short, long)]
    pub properties: Option<String>,

    /// OData filter to apply
    #[arg(long)]
    pub filter: Option<String>,
}

impl FieldListOptions {
    pub fn validate(&self) -> error::Result<()> {
        if !is_valid_sharepoint_url(&self.web_url) {
            return Err(CommandError::validation(format!(
                "{} is not a valid SharePoint URL",
                self.web_url
            )));
        }

        if let Some(list_id) = &self.list_id {
            require_guid(list_id)?;
        }

        let lists = [&self.list_id, &self.list_title, &self.list_url]
            .iter()
            .filter(|o| o.is_some())
            .count();
        if lists > 1 {
            return Err(CommandError::validation(
                "Specify only one of --list-id, --list-title or --list-url",
            ));
        }

        Ok(())
    }
}

/// Server-relative form of `list_url`, resolved against the site at `web_url`.
pub fn server_relative_path(web_url: &str, list_url: &str) -> error::Result<String> {
    if list_url.starts_with('/') {
        return Ok(list_url.trim_end_matches('/').to_string());
    }

    if list_url.starts_with("https://") || list_url.starts_with("http://") {
        let parsed = Url::parse(list_url)
            .map_err(|e| CommandError::validation(format!("{} is not a valid URL: {}", list_url, e)))?;
        let path = urlencoding::decode(parsed.path())
            .map_err(|e| CommandError::validation(format!("{} is not a valid URL: {}", list_url, e)))?;
        return Ok(path.trim_end_matches('/').to_string());
    }

    let web = Url::parse(web_url)
        .map_err(|e| CommandError::validation(format!("{} is not a valid URL: {}", web_url, e)))?;
    Ok(format!(
        "{}/{}",
        web.path().trim_end_matches('/'),
        list_url.trim_matches('/')
    ))
}

/// Fields endpoint for the site, or for the list the options select
pub fn fields_url(opts: &FieldListOptions) -> error::Result<String> {
    let web_url = opts.web_url.trim_end_matches('/');

    let mut url = if let Some(id) = &opts.list_id {
        format!("{}/_api/web/lists(guid'{}')/fields", web_url, encode_query_value(id))
    } else if let Some(title) = &opts.list_title {
        format!(
            "{}/_api/web/lists/getByTitle('{}')/fields",
            web_url,
            encode_query_value(title)
        )
    } else if let Some(list_url) = &opts.list_url {
        format!(
            "{}/_api/web/GetList('{}')/fields",
            web_url,
            encode_query_value(&server_relative_path(web_url, list_url)?)
        )
    } else {
        format!("{}/_api/web/fields", web_url)
    };

    if let Some(properties) = &opts.properties {
        url = append_query(&url, &format!("$select={}", urlencoding::encode(properties)));
    }
    if let Some(filter) = &opts.filter {
        url = append_query(&url, &format!("$filter={}", urlencoding::encode(filter)));
    }

    Ok(url)
}

pub async fn field_list(client: &M365Client, opts: &FieldListOptions) -> error::Result<Value> {
    let url = fields_url(opts)?;
    Ok(Value::Array(client.get_all(&url).await?))
}

pub async fn execute(cmd: SpoCommand, config: &Config, format: OutputFormat) -> Result<()> {
    let SpoSubcommand::Field(field) = cmd.command;

    match field.command {
        FieldSubcommand::List(opts) => {
            opts.validate()?;
            let client = M365Client::new(config)?;
            let fields = field_list(&client, &opts).await?;
            print_value(&fields, format, FIELD_LIST_PROPERTIES);
        }
    }

    Ok(())
}
