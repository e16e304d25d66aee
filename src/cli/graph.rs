use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::api::odata::encode_path_segment;
use crate::api::M365Client;
use crate::config::Config;
use crate::error;

use super::output::print_value;
use super::OutputFormat;

#[derive(Args, Debug)]
pub struct GraphCommand {
    #[command(subcommand)]
    pub command: GraphSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum GraphSubcommand {
    /// Microsoft Graph schema extensions
    #[command(name = "schemaextension")]
    SchemaExtension(SchemaExtensionCommand),
}

#[derive(Args, Debug)]
pub struct SchemaExtensionCommand {
    #[command(subcommand)]
    pub command: SchemaExtensionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SchemaExtensionSubcommand {
    /// Get a schema extension definition
    Get(SchemaExtensionGetOptions),
}

#[derive(Args, Debug, Clone)]
pub struct SchemaExtensionGetOptions {
    /// ID of the schema extension
    #[arg(short, long)]
    pub id: String,
}

pub async fn schema_extension_get(
    client: &M365Client,
    opts: &SchemaExtensionGetOptions,
) -> error::Result<Value> {
    let url = client.graph(&format!(
        "schemaExtensions/{}",
        encode_path_segment(&opts.id)
    ));
    client.get(&url).await
}

pub async fn execute(cmd: GraphCommand, config: &Config, format: OutputFormat) -> Result<()> {
    let GraphSubcommand::SchemaExtension(extension) = cmd.command;

    match extension.command {
        SchemaExtensionSubcommand::Get(opts) => {
            let client = M365Client::new(config)?;
            let extension = schema_extension_get(&client, &opts).await?;
            print_value(&extension, format, &[]);
        }
    }

    Ok(())
}
