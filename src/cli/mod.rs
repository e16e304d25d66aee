pub mod auth;
pub mod completions;
pub mod context;
pub mod entra;
pub mod graph;
pub mod output;
pub mod spo;
pub mod teams;
pub mod tenant;
pub mod todo;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Manage Microsoft 365 from the command line
#[derive(Parser, Debug)]
#[command(name = "m365")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (default: output.default_format from the config file)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Log requests and lookups to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in to Microsoft 365
    Auth(auth::AuthCommand),

    /// Project context stored in .m365rc.json
    Context(context::ContextCommand),

    /// Microsoft Entra ID settings
    Entra(entra::EntraCommand),

    /// Microsoft Graph metadata
    Graph(graph::GraphCommand),

    /// SharePoint Online
    Spo(spo::SpoCommand),

    /// Microsoft Teams
    Teams(teams::TeamsCommand),

    /// Tenant-wide information
    Tenant(tenant::TenantCommand),

    /// Microsoft To Do
    Todo(todo::TodoCommand),

    /// Generate shell completions
    Completions(completions::CompletionsCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Response as returned by the API
    #[default]
    Json,
    /// Grid of the most relevant properties
    Table,
    /// One line per item, values separated by |
    Plain,
}

impl Cli {
    /// `--format`, falling back to the configured default
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.format.unwrap_or(config.output.default_format)
    }
}

pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    let format = cli.output_format(config);

    match cli.command {
        Commands::Auth(cmd) => auth::execute(cmd, config).await,
        Commands::Context(cmd) => context::execute(cmd, format),
        Commands::Entra(cmd) => entra::execute(cmd, config, format).await,
        Commands::Graph(cmd) => graph::execute(cmd, config, format).await,
        Commands::Spo(cmd) => spo::execute(cmd, config, format).await,
        Commands::Teams(cmd) => teams::execute(cmd, config, format).await,
        Commands::Tenant(cmd) => tenant::execute(cmd, config, format).await,
        Commands::Todo(cmd) => todo::execute(cmd, config, format).await,
        Commands::Completions(cmd) => completions::execute(cmd),
    }
}
