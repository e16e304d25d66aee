use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{Map, Value};

use crate::context::{
    context_options, context_path, remove_context, remove_context_option, save_context_info,
    set_context_option,
};

use super::output::{print_info, print_success, print_value, print_warning};
use super::OutputFormat;

#[derive(Args, Debug)]
pub struct ContextCommand {
    #[command(subcommand)]
    pub command: ContextSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ContextSubcommand {
    /// Create the context in .m365rc.json
    Init,

    /// Remove the context from .m365rc.json
    Remove {
        /// Don't prompt for confirmation
        #[arg(long)]
        force: bool,
    },

    /// Manage saved context options
    Option(OptionCommand),
}

#[derive(Args, Debug)]
pub struct OptionCommand {
    #[command(subcommand)]
    pub command: OptionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum OptionSubcommand {
    /// List saved options
    List,

    /// Save an option value
    Set {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        value: String,
    },

    /// Remove a saved option
    Remove {
        #[arg(short, long)]
        name: String,

        /// Don't prompt for confirmation
        #[arg(long)]
        force: bool,
    },
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn execute(cmd: ContextCommand, format: OutputFormat) -> Result<()> {
    let path = context_path();

    match cmd.command {
        ContextSubcommand::Init => {
            save_context_info(&path, &Map::new())?;
        }
        ContextSubcommand::Remove { force } => {
            if !force && !confirm("Are you sure you want to remove the context?")? {
                print_info("Context not removed");
                return Ok(());
            }
            if remove_context(&path)? {
                print_success("Context removed");
            } else {
                print_warning("No context to remove");
            }
        }
        ContextSubcommand::Option(option) => match option.command {
            OptionSubcommand::List => {
                print_value(&Value::Object(context_options(&path)?), format, &[]);
            }
            OptionSubcommand::Set { name, value } => {
                set_context_option(&path, &name, &value)?;
            }
            OptionSubcommand::Remove { name, force } => {
                if !force
                    && !confirm(&format!(
                        "Are you sure you want to remove the {} option from the context?",
                        name
                    ))?
                {
                    return Ok(());
                }
                remove_context_option(&path, &name)?;
            }
        },
    }

    Ok(())
}
