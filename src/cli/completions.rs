use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use super::Cli;

#[derive(Args, Debug)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    pub shell: Shell,
}

pub fn execute(cmd: CompletionsCommand) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(cmd.shell, &mut command, name, &mut io::stdout());
    Ok(())
}
