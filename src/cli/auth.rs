use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use tokio::time::sleep;
use tracing::debug;

use crate::api::{
    decode_claims, gen_device_code, get_epoch_s, poll_device_code, DeviceCodePoll, Session,
    RESOURCE_GRAPH,
};
use crate::config::Config;
use crate::error::{self, CommandError};

use super::output::{print_info, print_success};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Sign in to Microsoft 365 with a device code
    Login {
        /// Tenant to sign in to (default: auth.tenant from the config file)
        #[arg(short, long)]
        tenant: Option<String>,
    },

    /// Show who is signed in
    Status,

    /// Sign out and forget cached tokens
    Logout,
}

pub async fn execute(cmd: AuthCommand, config: &Config) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login { tenant } => login(config, tenant).await,
        AuthSubcommand::Status => status(config).await,
        AuthSubcommand::Logout => logout(config).await,
    }
}

async fn login(config: &Config, tenant: Option<String>) -> Result<()> {
    let mut config = config.clone();
    if let Some(tenant) = tenant {
        config.auth.tenant = tenant;
    }
    let tenant = config.auth.tenant.as_str();
    let client_id = config.auth.client_id.as_str();

    let device_code = gen_device_code(tenant, client_id, RESOURCE_GRAPH).await?;

    println!();
    println!("{}", device_code.message);
    println!();
    print_info("Waiting for you to finish signing in...");

    let deadline = get_epoch_s() + device_code.expires_in;
    loop {
        sleep(Duration::from_secs(device_code.interval)).await;

        match poll_device_code(&device_code.device_code, tenant, client_id).await? {
            DeviceCodePoll::Authorized(tokens) => {
                let session = Session::load(&config)?;
                session.store(RESOURCE_GRAPH, tokens).await?;

                print_success("Signed in");
                return Ok(());
            }
            DeviceCodePoll::Pending if get_epoch_s() >= deadline => {
                return Err(CommandError::Auth(
                    "The device code expired before sign-in completed".to_string(),
                )
                .into());
            }
            DeviceCodePoll::Pending => debug!("Authorization pending"),
        }
    }
}

async fn status(config: &Config) -> Result<()> {
    let session = Session::load(config)?;
    show_status(&session).await?;
    Ok(())
}

/// Fails when there is no usable sign-in so scripts can check the exit code.
async fn show_status(session: &Session) -> error::Result<()> {
    if !session.is_authenticated().await {
        return Err(CommandError::Auth(
            "Not signed in. Run 'm365 auth login'.".to_string(),
        ));
    }

    print_success("Signed in");
    match session.access_token(RESOURCE_GRAPH).await {
        Ok(token) => {
            let claims = decode_claims(&token).unwrap_or_default();
            if let Some(user) = claims.user() {
                println!("  User: {}", user);
            }
            if let Some(tenant) = claims.tid {
                println!("  Tenant: {}", tenant);
            }
        }
        Err(e) => print_info(&format!("Could not refresh the access token: {}", e)),
    }

    Ok(())
}

async fn logout(config: &Config) -> Result<()> {
    Session::load(config)?.clear().await?;
    print_success("Signed out");
    Ok(())
}
