use clap::Parser;
use m365_cli::cli::{self, output::print_error, Cli};
use m365_cli::config::Config;
use m365_cli::CommandError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "m365_cli=debug"
    } else {
        "m365_cli=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match Config::load() {
        Ok(config) => {
            if !config.output.color {
                colored::control::set_override(false);
            }
            cli::run(cli, &config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        // Command errors already carry their full message
        let message = match e.downcast_ref::<CommandError>() {
            Some(err) => err.to_string(),
            None => format!("{:#}", e),
        };
        print_error(&message);
        std::process::exit(1);
    }
}
