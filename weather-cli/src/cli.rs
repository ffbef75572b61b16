use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weather_core::Config;

use crate::{
    client::{ProxyClient, WeatherSource},
    render::render,
    view::{ClientView, ViewState},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Proxy server address; overrides config and WEATHER_BACKEND_URL.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and the proxy address in the config file.
    Configure,

    /// Prompt for cities until Esc or Ctrl-C. This is the default.
    Search,

    /// Show weather for one city and exit.
    Show {
        /// City or location name.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Search) {
            // Read the file alone so environment overrides don't end up saved.
            Command::Configure => configure(Config::load_from(&Config::config_file_path()?)?),
            Command::Search => interactive(&proxy_client(self.backend_url.as_deref())?).await,
            Command::Show { city } => show(&proxy_client(self.backend_url.as_deref())?, &city).await,
        }
    }
}

/// Proxy client from the `--backend-url` flag, falling back to config.
fn proxy_client(backend_url: Option<&str>) -> Result<ProxyClient> {
    match backend_url {
        Some(url) => ProxyClient::new(url),
        None => ProxyClient::new(&Config::load()?.client.backend_url),
    }
}

async fn show(client: &ProxyClient, city: &str) -> Result<()> {
    let mut view = ClientView::new();
    eprintln!("Loading...");
    view.search(client, city).await;

    match view.state() {
        ViewState::Success(_) => {
            print!("{}", render(view.state()));
            Ok(())
        }
        ViewState::Error(message) => bail!("{message}"),
        ViewState::Idle | ViewState::Loading { .. } => bail!("Nothing to search for"),
    }
}

async fn interactive(client: &ProxyClient) -> Result<()> {
    let mut view = ClientView::new();

    loop {
        let input = match Text::new("City:").with_placeholder("Enter city name...").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read city"),
        };

        let Some(ticket) = view.begin(&input) else {
            continue;
        };
        if view.is_loading() {
            eprintln!("Loading...");
        }

        let outcome = client.fetch(ticket.city()).await;
        view.complete(ticket, outcome);

        println!("{}", render(view.state()));
    }
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;

    if !api_key.trim().is_empty() {
        config.server.api_key = Some(api_key.trim().to_string());
    }

    let backend_url = Text::new("Proxy server address:")
        .with_default(&config.client.backend_url)
        .prompt()
        .context("Failed to read proxy server address")?;

    // Validate before writing anything.
    ProxyClient::new(&backend_url)?;
    config.client.backend_url = backend_url;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
