use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use raincheck_core::{Config, DisplayMode, SearchSession};
use tracing_subscriber::EnvFilter;

use crate::view;

const RESET_COMMAND: &str = ":reset";
const QUIT_COMMAND: &str = ":quit";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "raincheck", version, about = "Is it raining right now?")]
pub struct Cli {
    /// OpenWeather API key; overrides the stored one.
    #[arg(long, env = "RAINCHECK_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Check the rain for one city and exit.
    Check {
        /// City name, e.g. "London".
        city: String,

        /// Print the resulting state as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities until you quit.
    Interactive,
}

impl Cli {
    pub fn init_logging(&self) {
        let default_level = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    }

    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match &self.command {
            Command::Configure => {
                self.configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Check { city, json } => {
                let mut session = self.session()?;
                let state = session.search(city).await;

                if *json {
                    println!("{}", view::render_json(state)?);
                } else {
                    println!("{}", view::render(state));
                }

                Ok(match state.mode() {
                    DisplayMode::Error => ExitCode::FAILURE,
                    _ => ExitCode::SUCCESS,
                })
            }
            Command::Interactive => {
                let mut session = self.session()?;
                interactive(&mut session).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        tracing::debug!(endpoints = ?config.endpoints, "Configuration loaded");
        Ok(config)
    }

    fn session(&self) -> anyhow::Result<SearchSession> {
        let config = self.load_config()?;
        SearchSession::from_config(&config, self.api_key.as_deref())
    }

    fn configure(&self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;

        let api_key = Password::new("OpenWeather API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .with_help_message("Create one at https://home.openweathermap.org/api_keys")
            .prompt()
            .context("Failed to read API key")?;

        if api_key.trim().is_empty() {
            anyhow::bail!("API key must not be empty");
        }
        config.set_api_key(api_key.trim().to_string());

        let path = match &self.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };

        println!("Saved configuration to {}", path.display());
        Ok(())
    }
}

async fn interactive(session: &mut SearchSession) -> anyhow::Result<()> {
    println!("Type a city and press Enter. {RESET_COMMAND} clears, {QUIT_COMMAND} or Esc exits.");

    loop {
        let input = Text::new("City:")
            .with_placeholder("e.g. London, New York, Tokyo")
            .with_initial_value(session.state().query())
            .prompt();

        let input = match input {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        match input.trim() {
            QUIT_COMMAND => break,
            RESET_COMMAND => {
                session.reset();
                println!("{}", view::render(session.state()));
                continue;
            }
            _ => {}
        }

        let Some(ticket) = session.submit(&input) else {
            println!("{}", view::render(session.state()));
            continue;
        };

        println!("{}", view::render(session.state()));
        let outcome = SearchSession::run(session.clients(), ticket).await;
        session.complete(outcome);
        println!("{}", view::render(session.state()));
    }

    Ok(())
}
