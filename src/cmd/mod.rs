mod open;
mod token;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::logs;

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the config file. Default is `$DASHBOARD_CONFIG/dashboard.toml` or
    /// `~/.config/dashboard/dashboard.toml`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level, one of `error`, `warn`, `info`, `debug`.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ConfigArgs {
    pub fn setup(&self) -> Result<Config> {
        logs::init(&self.log_level)?;
        Config::load(self.config.as_deref())
    }
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Open(open::OpenArgs),
    Token(token::TokenArgs),
}

#[async_trait]
impl RunCommand for App {
    async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Open(args) => args.run().await,
            Commands::Token(args) => args.run().await,
        }
    }
}
