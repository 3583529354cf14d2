use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;

use crate::client::factory::ClientFactory;
use crate::client::TokenSource;

use super::{ConfigArgs, RunCommand};

/// Fetch the session token once and print the endpoint response as json.
#[derive(Args)]
pub struct TokenArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for TokenArgs {
    async fn run(&self) -> Result<()> {
        let cfg = self.config.setup()?;
        let client = ClientFactory::new(cfg).build_client()?;

        let resp = client.fetch_token().await?;
        let json = serde_json::to_string_pretty(&resp).context("encode token response")?;
        println!("{json}");
        Ok(())
    }
}
