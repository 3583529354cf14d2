use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use log::{debug, info};

use crate::client::factory::ClientFactory;
use crate::dashboard::{Dashboard, LoadOutcome};
use crate::router::History;

use super::{ConfigArgs, RunCommand};

/// Open the dashboard page: load the session token, then print the page and the
/// route the user ends up on.
#[derive(Args)]
pub struct OpenArgs {
    /// Route the dashboard is served at.
    #[arg(long, default_value = "/dashboard")]
    pub route: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for OpenArgs {
    async fn run(&self) -> Result<()> {
        let cfg = self.config.setup()?;
        debug!("Token endpoint: {}", cfg.endpoint);

        let factory = ClientFactory::new(cfg);
        let client = factory.build_client()?;
        let history = History::new(&self.route);

        let mut dashboard = Dashboard::new(
            Arc::new(client),
            Arc::new(history.clone()),
            factory.config().login_route.as_str(),
        );

        dashboard.mount();
        if let Some(LoadOutcome::Loaded) = dashboard.settled().await {
            info!("Session token loaded");
        }

        println!("{}", dashboard.render());
        println!("Location: {}", history.location());

        dashboard.unmount().await;
        Ok(())
    }
}
