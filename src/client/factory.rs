use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;

use super::credential::SessionCookies;
use super::Client;

pub struct ClientFactory {
    cfg: Config,
}

impl ClientFactory {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    pub fn build_client(&self) -> Result<Client> {
        let cookies = SessionCookies::new(self.cfg.cookies.clone());
        Client::new(&self.cfg.endpoint, self.cfg.timeout(), Arc::new(cookies))
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }
}
