use anyhow::Result;
use crm_api::ClientOptions;
use crm_config::{ApiConfig, AppConfig};
use serde::Serialize;
use std::io::{self, Write};

pub mod admin;
pub mod completions;
pub mod list;
pub mod tui;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

impl Context<'_> {
    pub fn client_options(&self) -> ClientOptions {
        client_options(&self.config.api)
    }

    pub fn admin_options(&self) -> ClientOptions {
        client_options(&self.config.api).with_timeout(self.config.api.admin_timeout())
    }
}

fn client_options(api: &ApiConfig) -> ClientOptions {
    ClientOptions::new(api.base_url.clone())
        .with_timeout(api.timeout())
        .with_connect_timeout(api.connect_timeout())
        .with_user_agent(api.user_agent.as_str())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
