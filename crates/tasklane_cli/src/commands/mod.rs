//! Command dispatch.

pub mod complete_all;
pub mod items;
pub mod lists;
pub mod tui;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tasklane_client::{HttpTodoClient, TodoApi};
use tasklane_runtime::RuntimeConfig;

use crate::cli::{Cli, Command};

pub async fn handle(cli: Cli) -> Result<()> {
    let base_url = cli.base_url;
    match cli.command {
        Command::Tui => tui::handle(base_url).await,
        Command::Lists { action } => lists::handle(base_url, action).await,
        Command::Items { action } => items::handle(base_url, action).await,
        Command::CompleteAll { list_id, yes } => {
            complete_all::handle(base_url, &list_id, yes).await
        }
        Command::Watch { list_id } => watch::handle(base_url, &list_id).await,
    }
}

/// `~/.tasklane`, or a relative fallback when no home dir exists.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(tasklane_constant::app::DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(tasklane_constant::app::DATA_DIR))
}

pub(crate) fn runtime_config(base_url: Option<String>) -> RuntimeConfig {
    let mut config = RuntimeConfig::from_env(data_dir());
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    config
}

pub(crate) fn client(config: &RuntimeConfig) -> Arc<dyn TodoApi> {
    Arc::new(HttpTodoClient::new(&config.base_url))
}
