use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use cu_console::{
    edit_application, ApplicationService, ConsoleConfig, HttpApplicationService,
    InMemoryApplicationService,
};
use cu_router::Navigator;
use tracing::info;

/// Enters the state matching `url` and prints the activation as JSON
pub async fn execute(config: &ConsoleConfig, url: &str, offline: bool) -> Result<()> {
    let apps: Arc<dyn ApplicationService> = if offline {
        info!(applications = config.applications.len(), "Using offline application lookup");
        Arc::new(InMemoryApplicationService::with_applications(
            config.applications.iter().cloned(),
        ))
    } else {
        info!(base_url = %config.api.base_url, "Using application service");
        Arc::new(
            HttpApplicationService::from_config(&config.api)
                .context("Failed to build the application service client")?,
        )
    };

    let router = edit_application::router(apps, config.routing.case_insensitive)?;
    let navigator = Navigator::new(Arc::new(router));

    match navigator.navigate(url).await {
        Ok(activation) => {
            println!("{}", serde_json::to_string_pretty(&activation)?);
            Ok(())
        }
        Err(err) => {
            if err.is_unresolved_dependency() {
                eprintln!("{} {}", "Unresolved dependency:".red().bold(), err);
            }
            Err(err).with_context(|| format!("Navigation to {} failed", url))
        }
    }
}
