use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use cu_console::{edit_application, ConsoleConfig, InMemoryApplicationService};

/// Prints every registered state with its absolute URL and view
pub fn execute(config: &ConsoleConfig) -> Result<()> {
    // Listing never enters a state, so no lookup backend is needed
    let apps = Arc::new(InMemoryApplicationService::new());
    let router = edit_application::router(apps, config.routing.case_insensitive)?;

    println!("{}", "Registered states".green().bold());
    println!();

    for compiled in router.states() {
        let state = compiled.state();
        let view = state
            .view
            .as_ref()
            .map(|view| view.template())
            .unwrap_or_default();

        let marker = if state.is_abstract {
            " (abstract)".yellow().to_string()
        } else {
            String::new()
        };

        println!(
            "  {:<32} {:<36} {}{}",
            compiled.name().cyan(),
            compiled.pattern().as_str(),
            view,
            marker
        );
    }

    println!();
    println!("{} states", router.len());

    Ok(())
}
