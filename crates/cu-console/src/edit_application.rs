//! The edit-application screen: one abstract shell and nine tab states
//!
//! ```text
//! editApplication                 /editApplication/:name   <edit-application>   resolve App
//! ├── editApplication.overview    /overview                <edit-app-overview>
//! ├── editApplication.addModule   /addModule               <edit-app-modules>
//! ├── editApplication.deploy      /deploy                  <edit-app-deploy>
//! ├── editApplication.explorer    /explorer                <edit-app-explorer>
//! ├── editApplication.logs        /logs                    <edit-app-logs>
//! ├── editApplication.monitoring  /monitoring              <edit-app-monitoring>
//! ├── editApplication.monitoringApp /monitoringApp         <edit-app-monitoring-app>
//! ├── editApplication.snapshot    /snapshot                <edit-app-snapshot>
//! └── editApplication.settings    /settings                <edit-app-settings>
//! ```
//!
//! Entering any tab waits for the `App` lookup of the shell. Tabs read the
//! result as `editApp.application`.

use std::sync::Arc;

use cu_router::{Controller, RegistrationError, ScopeSource, State, StateRouter, View};

use crate::application::{AppResolver, ApplicationService};

pub const ROOT: &str = "editApplication";
pub const OVERVIEW: &str = "editApplication.overview";
pub const ADD_MODULE: &str = "editApplication.addModule";
pub const DEPLOY: &str = "editApplication.deploy";
pub const EXPLORER: &str = "editApplication.explorer";
pub const LOGS: &str = "editApplication.logs";
pub const MONITORING: &str = "editApplication.monitoring";
pub const MONITORING_APP: &str = "editApplication.monitoringApp";
pub const SNAPSHOT: &str = "editApplication.snapshot";
pub const SETTINGS: &str = "editApplication.settings";

/// Resolve name of the looked-up application
pub const APP: &str = "App";

/// Alias the shell controller publishes under
pub const SCOPE: &str = "editApp";

/// State names in table order
pub const STATE_NAMES: [&str; 10] = [
    ROOT,
    OVERVIEW,
    ADD_MODULE,
    DEPLOY,
    EXPLORER,
    LOGS,
    MONITORING,
    MONITORING_APP,
    SNAPSHOT,
    SETTINGS,
];

/// The enclosing application's controller; exposes the navigation state as `main.$state`
pub fn main_controller() -> Controller {
    Controller::new("main").expose("$state", ScopeSource::Transition)
}

fn shell(apps: Arc<dyn ApplicationService>) -> State {
    State::new(ROOT, "/editApplication/:name")
        .into_abstract()
        .with_redirect_to(OVERVIEW)
        .with_data("isFree", false)
        .with_resolve(APP, Arc::new(AppResolver::new(apps)))
        .with_controller(
            Controller::new(SCOPE)
                .expose("application", ScopeSource::Resolved(APP.to_string()))
                .expose("state", ScopeSource::Transition),
        )
        .with_view(View::new("edit-application").bind("state", "main.$state"))
}

fn tab(name: &str, url: &str, component: &str) -> State {
    State::new(name, url).with_view(View::new(component).bind("app", "editApp.application"))
}

/// Builds the ten descriptors, parent first
pub fn states(apps: Arc<dyn ApplicationService>) -> Vec<State> {
    vec![
        shell(apps),
        tab(OVERVIEW, "/overview", "edit-app-overview"),
        tab(ADD_MODULE, "/addModule", "edit-app-modules"),
        tab(DEPLOY, "/deploy", "edit-app-deploy"),
        tab(EXPLORER, "/explorer", "edit-app-explorer"),
        State::new(LOGS, "/logs").with_view(
            View::new("edit-app-logs")
                .bind("app", "editApp.application")
                .bind("state", "editApp.state"),
        ),
        tab(MONITORING, "/monitoring", "edit-app-monitoring"),
        tab(MONITORING_APP, "/monitoringApp", "edit-app-monitoring-app"),
        tab(SNAPSHOT, "/snapshot", "edit-app-snapshot"),
        tab(SETTINGS, "/settings", "edit-app-settings"),
    ]
}

/// Adds the table to a router; call once, before matching starts
pub fn register(
    router: &mut StateRouter,
    apps: Arc<dyn ApplicationService>,
) -> Result<(), RegistrationError> {
    router.register_all(states(apps))
}

/// A router holding just this table, with the enclosing `main` scope
pub fn router(
    apps: Arc<dyn ApplicationService>,
    case_insensitive: bool,
) -> Result<StateRouter, RegistrationError> {
    let mut router = StateRouter::new()
        .with_case_insensitive(case_insensitive)
        .with_root_controller(main_controller());
    register(&mut router, apps)?;
    Ok(router)
}
