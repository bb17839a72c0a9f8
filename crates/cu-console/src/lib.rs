//! # CU Console
//!
//! Navigation states of the application console's edit-application screen,
//! wired to the application lookup they resolve against.
//!
//! ```
//! use std::sync::Arc;
//! use cu_console::{edit_application, Application, InMemoryApplicationService};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let apps = Arc::new(InMemoryApplicationService::with_applications([Application::new("acme")]));
//! let router = edit_application::router(apps, false).unwrap();
//!
//! let activation = router.transition("/editApplication/acme/deploy").await.unwrap();
//! assert_eq!(activation.state, edit_application::DEPLOY);
//! assert_eq!(activation.leaf_view().unwrap().inputs["app"]["name"], "acme");
//! # }
//! ```

pub mod application;
pub mod config;
pub mod edit_application;
mod error;

pub use application::{
    AppResolver, Application, ApplicationService, HttpApplicationService,
    InMemoryApplicationService,
};
pub use config::ConsoleConfig;
pub use error::ServiceError;
