//! # CU Router
//!
//! A nested state router for console navigation:
//! - Dot-scoped state names (`editApplication.overview` lives under `editApplication`)
//! - Relative URL patterns joined onto the parent's (`/editApplication/:name` + `/overview`)
//! - Path parameters (`:name`) and constrained parameters (`{id:[0-9]+}`)
//! - Abstract states that host children, optionally forwarding to a descendant
//! - Asynchronous resolves awaited root → leaf before any view binds
//! - Controllers publishing resolved values to descendant views
//!
//! ## Example
//!
//! ```
//! use cu_router::{resolve::resolve_fn, Controller, ScopeSource, State, StateRouter, View};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut router = StateRouter::new();
//! router.register(
//!     State::new("apps", "/apps/:name")
//!         .into_abstract()
//!         .with_resolve("App", resolve_fn(&["name"], |p| async move {
//!             Ok(json!({ "name": p["name"] }))
//!         }))
//!         .with_controller(
//!             Controller::new("ctl").expose("app", ScopeSource::Resolved("App".into())),
//!         ),
//! ).unwrap();
//! router.register(
//!     State::new("apps.detail", "/detail").with_view(View::new("app-detail").bind("app", "ctl.app")),
//! ).unwrap();
//!
//! let activation = router.transition("/apps/acme/detail").await.unwrap();
//! assert_eq!(activation.leaf_view().unwrap().inputs["app"], json!({ "name": "acme" }));
//! # }
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod error;
mod navigator;
pub mod path;
pub mod pattern;
pub mod resolve;
mod router;
pub mod scope;
mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{RegistrationError, TransitionError};
pub use navigator::Navigator;
pub use path::{is_valid_path, normalize_path, StateHierarchy};
pub use pattern::{GenerateError, Params, PatternError, UrlPattern};
pub use resolve::{Locals, ResolveContext, ResolveError, Resolver};
pub use router::{Activation, CompiledState, StateMatch, StateRouter, ViewActivation};
pub use state::{Binding, Controller, Resolve, ScopeSource, State, View};
