//! State registry, URL matching and transitions
//!
//! # Transition order
//!
//! ```text
//! URL ──▶ match_url ──▶ (abstract? follow redirect_to)
//!      ──▶ state chain root → leaf
//!      ──▶ per state: await all resolves (parent before child)
//!      ──▶ publish controllers, bind views, merge metadata
//!      ──▶ Activation
//! ```
//!
//! A failing resolve stops the walk: no view of the chain is bound and the
//! caller receives `TransitionError::Resolve`.

use std::collections::{BTreeMap, HashMap};

use futures::future::try_join_all;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{RegistrationError, TransitionError};
use crate::path::{normalize_path, parent_name, StateHierarchy};
use crate::pattern::{Params, UrlPattern};
use crate::resolve::{Locals, ResolveContext};
use crate::scope::Scope;
use crate::state::{Controller, State};

/// A registered state with its absolute URL pattern
#[derive(Debug, Clone)]
pub struct CompiledState {
    state: State,
    pattern: UrlPattern,
}

impl CompiledState {
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Absolute pattern (parent URLs included)
    pub fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }
}

/// Result of matching a URL against the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMatch {
    /// The state whose URL matched
    pub state: String,
    pub params: Params,
    /// Set when the match is an abstract state that forwards to a descendant
    pub redirect_to: Option<String>,
}

impl StateMatch {
    pub fn is_redirect(&self) -> bool {
        self.redirect_to.is_some()
    }
}

/// One bound view of an activation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewActivation {
    pub state: String,
    pub component: String,
    pub inputs: BTreeMap<String, Value>,
}

/// A fully entered state: every resolve done, every view bound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activation {
    pub state: String,
    pub url: String,
    pub params: Params,
    pub locals: Locals,
    /// Metadata merged root → leaf
    pub metadata: BTreeMap<String, Value>,
    /// Views from the outermost ancestor to the entered state
    pub views: Vec<ViewActivation>,
}

impl Activation {
    /// The view of the entered state itself
    pub fn leaf_view(&self) -> Option<&ViewActivation> {
        self.views.last().filter(|view| view.state == self.state)
    }

    pub fn local(&self, name: &str) -> Option<&Value> {
        self.locals.get(name)
    }
}

/// Nested state router
///
/// States are registered parent first and are immutable afterwards.
///
/// # Examples
///
/// ```
/// use cu_router::{State, StateRouter};
///
/// let mut router = StateRouter::new();
/// router.register(State::new("apps", "/apps").into_abstract()).unwrap();
/// router.register(State::new("apps.list", "/list")).unwrap();
///
/// let matched = router.match_url("/apps/list").unwrap();
/// assert_eq!(matched.state, "apps.list");
/// assert!(router.match_url("/apps").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StateRouter {
    states: Vec<CompiledState>,
    index: HashMap<String, usize>,
    /// Indices into `states`, in matching order
    match_order: Vec<usize>,
    root_controllers: Vec<Controller>,
    case_insensitive: bool,
}

impl StateRouter {
    /// Creates an empty, case-sensitive router
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures case sensitivity of static URL segments
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Adds a controller of the enclosing application, visible to every view
    pub fn with_root_controller(mut self, controller: Controller) -> Self {
        self.root_controllers.push(controller);
        self
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Adds a state to the registry
    ///
    /// The parent of a dotted name must already be registered. The state's
    /// URL is appended to the parent's absolute URL.
    pub fn register(&mut self, state: State) -> Result<(), RegistrationError> {
        let name = state.name.clone();

        if name.is_empty() || name.split('.').any(str::is_empty) {
            return Err(RegistrationError::InvalidName(name));
        }

        if self.index.contains_key(&name) {
            return Err(RegistrationError::Duplicate(name));
        }

        let own = UrlPattern::parse(&state.url).map_err(|source| RegistrationError::Pattern {
            state: name.clone(),
            source,
        })?;

        let pattern = match parent_name(&name) {
            Some(parent) => {
                let parent_idx =
                    self.index
                        .get(parent)
                        .ok_or_else(|| RegistrationError::MissingParent {
                            state: name.clone(),
                            parent: parent.to_string(),
                        })?;
                self.states[*parent_idx]
                    .pattern
                    .join(&own)
                    .map_err(|source| RegistrationError::Pattern {
                        state: name.clone(),
                        source,
                    })?
            }
            None => own,
        };

        for resolve in &state.resolves {
            if let Some(param) = resolve
                .resolver
                .required_params()
                .into_iter()
                .find(|param| !pattern.has_param(param))
            {
                return Err(RegistrationError::ResolveParamMissing {
                    state: name,
                    resolve: resolve.name.clone(),
                    param,
                });
            }
        }

        if let Some(target) = &state.redirect_to {
            if !state.is_abstract {
                return Err(RegistrationError::RedirectOnConcreteState(name));
            }
            if !target.starts_with(&format!("{}.", name)) {
                return Err(RegistrationError::RedirectNotDescendant {
                    state: name,
                    target: target.clone(),
                });
            }
        }

        debug!(
            state = %name,
            url = %pattern,
            is_abstract = state.is_abstract,
            resolves = state.resolves.len(),
            "Registered state"
        );

        let idx = self.states.len();
        self.states.push(CompiledState { state, pattern });
        self.index.insert(name, idx);
        self.match_order.push(idx);

        let states = &self.states;
        self.match_order
            .sort_by_key(|&i| (states[i].pattern.priority(), i));

        Ok(())
    }

    /// Registers several states in order, stopping at the first rejection
    pub fn register_all<I>(&mut self, states: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = State>,
    {
        states.into_iter().try_for_each(|state| self.register(state))
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Registered states, in registration order
    pub fn states(&self) -> impl Iterator<Item = &CompiledState> {
        self.states.iter()
    }

    pub fn get(&self, name: &str) -> Option<&CompiledState> {
        self.index.get(name).map(|&idx| &self.states[idx])
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States from the root ancestor down to `name`
    fn chain(&self, name: &str) -> Result<Vec<&CompiledState>, TransitionError> {
        let mut chain = StateHierarchy::new(name)
            .map(|n| {
                self.get(n)
                    .ok_or_else(|| TransitionError::UnknownState(n.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        chain.reverse();
        Ok(chain)
    }

    /// Matches a URL against all states that can be entered from a URL
    ///
    /// Abstract states only match when they declare a redirect to a
    /// registered descendant.
    pub fn match_url(&self, path: &str) -> Option<StateMatch> {
        let normalized = normalize_path(path);

        self.match_order.iter().find_map(|&idx| {
            let entry = &self.states[idx];
            if entry.state.is_abstract {
                match &entry.state.redirect_to {
                    Some(target) if self.index.contains_key(target) => {}
                    _ => return None,
                }
            }

            entry
                .pattern
                .matches(&normalized, self.case_insensitive)
                .map(|params| StateMatch {
                    state: entry.state.name.clone(),
                    params,
                    redirect_to: entry.state.redirect_to.clone(),
                })
        })
    }

    /// Generates the URL of a named state
    pub fn url_for(&self, name: &str, params: &Params) -> Result<String, TransitionError> {
        let entry = self
            .get(name)
            .ok_or_else(|| TransitionError::UnknownState(name.to_string()))?;

        entry
            .pattern
            .generate(params)
            .map_err(|source| TransitionError::Url {
                state: name.to_string(),
                source,
            })
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Enters the state matching `path`
    pub async fn transition(&self, path: &str) -> Result<Activation, TransitionError> {
        let matched = self
            .match_url(path)
            .ok_or_else(|| TransitionError::NotFound(path.to_string()))?;

        let target = match matched.redirect_to {
            Some(target) => {
                debug!(from = %matched.state, to = %target, "Following abstract state redirect");
                target
            }
            None => matched.state,
        };

        self.activate(&target, matched.params).await
    }

    /// Enters a state by name
    pub async fn go(&self, name: &str, params: &Params) -> Result<Activation, TransitionError> {
        let entry = self
            .get(name)
            .ok_or_else(|| TransitionError::UnknownState(name.to_string()))?;

        let target = match (entry.state.is_abstract, &entry.state.redirect_to) {
            (false, _) => name,
            (true, Some(target)) => target.as_str(),
            (true, None) => return Err(TransitionError::AbstractState(name.to_string())),
        };

        self.activate(target, params.clone()).await
    }

    async fn activate(&self, name: &str, params: Params) -> Result<Activation, TransitionError> {
        let chain = self.chain(name)?;
        let leaf = chain
            .last()
            .ok_or_else(|| TransitionError::UnknownState(name.to_string()))?;

        if leaf.state.is_abstract {
            return Err(TransitionError::AbstractState(name.to_string()));
        }

        let url = leaf
            .pattern
            .generate(&params)
            .map_err(|source| TransitionError::Url {
                state: name.to_string(),
                source,
            })?;

        info!(state = %name, url = %url, "Transition started");

        // Resolve phase: parent states complete before children start
        let mut locals = Locals::new();
        let mut resolved_per_state = Vec::with_capacity(chain.len());

        for entry in &chain {
            let ctx = ResolveContext {
                params: &params,
                locals: &locals,
            };

            let resolved = try_join_all(entry.state.resolves.iter().map(|resolve| async move {
                debug!(state = %entry.state.name, resolve = %resolve.name, "Resolving");
                resolve
                    .resolver
                    .resolve(ctx)
                    .await
                    .map(|value| (resolve.name.clone(), value))
                    .map_err(|source| TransitionError::Resolve {
                        state: entry.state.name.clone(),
                        resolve: resolve.name.clone(),
                        source,
                    })
            }))
            .await;

            let resolved: Locals = match resolved {
                Ok(values) => values.into_iter().collect(),
                Err(err) => {
                    warn!(state = %name, url = %url, error = %err, "Transition aborted");
                    return Err(err);
                }
            };

            locals.extend(resolved.clone());
            resolved_per_state.push(resolved);
        }

        // Binding phase
        let transition = json!({
            "name": name,
            "url": url,
            "params": params,
        });

        let mut scope = Scope::new();
        for controller in &self.root_controllers {
            scope.publish("", controller, &Locals::new(), &transition)?;
        }

        let mut visible = Locals::new();
        let mut metadata = BTreeMap::new();
        let mut views = Vec::new();

        for (entry, resolved) in chain.iter().zip(resolved_per_state) {
            let state = &entry.state;
            visible.extend(resolved);
            metadata.extend(state.metadata.clone());

            if let Some(controller) = &state.controller {
                scope.publish(&state.name, controller, &visible, &transition)?;
            }

            if let Some(view) = &state.view {
                views.push(ViewActivation {
                    state: state.name.clone(),
                    component: view.component.clone(),
                    inputs: scope.bind_view(&state.name, view)?,
                });
            }
        }

        info!(state = %name, url = %url, views = views.len(), "Transition complete");

        Ok(Activation {
            state: name.to_string(),
            url,
            params,
            locals,
            metadata,
            views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_fn;

    #[test]
    fn test_register_rejects_invalid_names() {
        let mut router = StateRouter::new();
        assert_eq!(
            router.register(State::new("", "/x")),
            Err(RegistrationError::InvalidName(String::new()))
        );
        assert_eq!(
            router.register(State::new("a..b", "/x")),
            Err(RegistrationError::InvalidName("a..b".to_string()))
        );
    }

    #[test]
    fn test_match_order_prefers_static_segments() {
        let mut router = StateRouter::new();
        router.register(State::new("app", "/apps/:name")).unwrap();
        router.register(State::new("create", "/apps/new")).unwrap();

        assert_eq!(router.match_url("/apps/new").unwrap().state, "create");
        assert_eq!(router.match_url("/apps/acme").unwrap().state, "app");
    }

    #[test]
    fn test_resolve_param_check_uses_absolute_url() {
        let mut router = StateRouter::new();
        router
            .register(State::new("apps", "/apps/:name").into_abstract())
            .unwrap();

        let child = State::new("apps.detail", "/detail")
            .with_resolve("App", resolve_fn(&["name"], |_| async { Ok(Value::Null) }));
        assert!(router.register(child).is_ok());
    }

    #[test]
    fn test_redirect_to_unregistered_descendant_never_matches() {
        let mut router = StateRouter::new();
        router
            .register(
                State::new("apps", "/apps/:name")
                    .into_abstract()
                    .with_redirect_to("apps.ghost"),
            )
            .unwrap();

        assert!(router.match_url("/apps/acme").is_none());

        router.register(State::new("apps.ghost", "/ghost")).unwrap();
        let matched = router.match_url("/apps/acme").unwrap();
        assert_eq!(matched.redirect_to.as_deref(), Some("apps.ghost"));
    }

    #[tokio::test]
    async fn test_go_builds_url_from_params() {
        let mut router = StateRouter::new();
        router.register(State::new("apps", "/apps/:name")).unwrap();

        let mut params = Params::new();
        params.insert("name".to_string(), "my app".to_string());

        let activation = router.go("apps", &params).await.unwrap();
        assert_eq!(activation.url, "/apps/my%20app");
        assert_eq!(activation.params, params);
    }
}
