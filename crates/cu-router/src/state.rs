//! State descriptors
//!
//! A `State` is a named, URL-addressable unit of navigation. Names are
//! dot-scoped: `editApplication.overview` is a child of `editApplication`
//! and its URL is appended to its parent's.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::path::parent_name;
use crate::resolve::Resolver;

/// One attribute binding of a view: `attribute="scope.path"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub attribute: String,
    pub expression: String,
}

/// Render target of a state plus the parameters bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub component: String,
    pub bindings: Vec<Binding>,
}

impl View {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            bindings: Vec::new(),
        }
    }

    /// Binds an attribute to a dotted scope expression
    pub fn bind(mut self, attribute: impl Into<String>, expression: impl Into<String>) -> Self {
        self.bindings.push(Binding {
            attribute: attribute.into(),
            expression: expression.into(),
        });
        self
    }

    /// Renders the custom-element markup of this view
    ///
    /// ```
    /// use cu_router::View;
    ///
    /// let view = View::new("edit-app-logs")
    ///     .bind("app", "editApp.application")
    ///     .bind("state", "editApp.state");
    /// assert_eq!(
    ///     view.template(),
    ///     r#"<edit-app-logs app="editApp.application" state="editApp.state"></edit-app-logs>"#
    /// );
    /// ```
    pub fn template(&self) -> String {
        let attributes: String = self
            .bindings
            .iter()
            .map(|b| format!(" {}=\"{}\"", b.attribute, b.expression))
            .collect();
        format!("<{0}{1}></{0}>", self.component, attributes)
    }
}

/// Where a controller field takes its value from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScopeSource {
    /// A value produced by a resolve of this state or an ancestor
    Resolved(String),
    /// The navigation state being activated (name, url, params)
    Transition,
}

/// The local scope a state publishes under `alias` to its view and descendants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controller {
    pub alias: String,
    pub fields: Vec<(String, ScopeSource)>,
}

impl Controller {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            fields: Vec::new(),
        }
    }

    pub fn expose(mut self, field: impl Into<String>, source: ScopeSource) -> Self {
        self.fields.push((field.into(), source));
        self
    }
}

/// A named asynchronous dependency of a state
#[derive(Clone)]
pub struct Resolve {
    pub name: String,
    pub resolver: Arc<dyn Resolver>,
}

impl fmt::Debug for Resolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve")
            .field("name", &self.name)
            .field("required_params", &self.resolver.required_params())
            .finish()
    }
}

/// A navigation state descriptor
#[derive(Debug, Clone)]
pub struct State {
    /// Unique dotted name
    pub name: String,
    /// URL pattern relative to the parent state
    pub url: String,
    pub view: Option<View>,
    /// Abstract states host children and never render on their own
    pub is_abstract: bool,
    /// Passthrough flags for consumers of the activation; inherited by children
    pub metadata: BTreeMap<String, Value>,
    pub resolves: Vec<Resolve>,
    pub controller: Option<Controller>,
    /// Descendant to enter when an abstract state's own URL is visited
    pub redirect_to: Option<String>,
}

impl State {
    /// Creates a concrete state with no view, metadata or resolves
    ///
    /// ```
    /// use cu_router::{State, View};
    ///
    /// let state = State::new("editApplication.deploy", "/deploy")
    ///     .with_view(View::new("edit-app-deploy").bind("app", "editApp.application"));
    ///
    /// assert_eq!(state.parent(), Some("editApplication"));
    /// assert!(!state.is_abstract);
    /// ```
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            view: None,
            is_abstract: false,
            metadata: BTreeMap::new(),
            resolves: Vec::new(),
            controller: None,
            redirect_to: None,
        }
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }

    /// Marks the state abstract
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Sets a metadata flag
    ///
    /// ```
    /// use cu_router::State;
    ///
    /// let state = State::new("editApplication", "/editApplication/:name")
    ///     .with_data("isFree", false);
    /// assert_eq!(state.get_data("isFree"), Some(&serde_json::json!(false)));
    /// ```
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_resolve(mut self, name: impl Into<String>, resolver: Arc<dyn Resolver>) -> Self {
        self.resolves.push(Resolve {
            name: name.into(),
            resolver,
        });
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn with_redirect_to(mut self, descendant: impl Into<String>) -> Self {
        self.redirect_to = Some(descendant.into());
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn parent(&self) -> Option<&str> {
        parent_name(&self.name)
    }
}
