//! View scope: controllers publish values, bindings read them back
//!
//! Expressions are dotted paths into the scope (`editApp.application`).
//! Segments may start with `$` (`main.$state`).

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::TransitionError;
use crate::resolve::Locals;
use crate::state::{Controller, ScopeSource, View};

/// Accumulated controller scopes, keyed by controller alias
#[derive(Debug, Clone, Default)]
pub struct Scope {
    values: Map<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a controller under its alias, replacing an outer one with the same alias
    pub fn publish(
        &mut self,
        state: &str,
        controller: &Controller,
        locals: &Locals,
        transition: &Value,
    ) -> Result<(), TransitionError> {
        let fields = controller
            .fields
            .iter()
            .map(|(field, source)| {
                let value = match source {
                    ScopeSource::Resolved(name) => {
                        locals
                            .get(name)
                            .cloned()
                            .ok_or_else(|| TransitionError::UnknownLocal {
                                state: state.to_string(),
                                name: name.clone(),
                            })?
                    }
                    ScopeSource::Transition => transition.clone(),
                };
                Ok((field.clone(), value))
            })
            .collect::<Result<Map<String, Value>, TransitionError>>()?;

        self.values
            .insert(controller.alias.clone(), Value::Object(fields));
        Ok(())
    }

    /// Evaluates a dotted expression
    ///
    /// ```
    /// use cu_router::scope::Scope;
    /// use cu_router::{Controller, ScopeSource};
    /// use serde_json::json;
    ///
    /// let mut locals = cu_router::Locals::new();
    /// locals.insert("App".to_string(), json!({ "name": "acme" }));
    ///
    /// let mut scope = Scope::new();
    /// let controller = Controller::new("editApp")
    ///     .expose("application", ScopeSource::Resolved("App".to_string()));
    /// scope.publish("editApplication", &controller, &locals, &json!(null)).unwrap();
    ///
    /// assert_eq!(scope.lookup("editApp.application.name"), Some(&json!("acme")));
    /// assert_eq!(scope.lookup("editApp.missing"), None);
    /// ```
    pub fn lookup(&self, expression: &str) -> Option<&Value> {
        let mut parts = expression.split('.');
        let first = self.values.get(parts.next()?)?;
        parts.try_fold(first, |value, key| value.get(key))
    }

    /// Evaluates every binding of a view
    pub fn bind_view(
        &self,
        state: &str,
        view: &View,
    ) -> Result<BTreeMap<String, Value>, TransitionError> {
        view.bindings
            .iter()
            .map(|binding| {
                self.lookup(&binding.expression)
                    .cloned()
                    .map(|value| (binding.attribute.clone(), value))
                    .ok_or_else(|| TransitionError::UnboundExpression {
                        state: state.to_string(),
                        attribute: binding.attribute.clone(),
                        expression: binding.expression.clone(),
                    })
            })
            .collect()
    }
}
