//! Registration and transition errors

use thiserror::Error;

use crate::pattern::{GenerateError, PatternError};
use crate::resolve::ResolveError;

/// Reasons the router refuses a state descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("state name '{0}' is empty or has an empty segment")]
    InvalidName(String),

    #[error("state '{0}' is already registered")]
    Duplicate(String),

    #[error("state '{state}' registered before its parent '{parent}'")]
    MissingParent { state: String, parent: String },

    #[error("state '{state}' has an unusable url")]
    Pattern {
        state: String,
        #[source]
        source: PatternError,
    },

    #[error("resolve '{resolve}' of state '{state}' needs parameter '{param}' which its url does not declare")]
    ResolveParamMissing {
        state: String,
        resolve: String,
        param: String,
    },

    #[error("state '{0}' declares a redirect but is not abstract")]
    RedirectOnConcreteState(String),

    #[error("state '{state}' redirects to '{target}' which is not one of its descendants")]
    RedirectNotDescendant { state: String, target: String },
}

/// Reasons a navigation does not activate
#[derive(Debug, Clone, Error)]
pub enum TransitionError {
    #[error("no state matches '{0}'")]
    NotFound(String),

    #[error("state '{0}' is not registered")]
    UnknownState(String),

    #[error("state '{0}' is abstract and cannot be activated directly")]
    AbstractState(String),

    #[error("cannot build a url for state '{state}'")]
    Url {
        state: String,
        #[source]
        source: GenerateError,
    },

    /// A resolve failed; nothing below `state` activated
    #[error("resolve '{resolve}' of state '{state}' failed")]
    Resolve {
        state: String,
        resolve: String,
        #[source]
        source: ResolveError,
    },

    #[error("controller of state '{state}' exposes '{name}' which was never resolved")]
    UnknownLocal { state: String, name: String },

    #[error("view of state '{state}' binds '{attribute}' to '{expression}' which is not in scope")]
    UnboundExpression {
        state: String,
        attribute: String,
        expression: String,
    },

    #[error("navigation to '{0}' was superseded by a newer navigation")]
    Superseded(String),
}

impl TransitionError {
    /// True for the unresolved-dependency failure path
    pub fn is_unresolved_dependency(&self) -> bool {
        matches!(self, TransitionError::Resolve { .. })
    }

    /// The resolve failure, if this is one
    pub fn resolve_error(&self) -> Option<&ResolveError> {
        match self {
            TransitionError::Resolve { source, .. } => Some(source),
            _ => None,
        }
    }
}
