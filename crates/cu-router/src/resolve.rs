//! Asynchronous data dependencies of a state
//!
//! A resolve is awaited by the router before its state, and every state
//! below it, may activate. Resolved values are injected by name into the
//! controllers that publish them to views.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::pattern::Params;

/// Values resolved so far in a transition, keyed by resolve name
pub type Locals = BTreeMap<String, Value>;

/// Failure of a single resolve
///
/// Provider failures are carried verbatim so callers can downcast to the
/// provider's own error type.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("required parameter '{0}' is missing")]
    MissingParam(String),

    #[error(transparent)]
    Provider(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

impl ResolveError {
    /// Wraps a provider error
    pub fn provider<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Provider(Arc::new(err))
    }

    /// Returns the provider error if it has type `E`
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Provider(err) => err.downcast_ref::<E>(),
            Self::MissingParam(_) => None,
        }
    }
}

/// What a resolver can see while it runs
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Path parameters of the target URL
    pub params: &'a Params,
    /// Values resolved by ancestor states
    pub locals: &'a Locals,
}

impl<'a> ResolveContext<'a> {
    /// Looks up a required path parameter
    pub fn param(&self, name: &str) -> Result<&'a str, ResolveError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ResolveError::MissingParam(name.to_string()))
    }
}

/// Producer of one resolved value
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, ctx: ResolveContext<'_>) -> Result<Value, ResolveError>;

    /// Path parameters this resolver reads; checked against the state URL at registration
    fn required_params(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Resolver backed by a closure over the path parameters
pub struct FnResolver<F> {
    required: Vec<String>,
    f: F,
}

impl<F, Fut> FnResolver<F>
where
    F: Fn(Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ResolveError>> + Send,
{
    pub fn new(required: &[&str], f: F) -> Self {
        Self {
            required: required.iter().map(|p| p.to_string()).collect(),
            f,
        }
    }
}

#[async_trait]
impl<F, Fut> Resolver for FnResolver<F>
where
    F: Fn(Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ResolveError>> + Send,
{
    async fn resolve(&self, ctx: ResolveContext<'_>) -> Result<Value, ResolveError> {
        for name in &self.required {
            ctx.param(name)?;
        }
        (self.f)(ctx.params.clone()).await
    }

    fn required_params(&self) -> Vec<String> {
        self.required.clone()
    }
}

/// Shorthand for an `Arc<dyn Resolver>` built from a closure
///
/// ```
/// use cu_router::resolve::{resolve_fn, Resolver};
/// use serde_json::json;
///
/// let resolver = resolve_fn(&["name"], |params| async move {
///     Ok(json!({ "name": params["name"] }))
/// });
/// assert_eq!(resolver.required_params(), vec!["name".to_string()]);
/// ```
pub fn resolve_fn<F, Fut>(required: &[&str], f: F) -> Arc<dyn Resolver>
where
    F: Fn(Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ResolveError>> + Send + 'static,
{
    Arc::new(FnResolver::new(required, f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Error)]
    #[error("backend unavailable")]
    struct Unavailable;

    #[tokio::test]
    async fn test_fn_resolver_checks_required_params() {
        let resolver = resolve_fn(&["name"], |params| async move { Ok(json!(params["name"])) });

        let locals = Locals::new();
        let empty = Params::new();
        let err = resolver
            .resolve(ResolveContext {
                params: &empty,
                locals: &locals,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingParam(ref p) if p == "name"));

        let mut params = Params::new();
        params.insert("name".to_string(), "acme".to_string());
        let value = resolver
            .resolve(ResolveContext {
                params: &params,
                locals: &locals,
            })
            .await
            .unwrap();
        assert_eq!(value, json!("acme"));
    }

    #[test]
    fn test_provider_error_downcasts() {
        let err = ResolveError::provider(Unavailable);
        assert!(err.downcast_ref::<Unavailable>().is_some());
        assert_eq!(err.to_string(), "backend unavailable");
        assert!(ResolveError::MissingParam("x".into())
            .downcast_ref::<Unavailable>()
            .is_none());
    }
}
