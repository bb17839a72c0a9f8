//! The single active navigation
//!
//! Only the most recently started navigation may commit. A navigation that
//! finishes after a newer one has started is discarded, whether it
//! succeeded or not.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::TransitionError;
use crate::pattern::Params;
use crate::router::{Activation, StateRouter};

pub struct Navigator {
    router: Arc<StateRouter>,
    sequence: AtomicU64,
    current: RwLock<Option<Activation>>,
}

impl Navigator {
    pub fn new(router: Arc<StateRouter>) -> Self {
        Self {
            router,
            sequence: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    pub fn router(&self) -> &Arc<StateRouter> {
        &self.router
    }

    /// Navigates to a URL
    pub async fn navigate(&self, path: &str) -> Result<Activation, TransitionError> {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.router.transition(path).await;
        self.commit(ticket, path, result).await
    }

    /// Navigates to a named state
    pub async fn go(&self, name: &str, params: &Params) -> Result<Activation, TransitionError> {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.router.go(name, params).await;
        self.commit(ticket, name, result).await
    }

    async fn commit(
        &self,
        ticket: u64,
        target: &str,
        result: Result<Activation, TransitionError>,
    ) -> Result<Activation, TransitionError> {
        let mut current = self.current.write().await;

        if self.sequence.load(Ordering::SeqCst) != ticket {
            debug!(target = %target, ticket, "Discarding superseded navigation");
            return Err(TransitionError::Superseded(target.to_string()));
        }

        let activation = result?;
        *current = Some(activation.clone());
        Ok(activation)
    }

    /// The last committed activation
    pub async fn current(&self) -> Option<Activation> {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;

    fn router() -> Arc<StateRouter> {
        let mut router = StateRouter::new();
        router.register(State::new("home", "/home")).unwrap();
        Arc::new(router)
    }

    #[tokio::test]
    async fn test_navigate_commits_activation() {
        let navigator = Navigator::new(router());
        assert!(navigator.current().await.is_none());

        navigator.navigate("/home").await.unwrap();
        assert_eq!(navigator.current().await.unwrap().state, "home");
    }

    #[tokio::test]
    async fn test_failed_navigation_keeps_current() {
        let navigator = Navigator::new(router());
        navigator.navigate("/home").await.unwrap();

        let err = navigator.navigate("/nowhere").await.unwrap_err();
        assert!(matches!(err, TransitionError::NotFound(_)));
        assert_eq!(navigator.current().await.unwrap().state, "home");
    }
}
