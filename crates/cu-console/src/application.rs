//! Application records and the lookup that fetches them by name
//!
//! Three pieces:
//! - `ApplicationService`: the lookup contract (`find_by_name`)
//! - `HttpApplicationService` / `InMemoryApplicationService`: backends
//! - `AppResolver`: plugs a backend into a state's resolve phase

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cu_router::{ResolveContext, ResolveError, Resolver};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ServiceError;

// ============================================================================
// Records
// ============================================================================

/// A deployed application as the console sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub user: Option<Owner>,

    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub status: String,
}

impl Application {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            status: String::new(),
            user: None,
            servers: Vec::new(),
            modules: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_module(mut self, name: impl Into<String>) -> Self {
        self.modules.push(Module {
            name: name.into(),
            status: self.status.clone(),
        });
        self
    }
}

// ============================================================================
// Lookup contract
// ============================================================================

#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Fetches one application by its unique name
    async fn find_by_name(&self, name: &str) -> Result<Application, ServiceError>;
}

// ============================================================================
// HTTP backend
// ============================================================================

/// Lookup against the console's REST API: `GET {base_url}/application/{name}`
#[derive(Debug, Clone)]
pub struct HttpApplicationService {
    client: Client,
    base_url: String,
}

impl HttpApplicationService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ServiceError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn application_url(&self, name: &str) -> String {
        format!("{}/application/{}", self.base_url, urlencoding::encode(name))
    }
}

#[async_trait]
impl ApplicationService for HttpApplicationService {
    async fn find_by_name(&self, name: &str) -> Result<Application, ServiceError> {
        let url = self.application_url(name);
        debug!(url = %url, "Fetching application");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(name.to_string()));
        }

        if !status.is_success() {
            let message = match response.text().await {
                Ok(message) => message,
                Err(err) => {
                    debug!(url = %url, error = %err, "Failed to read error body");
                    String::new()
                }
            };
            warn!(url = %url, status = status.as_u16(), "Application service error");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Seeded lookup for offline use and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationService {
    applications: Arc<RwLock<HashMap<String, Application>>>,
}

impl InMemoryApplicationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applications(applications: impl IntoIterator<Item = Application>) -> Self {
        let map = applications
            .into_iter()
            .map(|app| (app.name.clone(), app))
            .collect();
        Self {
            applications: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn insert(&self, application: Application) {
        self.applications
            .write()
            .await
            .insert(application.name.clone(), application);
    }

    pub async fn len(&self) -> usize {
        self.applications.read().await.len()
    }
}

#[async_trait]
impl ApplicationService for InMemoryApplicationService {
    async fn find_by_name(&self, name: &str) -> Result<Application, ServiceError> {
        self.applications
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))
    }
}

// ============================================================================
// Resolve adapter
// ============================================================================

/// Resolves the application named by the `name` path parameter
pub struct AppResolver {
    service: Arc<dyn ApplicationService>,
}

impl AppResolver {
    pub const PARAM: &'static str = "name";

    pub fn new(service: Arc<dyn ApplicationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Resolver for AppResolver {
    async fn resolve(&self, ctx: ResolveContext<'_>) -> Result<Value, ResolveError> {
        let name = ctx.param(Self::PARAM)?;
        let application = self
            .service
            .find_by_name(name)
            .await
            .map_err(ResolveError::provider)?;
        serde_json::to_value(application).map_err(ResolveError::provider)
    }

    fn required_params(&self) -> Vec<String> {
        vec![Self::PARAM.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cu_router::{Locals, Params};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_application_decodes_camel_case_and_ignores_unknown_fields() {
        let body = r#"{
            "name": "acme",
            "displayName": "Acme Shop",
            "status": "START",
            "user": { "login": "johndoe", "email": "john@example.com" },
            "servers": [{ "name": "acme-tomcat-8", "status": "START" }],
            "modules": [{ "name": "acme-mysql-5-7", "status": "START" }],
            "creationDate": "2016-03-01"
        }"#;

        let app: Application = serde_json::from_str(body).unwrap();
        assert_eq!(app.display_name, "Acme Shop");
        assert_eq!(app.user.unwrap().login, "johndoe");
        assert_eq!(app.servers[0].name, "acme-tomcat-8");
        assert_eq!(app.modules[0].name, "acme-mysql-5-7");
    }

    #[test]
    fn test_application_serializes_camel_case() {
        let value = serde_json::to_value(Application::new("acme").with_status("START")).unwrap();
        assert_eq!(value["displayName"], json!("acme"));
        assert_eq!(value["status"], json!("START"));
    }

    #[test]
    fn test_new_application_has_no_status() {
        let app = Application::new("acme");
        assert_eq!(app.status, "");

        let decoded: Application = serde_json::from_str(r#"{ "name": "acme" }"#).unwrap();
        assert_eq!(decoded.status, app.status);
    }

    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (HttpApplicationService, tokio::task::JoinHandle<String>) {
        serve_raw(format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        ))
        .await
    }

    /// Serves one raw HTTP response and hands back the request line
    async fn serve_raw(
        response: String,
    ) -> (HttpApplicationService, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        let service = HttpApplicationService::new(base_url, Duration::from_secs(5)).unwrap();
        (service, handle)
    }

    #[tokio::test]
    async fn test_http_not_found() {
        let (service, request) = serve_once("404 Not Found", "").await;

        let err = service.find_by_name("my app").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref name) if name == "my app"));
        assert_eq!(request.await.unwrap(), "GET /application/my%20app HTTP/1.1");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (service, _request) = serve_once("500 Internal Server Error", "boom").await;

        let err = service.find_by_name("acme").await.unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 500, ref message } if message == "boom"));
        assert_eq!(err.to_string(), "application service answered 500: boom");
    }

    #[tokio::test]
    async fn test_http_error_status_with_unreadable_body() {
        let (service, _request) = serve_raw(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort"
                .to_string(),
        )
        .await;

        let err = service.find_by_name("acme").await.unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 503, ref message } if message.is_empty()));
    }

    #[tokio::test]
    async fn test_http_malformed_body() {
        let (service, _request) = serve_once("200 OK", "{not json").await;

        let err = service.find_by_name("acme").await.unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn test_http_decodes_application() {
        let (service, request) = serve_once(
            "200 OK",
            r#"{"name":"acme","displayName":"A","status":"START","modules":[{"name":"acme-mysql-5-7"}]}"#,
        )
        .await;

        let app = service.find_by_name("acme").await.unwrap();
        assert_eq!(app.display_name, "A");
        assert_eq!(app.modules[0].name, "acme-mysql-5-7");
        assert_eq!(request.await.unwrap(), "GET /application/acme HTTP/1.1");
    }

    #[test]
    fn test_application_url_encodes_name() {
        let service =
            HttpApplicationService::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            service.application_url("my app"),
            "http://localhost:8080/application/my%20app"
        );
    }

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let service = InMemoryApplicationService::new();
        service.insert(Application::new("acme")).await;
        assert_eq!(service.len().await, 1);

        assert_eq!(service.find_by_name("acme").await.unwrap().name, "acme");
        assert!(service.find_by_name("ghost").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_app_resolver_wraps_service_error() {
        let resolver = AppResolver::new(Arc::new(InMemoryApplicationService::new()));
        assert_eq!(resolver.required_params(), vec!["name".to_string()]);

        let mut params = Params::new();
        params.insert("name".to_string(), "ghost".to_string());
        let locals = Locals::new();

        let err = resolver
            .resolve(ResolveContext {
                params: &params,
                locals: &locals,
            })
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ServiceError>().is_some_and(ServiceError::is_not_found));
    }
}
