//! Configuration types for the Litmus SDK.

use std::time::Duration;
use url::Url;

/// Path of the GraphQL endpoint, relative to the Chaos Center base URL.
pub const GRAPHQL_PATH: &str = "query";

/// Default request timeout for every remote operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Litmus client.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Chaos Center.
    pub endpoint: Url,
    /// Project every operation is scoped to.
    pub project_id: String,
    /// Bearer token for authentication.
    pub access_token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration for the given endpoint and project.
    pub fn new(endpoint: Url, project_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            project_id: project_id.into(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Full URL of the GraphQL endpoint.
    ///
    /// The base URL is treated as a directory, so `http://host/api` and
    /// `http://host/api/` both resolve to `http://host/api/query`.
    pub fn graphql_url(&self) -> Result<Url, url::ParseError> {
        let mut base = self.endpoint.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(GRAPHQL_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_new() {
        let url = Url::parse("https://chaos.example.com").unwrap();
        let config = ClientConfig::new(url.clone(), "project-1");

        assert_eq!(config.endpoint, url);
        assert_eq!(config.project_id, "project-1");
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_client_config_defaults() {
        let url = Url::parse("https://chaos.example.com").unwrap();
        let config = ClientConfig::new(url, "project-1");

        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_graphql_url() {
        let config = ClientConfig::new(Url::parse("http://localhost:8080").unwrap(), "p");
        assert_eq!(
            config.graphql_url().unwrap().as_str(),
            "http://localhost:8080/query"
        );
    }

    #[test]
    fn test_graphql_url_keeps_base_path() {
        let config = ClientConfig::new(Url::parse("http://localhost:9002/api").unwrap(), "p");
        assert_eq!(
            config.graphql_url().unwrap().as_str(),
            "http://localhost:9002/api/query"
        );

        let config = ClientConfig::new(Url::parse("http://localhost:9002/api/").unwrap(), "p");
        assert_eq!(
            config.graphql_url().unwrap().as_str(),
            "http://localhost:9002/api/query"
        );
    }
}
