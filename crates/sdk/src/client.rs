//! Main client for the Litmus SDK.

use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
use crate::error::{LitmusError, LitmusResult};
use crate::graphql::{GraphQlExecutor, GraphQlRequest, Variables, PROJECT_ID_VARIABLE};
use crate::transport::HttpTransport;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the Chaos Center GraphQL API.
///
/// Holds only immutable configuration; clones share the underlying
/// HTTP client.
#[derive(Debug, Clone)]
pub struct LitmusClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl LitmusClient {
    /// Create a new client builder.
    pub fn builder() -> LitmusClientBuilder {
        LitmusClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> LitmusResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Scope a variable set to the configured project.
    ///
    /// Any caller-supplied `projectID` is overwritten.
    fn scoped_variables(&self, variables: Option<Variables>) -> Variables {
        let mut variables = variables.unwrap_or_default();
        variables.insert(
            PROJECT_ID_VARIABLE.to_string(),
            Value::String(self.config.project_id.clone()),
        );
        variables
    }
}

#[async_trait::async_trait]
impl GraphQlExecutor for LitmusClient {
    async fn execute(&self, query: &str, variables: Option<Variables>) -> LitmusResult<Value> {
        let variables = self.scoped_variables(variables);
        let request = GraphQlRequest {
            query,
            variables: &variables,
        };

        self.http.post_graphql(&request).await?.into_result()
    }
}

/// Builder for creating a LitmusClient.
pub struct LitmusClientBuilder {
    endpoint: Option<String>,
    project_id: Option<String>,
    access_token: Option<String>,
    timeout: Duration,
}

impl LitmusClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            project_id: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL of the Chaos Center.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Set the project every operation is scoped to.
    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    /// Set the bearer token for authentication.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> LitmusResult<LitmusClient> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| LitmusError::Config("endpoint is required".to_string()))?;
        let project_id = self
            .project_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LitmusError::Config("project_id is required".to_string()))?;

        let mut config = ClientConfig::new(Url::parse(&endpoint)?, project_id);
        config.access_token = self.access_token.filter(|t| !t.is_empty());
        config.timeout = self.timeout;

        LitmusClient::from_config(config)
    }
}

impl Default for LitmusClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
