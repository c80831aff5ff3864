//! HTTP transport layer for the Litmus SDK.

use crate::config::ClientConfig;
use crate::error::{LitmusError, LitmusResult};
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use reqwest::{header, Client};
use std::sync::Arc;
use tracing::debug;

/// HTTP transport for posting GraphQL operations.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> LitmusResult<Self> {
        let mut headers = header::HeaderMap::new();

        if let Some(ref token) = config.access_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| LitmusError::Config("Invalid access token format".to_string()))?,
            );
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Post a GraphQL operation and decode the response envelope.
    ///
    /// The envelope is decoded regardless of HTTP status; a body that is not
    /// an envelope is reported as an API error when the status is not a
    /// success, and as a decode error otherwise.
    pub async fn post_graphql(&self, request: &GraphQlRequest<'_>) -> LitmusResult<GraphQlResponse> {
        let url = self.config.graphql_url()?;
        debug!(url = %url, "POST GraphQL operation");

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<GraphQlResponse>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(LitmusError::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
