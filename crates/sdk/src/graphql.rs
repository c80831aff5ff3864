//! GraphQL envelope types and the executor seam.

use crate::error::{LitmusError, LitmusResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Variables attached to a GraphQL operation.
pub type Variables = serde_json::Map<String, Value>;

/// Name of the variable every operation is scoped by.
pub const PROJECT_ID_VARIABLE: &str = "projectID";

/// Request body posted to the GraphQL endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: &'a Variables,
}

/// Response envelope returned by the GraphQL endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single error entry of the response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

impl GraphQlResponse {
    /// Surface either the data payload or the concatenated errors, never both.
    pub fn into_result(self) -> LitmusResult<Value> {
        if !self.errors.is_empty() {
            return Err(LitmusError::from_graphql_messages(
                self.errors.iter().map(|e| e.message.as_str()),
            ));
        }
        self.data.ok_or(LitmusError::MissingData)
    }
}

/// Executes GraphQL operations against the Chaos Center.
///
/// Implementations scope every operation to their configured project.
#[async_trait::async_trait]
pub trait GraphQlExecutor: Send + Sync {
    /// Execute an operation, returning the raw `data` payload.
    async fn execute(&self, query: &str, variables: Option<Variables>) -> LitmusResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_result_returns_data() {
        let response: GraphQlResponse =
            serde_json::from_value(json!({"data": {"runChaosExperiment": {"notifyID": "n-1"}}}))
                .unwrap();

        let data = response.into_result().unwrap();
        assert_eq!(data["runChaosExperiment"]["notifyID"], "n-1");
    }

    #[test]
    fn test_into_result_errors_win_over_data() {
        let response: GraphQlResponse = serde_json::from_value(json!({
            "data": {"getInfra": null},
            "errors": [{"message": "infra not found"}, {"message": "permission denied"}]
        }))
        .unwrap();

        match response.into_result() {
            Err(LitmusError::GraphQl(msg)) => {
                assert_eq!(msg, "infra not found, permission denied")
            }
            other => panic!("Expected GraphQl error, got {other:?}"),
        }
    }

    #[test]
    fn test_into_result_empty_error_list_is_success() {
        let response: GraphQlResponse =
            serde_json::from_value(json!({"data": {"ok": true}, "errors": []})).unwrap();
        assert!(response.into_result().is_ok());
    }

    #[test]
    fn test_into_result_missing_data() {
        let response: GraphQlResponse = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(matches!(
            response.into_result(),
            Err(LitmusError::MissingData)
        ));
    }

    #[test]
    fn test_request_serialization() {
        let mut variables = Variables::new();
        variables.insert("experimentID".to_string(), json!("exp-1"));
        let request = GraphQlRequest {
            query: "query { x }",
            variables: &variables,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"query": "query { x }", "variables": {"experimentID": "exp-1"}})
        );
    }
}
