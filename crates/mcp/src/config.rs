// Process configuration, resolved once at startup from flags and environment

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use litmus_sdk::ClientConfig;
use std::convert::Infallible;
use std::time::Duration;
use url::Url;

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
const DEFAULT_ENVIRONMENT_ID: &str = "production";

#[derive(Parser, Debug, Clone)]
#[command(name = "litmus-mcp")]
#[command(version, about = "LitmusChaos MCP server - chaos engineering tools over stdio", long_about = None)]
pub struct ServerConfig {
    /// Chaos Center base URL
    #[arg(
        long,
        env = "CHAOS_CENTER_ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        value_parser = parse_endpoint
    )]
    pub endpoint: Url,

    /// Project every operation is scoped to
    #[arg(long, env = "LITMUS_PROJECT_ID", value_parser = NonEmptyStringValueParser::new())]
    pub project_id: String,

    /// Bearer token for the Chaos Center API
    #[arg(long, env = "LITMUS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Infrastructure used when a tool call names none
    #[arg(long, env = "DEFAULT_INFRA_ID")]
    pub default_infra_id: Option<String>,

    /// Environment used when a tool call names none
    #[arg(
        long,
        env = "DEFAULT_ENVIRONMENT_ID",
        default_value = DEFAULT_ENVIRONMENT_ID,
        value_parser = environment_or_default
    )]
    pub default_environment_id: String,

    /// Timeout for each remote operation, in seconds
    #[arg(long, env = "LITMUS_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Configuration for the GraphQL client
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.endpoint.clone(), self.project_id.clone());
        config.access_token = non_empty(&self.access_token);
        config.timeout = Duration::from_secs(self.timeout_secs);
        config
    }

    /// Fallback values handed to the tools that accept them
    pub fn tool_defaults(&self) -> ToolDefaults {
        ToolDefaults {
            infra_id: non_empty(&self.default_infra_id),
            environment_id: self.default_environment_id.clone(),
        }
    }
}

/// Fallback identifiers for tool arguments
#[derive(Debug, Clone, Default)]
pub struct ToolDefaults {
    pub infra_id: Option<String>,
    pub environment_id: String,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

// Empty values count as unset, for flags and environment alike
fn parse_endpoint(value: &str) -> Result<Url, url::ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Url::parse(DEFAULT_ENDPOINT);
    }
    Url::parse(value)
}

fn environment_or_default(value: &str) -> Result<String, Infallible> {
    if value.is_empty() {
        return Ok(DEFAULT_ENVIRONMENT_ID.to_string());
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_flags() {
        let config = ServerConfig::try_parse_from([
            "litmus-mcp",
            "--endpoint",
            "https://chaos.example.com",
            "--project-id",
            "project-1",
            "--access-token",
            "secret",
            "--default-infra-id",
            "infra-9",
            "--default-environment-id",
            "staging",
        ])
        .unwrap();

        assert_eq!(config.endpoint.as_str(), "https://chaos.example.com/");
        assert_eq!(config.project_id, "project-1");

        let client = config.client_config();
        assert_eq!(client.project_id, "project-1");
        assert_eq!(client.access_token.as_deref(), Some("secret"));
        assert_eq!(client.timeout, Duration::from_secs(30));

        let defaults = config.tool_defaults();
        assert_eq!(defaults.infra_id.as_deref(), Some("infra-9"));
        assert_eq!(defaults.environment_id, "staging");
    }

    #[test]
    fn test_empty_project_id_rejected() {
        let result = ServerConfig::try_parse_from(["litmus-mcp", "--project-id", ""]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_optional_values_are_unset() {
        let config = ServerConfig::try_parse_from([
            "litmus-mcp",
            "--project-id",
            "p",
            "--access-token",
            "",
            "--default-infra-id",
            "",
        ])
        .unwrap();

        assert!(config.client_config().access_token.is_none());
        assert!(config.tool_defaults().infra_id.is_none());
    }

    #[test]
    fn test_empty_endpoint_and_environment_fall_back() {
        let config = ServerConfig::try_parse_from([
            "litmus-mcp",
            "--project-id",
            "p",
            "--endpoint",
            "",
            "--default-environment-id",
            "",
        ])
        .unwrap();

        assert_eq!(config.endpoint.as_str(), "http://localhost:8080/");
        assert_eq!(config.tool_defaults().environment_id, "production");
    }

    #[test]
    fn test_empty_environment_variables_fall_back() {
        std::env::set_var("CHAOS_CENTER_ENDPOINT", "");
        std::env::set_var("DEFAULT_ENVIRONMENT_ID", "");

        let config = ServerConfig::try_parse_from(["litmus-mcp", "--project-id", "p"]).unwrap();

        std::env::remove_var("CHAOS_CENTER_ENDPOINT");
        std::env::remove_var("DEFAULT_ENVIRONMENT_ID");

        assert_eq!(config.endpoint.as_str(), "http://localhost:8080/");
        assert_eq!(config.tool_defaults().environment_id, "production");
        assert_eq!(
            config.client_config().graphql_url().unwrap().as_str(),
            "http://localhost:8080/query"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result =
            ServerConfig::try_parse_from(["litmus-mcp", "--project-id", "p", "--endpoint", "::"]);
        assert!(result.is_err());
    }
}
