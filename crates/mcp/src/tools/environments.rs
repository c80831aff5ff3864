// Environment tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_result, json_schema_enum, json_schema_object, json_schema_string,
    json_schema_string_array, list, require, root_object, slugify, Tool,
};
use crate::value::ValueExt;
use anyhow::Result;
use litmus_sdk::{GraphQlExecutor, Variables};
use serde_json::{json, Value};
use std::sync::Arc;

const ENVIRONMENT_TYPES: &[&str] = &["PROD", "NON_PROD"];

const LIST_ENVIRONMENTS_QUERY: &str = r#"
query ListEnvironments($projectID: ID!, $request: ListEnvironmentRequest) {
    listEnvironments(projectID: $projectID, request: $request) {
        totalNoOfEnvironments
        environments {
            projectID
            environmentID
            name
            description
            type
            tags
            infraIDs
            createdAt
            updatedAt
            createdBy {
                username
            }
            updatedBy {
                username
            }
        }
    }
}
"#;

const CREATE_ENVIRONMENT_MUTATION: &str = r#"
mutation CreateEnvironment($projectID: ID!, $request: CreateEnvironmentRequest) {
    createEnvironment(projectID: $projectID, request: $request) {
        projectID
        environmentID
        name
        description
        type
        tags
        createdAt
        createdBy {
            username
        }
    }
}
"#;

/// Tool to list environments
pub struct ListEnvironmentsTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl ListEnvironmentsTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for ListEnvironmentsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_environments".to_string(),
            description: "List all environments for organizing chaos infrastructures".to_string(),
            input_schema: json_schema_object(
                json!({
                    "type": json_schema_enum(ENVIRONMENT_TYPES, "Filter by environment type")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let mut variables = Variables::new();
        let env_type = arguments.str_or("type", "");
        if !env_type.is_empty() {
            variables.insert("request".to_string(), json!({"filter": {"type": env_type}}));
        }

        let data = self
            .executor
            .execute(LIST_ENVIRONMENTS_QUERY, Some(variables))
            .await?;

        let listing = root_object(&data, "listEnvironments")?;
        let environments: Vec<Value> = list(listing, "environments")
            .iter()
            .map(|env| {
                let infra_ids = env.array("infraIDs");
                json!({
                    "id": env.field("environmentID"),
                    "name": env.field("name"),
                    "description": env.field("description"),
                    "type": env.field("type"),
                    "tags": env.field("tags"),
                    "infrastructureCount": infra_ids.map_or(0, Vec::len),
                    "infrastructureIds": infra_ids,
                    "createdBy": env.nested_str(&["createdBy", "username"]),
                    "updatedBy": env.nested_str(&["updatedBy", "username"]),
                    "createdAt": env.field("createdAt"),
                    "updatedAt": env.field("updatedAt"),
                })
            })
            .collect();
        let total = listing.field("totalNoOfEnvironments");

        json_result(&json!({
            "summary": format!("Found {} environments", total),
            "totalEnvironments": total,
            "environments": environments,
        }))
    }
}

/// Tool to create an environment
///
/// The environment id is derived from the name: lowercased, spaces to dashes.
pub struct CreateEnvironmentTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl CreateEnvironmentTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for CreateEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_environment".to_string(),
            description: "Create a new environment for organizing chaos infrastructures".to_string(),
            input_schema: json_schema_object(
                json!({
                    "name": json_schema_string("Environment name"),
                    "description": json_schema_string("Environment description"),
                    "type": json_schema_enum(ENVIRONMENT_TYPES, "Environment type"),
                    "tags": json_schema_string_array("Environment tags")
                }),
                vec!["name", "type"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let name = require(&arguments, "name")?;
        let env_type = require(&arguments, "type")?;

        let request = json!({
            "environmentID": slugify(&name),
            "name": name,
            "description": arguments.str_or("description", ""),
            "type": env_type,
            "tags": arguments.string_list("tags"),
        });

        let mut variables = Variables::new();
        variables.insert("request".to_string(), request);

        let data = self
            .executor
            .execute(CREATE_ENVIRONMENT_MUTATION, Some(variables))
            .await?;
        let created = root_object(&data, "createEnvironment")?;

        tracing::info!(environment = %name, "Created environment");

        json_result(&json!({
            "success": true,
            "message": format!("Environment '{}' created successfully", name),
            "environment": {
                "id": created.field("environmentID"),
                "name": created.field("name"),
                "description": created.field("description"),
                "type": created.field("type"),
                "tags": created.field("tags"),
                "createdBy": created.nested_str(&["createdBy", "username"]),
                "createdAt": created.field("createdAt"),
            }
        }))
    }
}
