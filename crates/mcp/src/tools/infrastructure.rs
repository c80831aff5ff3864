// Chaos infrastructure tools: list, inspect and register execution planes

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_result, json_schema_boolean, json_schema_enum, json_schema_object, json_schema_string,
    json_schema_string_array, list, require, required_or, root_object, Tool,
};
use crate::value::ValueExt;
use anyhow::Result;
use litmus_sdk::{GraphQlExecutor, Variables};
use serde_json::{json, Value};
use std::sync::Arc;

/// Placeholder reported when the installation manifest cannot be fetched
pub const MANIFEST_UNAVAILABLE: &str = "Manifest not available";

const REGISTER_DESCRIPTION: &str = "Registered via MCP Server";
const DEFAULT_PLATFORM: &str = "Generic Kubernetes";
const DEFAULT_NAMESPACE: &str = "litmus";
const SERVICE_ACCOUNT: &str = "litmus-admin";
const INFRASTRUCTURE_TYPE: &str = "Kubernetes";

const LIST_INFRAS_QUERY: &str = r#"
query ListInfras($projectID: ID!, $request: ListInfraRequest) {
    listInfras(projectID: $projectID, request: $request) {
        totalNoOfInfras
        infras {
            projectID
            infraID
            name
            description
            environmentID
            platformName
            isActive
            isInfraConfirmed
            infraScope
            infraNamespace
            version
            noOfExperiments
            noOfExperimentRuns
            tags
            createdAt
            updatedAt
            createdBy {
                username
            }
            updateStatus
        }
    }
}
"#;

const GET_INFRA_QUERY: &str = r#"
query GetInfra($projectID: ID!, $infraID: String!) {
    getInfra(projectID: $projectID, infraID: $infraID) {
        projectID
        infraID
        name
        description
        environmentID
        platformName
        isActive
        isInfraConfirmed
        infraScope
        infraNamespace
        serviceAccount
        infraNsExists
        infraSaExists
        version
        token
        noOfExperiments
        noOfExperimentRuns
        lastExperimentTimestamp
        startTime
        tags
        createdAt
        updatedAt
        createdBy {
            username
            email
        }
        updatedBy {
            username
            email
        }
        updateStatus
    }
}
"#;

const GET_MANIFEST_QUERY: &str = r#"
query GetInfraManifest($infraID: ID!, $upgrade: Boolean!, $projectID: ID!) {
    getInfraManifest(infraID: $infraID, upgrade: $upgrade, projectID: $projectID)
}
"#;

const REGISTER_INFRA_MUTATION: &str = r#"
mutation RegisterInfra($projectID: ID!, $request: RegisterInfraRequest!) {
    registerInfra(projectID: $projectID, request: $request) {
        token
        infraID
        name
        manifest
    }
}
"#;

/// Tool to list chaos infrastructures
pub struct ListChaosInfrastructuresTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl ListChaosInfrastructuresTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }

    fn request_variables(args: &Value) -> Variables {
        let mut request = serde_json::Map::new();

        let environment_id = args.str_or("environmentId", "");
        if !environment_id.is_empty() {
            request.insert("environmentIDs".to_string(), json!([environment_id]));
        }

        let status = args.str_or("status", "");
        if !status.is_empty() {
            request.insert("filter".to_string(), json!({"isActive": status == "Active"}));
        }

        let mut variables = Variables::new();
        if !request.is_empty() {
            variables.insert("request".to_string(), Value::Object(request));
        }
        variables
    }
}

#[async_trait::async_trait]
impl Tool for ListChaosInfrastructuresTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_chaos_infrastructures".to_string(),
            description: "List all chaos infrastructures (formerly agents/delegates)".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environmentId": json_schema_string("Filter by environment"),
                    "status": json_schema_enum(&["Active", "Inactive"], "Filter by infrastructure status")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let data = self
            .executor
            .execute(LIST_INFRAS_QUERY, Some(Self::request_variables(&arguments)))
            .await?;

        let listing = root_object(&data, "listInfras")?;
        let infrastructures: Vec<Value> = list(listing, "infras")
            .iter()
            .map(|infra| {
                json!({
                    "id": infra.field("infraID"),
                    "name": infra.field("name"),
                    "description": infra.field("description"),
                    "environment": infra.field("environmentID"),
                    "platform": infra.field("platformName"),
                    "active": infra.field("isActive"),
                    "confirmed": infra.field("isInfraConfirmed"),
                    "scope": infra.field("infraScope"),
                    "namespace": infra.field("infraNamespace"),
                    "version": infra.field("version"),
                    "statistics": {
                        "experiments": infra.field("noOfExperiments"),
                        "runs": infra.field("noOfExperimentRuns"),
                    },
                    "tags": infra.field("tags"),
                    "updateStatus": infra.field("updateStatus"),
                    "createdBy": infra.nested_str(&["createdBy", "username"]),
                    "createdAt": infra.field("createdAt"),
                    "updatedAt": infra.field("updatedAt"),
                })
            })
            .collect();
        let total = listing.field("totalNoOfInfras");

        json_result(&json!({
            "summary": format!("Found {} chaos infrastructures", total),
            "totalInfrastructures": total,
            "infrastructures": infrastructures,
        }))
    }
}

/// Tool to inspect one chaos infrastructure
///
/// Falls back to the configured default infrastructure when the call names
/// none. With `includeManifest` a second query fetches the installation
/// manifest; failure of that query never fails the tool.
pub struct GetInfrastructureDetailsTool {
    executor: Arc<dyn GraphQlExecutor>,
    default_infra_id: Option<String>,
}

impl GetInfrastructureDetailsTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>, default_infra_id: Option<String>) -> Self {
        Self {
            executor,
            default_infra_id,
        }
    }

    async fn manifest(&self, infra_id: &str) -> Value {
        let mut variables = Variables::new();
        variables.insert("infraID".to_string(), json!(infra_id));
        variables.insert("upgrade".to_string(), json!(false));

        match self.executor.execute(GET_MANIFEST_QUERY, Some(variables)).await {
            Ok(data) => match data.get("getInfraManifest") {
                Some(manifest) if !manifest.is_null() => manifest.clone(),
                _ => json!(MANIFEST_UNAVAILABLE),
            },
            Err(e) => {
                tracing::warn!(infra_id = %infra_id, "Failed to fetch infrastructure manifest: {}", e);
                json!(MANIFEST_UNAVAILABLE)
            }
        }
    }
}

#[async_trait::async_trait]
impl Tool for GetInfrastructureDetailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_infrastructure_details".to_string(),
            description: "Get detailed information about a chaos infrastructure".to_string(),
            input_schema: json_schema_object(
                json!({
                    "infraId": json_schema_string("Infrastructure ID"),
                    "includeManifest": json_schema_boolean("Include installation manifest")
                }),
                vec!["infraId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let infra_id = required_or(
            &arguments,
            "infraId",
            self.default_infra_id.as_deref().unwrap_or_default(),
        )?;

        let mut variables = Variables::new();
        variables.insert("infraID".to_string(), json!(infra_id));

        let data = self.executor.execute(GET_INFRA_QUERY, Some(variables)).await?;
        let infra = root_object(&data, "getInfra")?;

        let manifest = if arguments.bool_or("includeManifest", false) {
            self.manifest(&infra_id).await
        } else {
            Value::Null
        };

        json_result(&json!({
            "infrastructure": {
                "id": infra.field("infraID"),
                "name": infra.field("name"),
                "description": infra.field("description"),
                "environment": infra.field("environmentID"),
                "platform": infra.field("platformName"),
                "active": infra.field("isActive"),
                "confirmed": infra.field("isInfraConfirmed"),
                "scope": infra.field("infraScope"),
                "namespace": infra.field("infraNamespace"),
                "serviceAccount": infra.field("serviceAccount"),
                "namespaceExists": infra.field("infraNsExists"),
                "serviceAccountExists": infra.field("infraSaExists"),
                "version": infra.field("version"),
                "statistics": {
                    "experiments": infra.field("noOfExperiments"),
                    "runs": infra.field("noOfExperimentRuns"),
                    "lastExperiment": infra.field("lastExperimentTimestamp"),
                },
                "startTime": infra.field("startTime"),
                "tags": infra.field("tags"),
                "updateStatus": infra.field("updateStatus"),
                "createdBy": infra.nested_str(&["createdBy", "username"]),
                "updatedBy": infra.nested_str(&["updatedBy", "username"]),
                "createdAt": infra.field("createdAt"),
                "updatedAt": infra.field("updatedAt"),
                "manifest": manifest,
            }
        }))
    }
}

/// Tool to register a new chaos infrastructure
pub struct RegisterChaosInfrastructureTool {
    executor: Arc<dyn GraphQlExecutor>,
    default_environment_id: String,
}

impl RegisterChaosInfrastructureTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>, default_environment_id: String) -> Self {
        Self {
            executor,
            default_environment_id,
        }
    }
}

#[async_trait::async_trait]
impl Tool for RegisterChaosInfrastructureTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "register_chaos_infrastructure".to_string(),
            description: "Register a new chaos infrastructure".to_string(),
            input_schema: json_schema_object(
                json!({
                    "name": json_schema_string("Infrastructure name"),
                    "description": json_schema_string("Infrastructure description"),
                    "environmentId": json_schema_string("Environment ID"),
                    "platformName": json_schema_string("Platform name (e.g., GKE, EKS, AKS)"),
                    "infraScope": json_schema_enum(&["namespace", "cluster"], "Infrastructure scope"),
                    "infraNamespace": json_schema_string("Kubernetes namespace for infra components"),
                    "tags": json_schema_string_array("Infrastructure tags")
                }),
                vec!["name", "environmentId", "infraScope"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let name = require(&arguments, "name")?;
        let environment_id =
            required_or(&arguments, "environmentId", &self.default_environment_id)?;
        let infra_scope = require(&arguments, "infraScope")?;

        let request = json!({
            "name": name,
            "description": arguments.str_or("description", REGISTER_DESCRIPTION),
            "environmentID": environment_id,
            "infrastructureType": INFRASTRUCTURE_TYPE,
            "platformName": arguments.str_or("platformName", DEFAULT_PLATFORM),
            "infraScope": infra_scope,
            "infraNamespace": arguments.str_or("infraNamespace", DEFAULT_NAMESPACE),
            "serviceAccount": SERVICE_ACCOUNT,
            "infraNsExists": false,
            "infraSaExists": false,
            "skipSsl": false,
            "tags": arguments.string_list("tags"),
        });

        let mut variables = Variables::new();
        variables.insert("request".to_string(), request);

        let data = self
            .executor
            .execute(REGISTER_INFRA_MUTATION, Some(variables))
            .await?;
        let registered = root_object(&data, "registerInfra")?;

        tracing::info!(infra = %name, "Registered chaos infrastructure");

        json_result(&json!({
            "success": true,
            "message": format!("Chaos infrastructure '{}' registered successfully", name),
            "infrastructure": {
                "id": registered.field("infraID"),
                "name": registered.field("name"),
                "token": registered.field("token"),
                "installationInstructions": {
                    "step1": "Apply the following manifest to your Kubernetes cluster:",
                    "manifest": registered.field("manifest"),
                    "step2": "Wait for the infrastructure to be confirmed in the Chaos Center",
                    "step3": "Start creating and running chaos experiments",
                },
            }
        }))
    }
}
