// Resilience probe tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_result, json_schema_enum, json_schema_object, json_schema_string,
    json_schema_string_array, require, root_array, root_object, Tool, ToolError,
};
use crate::value::ValueExt;
use anyhow::Result;
use litmus_sdk::{GraphQlExecutor, Variables};
use serde_json::{json, Value};
use std::sync::Arc;

/// Probe timeout used when the properties name none
pub const DEFAULT_PROBE_TIMEOUT: &str = "5s";
/// Probe interval used when the properties name none
pub const DEFAULT_PROBE_INTERVAL: &str = "2s";
pub const DEFAULT_PROBE_RETRY: i64 = 3;
pub const DEFAULT_PROBE_ATTEMPT: i64 = 1;

const PROBE_TYPES: &[&str] = &["httpProbe", "cmdProbe", "k8sProbe", "promProbe"];

const LIST_PROBES_QUERY: &str = r#"
query ListProbes(
    $projectID: ID!,
    $infrastructureType: InfrastructureType,
    $probeNames: [ID!],
    $filter: ProbeFilterInput
) {
    listProbes(
        projectID: $projectID,
        infrastructureType: $infrastructureType,
        probeNames: $probeNames,
        filter: $filter
    ) {
        projectID
        name
        description
        type
        infrastructureType
        tags
        referencedBy
        updatedAt
        createdAt
        createdBy {
            username
        }
        updatedBy {
            username
        }
    }
}
"#;

const ADD_PROBE_MUTATION: &str = r#"
mutation AddProbe($request: ProbeRequest!, $projectID: ID!) {
    addProbe(request: $request, projectID: $projectID) {
        projectID
        name
        description
        type
        infrastructureType
        tags
        createdAt
        createdBy {
            username
        }
    }
}
"#;

/// Tool to list resilience probes
pub struct ListResilienceProbesTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl ListResilienceProbesTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for ListResilienceProbesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_resilience_probes".to_string(),
            description: "List all resilience probes with plug-and-play architecture".to_string(),
            input_schema: json_schema_object(
                json!({
                    "type": json_schema_enum(PROBE_TYPES, "Filter by probe type")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let mut variables = Variables::new();
        let probe_type = arguments.str_or("type", "");
        if !probe_type.is_empty() {
            variables.insert("filter".to_string(), json!({"type": [probe_type]}));
        }

        let data = self.executor.execute(LIST_PROBES_QUERY, Some(variables)).await?;

        let probes: Vec<Value> = root_array(&data, "listProbes")?
            .iter()
            .map(|probe| {
                json!({
                    "name": probe.field("name"),
                    "description": probe.field("description"),
                    "type": probe.field("type"),
                    "infrastructureType": probe.field("infrastructureType"),
                    "tags": probe.field("tags"),
                    "referencedBy": probe.field("referencedBy"),
                    "createdBy": probe.nested_str(&["createdBy", "username"]),
                    "updatedBy": probe.nested_str(&["updatedBy", "username"]),
                    "createdAt": probe.field("createdAt"),
                    "updatedAt": probe.field("updatedAt"),
                })
            })
            .collect();

        json_result(&json!({
            "summary": format!("Found {} resilience probes", probes.len()),
            "totalProbes": probes.len(),
            "probes": probes,
        }))
    }
}

/// Tool to create a resilience probe
///
/// Each probe type carries its own property block with fixed comparators
/// and retry settings. Unrecognized types are forwarded without one.
pub struct CreateResilienceProbeTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl CreateResilienceProbeTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

/// The request key and body of the type-specific property block.
fn property_block(probe_type: &str, props: &Value) -> Option<(&'static str, Value)> {
    let timeout = props.str_or("timeout", DEFAULT_PROBE_TIMEOUT);
    let interval = props.str_or("interval", DEFAULT_PROBE_INTERVAL);

    let block = match probe_type {
        "httpProbe" => {
            let method = props.str_or("method", "get").to_lowercase();
            (
                "kubernetesHTTPProperties",
                json!({
                    "url": props.str_or("url", ""),
                    "method": {
                        method: {"criteria": "==", "responseCode": "200"}
                    },
                    "probeTimeout": timeout,
                    "interval": interval,
                    "retry": DEFAULT_PROBE_RETRY,
                    "attempt": DEFAULT_PROBE_ATTEMPT,
                    "insecureSkipVerify": false,
                }),
            )
        }
        "cmdProbe" => (
            "kubernetesCMDProperties",
            json!({
                "command": props.str_or("command", ""),
                "probeTimeout": timeout,
                "interval": interval,
                "retry": DEFAULT_PROBE_RETRY,
                "attempt": DEFAULT_PROBE_ATTEMPT,
                "comparator": {"type": "string", "criteria": "==", "value": "success"},
            }),
        ),
        "k8sProbe" => (
            "k8sProperties",
            json!({
                "group": "",
                "version": "v1",
                "resource": props.str_or("resource", ""),
                "operation": "present",
                "probeTimeout": timeout,
                "interval": interval,
                "retry": DEFAULT_PROBE_RETRY,
                "attempt": DEFAULT_PROBE_ATTEMPT,
            }),
        ),
        "promProbe" => (
            "promProperties",
            json!({
                "endpoint": props.str_or("endpoint", ""),
                "query": props.str_or("query", ""),
                "probeTimeout": timeout,
                "interval": interval,
                "retry": DEFAULT_PROBE_RETRY,
                "attempt": DEFAULT_PROBE_ATTEMPT,
                "comparator": {"type": "float", "criteria": ">=", "value": "0"},
            }),
        ),
        _ => return None,
    };
    Some(block)
}

#[async_trait::async_trait]
impl Tool for CreateResilienceProbeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_resilience_probe".to_string(),
            description: "Create a new resilience probe for steady-state validation".to_string(),
            input_schema: json_schema_object(
                json!({
                    "name": json_schema_string("Probe name"),
                    "description": json_schema_string("Probe description"),
                    "type": json_schema_enum(PROBE_TYPES, "Probe type"),
                    "properties": {
                        "type": "object",
                        "description": "Probe-specific configuration properties",
                        "properties": {
                            "url": json_schema_string("HTTP URL to probe (for httpProbe)"),
                            "method": json_schema_enum(&["GET", "POST"], "HTTP method"),
                            "command": json_schema_string("Command to execute (for cmdProbe)"),
                            "resource": json_schema_string("Kubernetes resource type (for k8sProbe)"),
                            "endpoint": json_schema_string("Prometheus endpoint (for promProbe)"),
                            "query": json_schema_string("PromQL query"),
                            "timeout": json_schema_string("Probe timeout (e.g., 5s)"),
                            "interval": json_schema_string("Probe interval (e.g., 2s)")
                        }
                    },
                    "tags": json_schema_string_array("Probe tags")
                }),
                vec!["name", "type", "properties"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let name = require(&arguments, "name")?;
        let probe_type = require(&arguments, "type")?;
        let properties = arguments
            .get("properties")
            .filter(|p| p.is_object())
            .ok_or(ToolError::MissingArguments("properties"))?;

        let mut request = json!({
            "name": name,
            "description": arguments.str_or("description", ""),
            "type": probe_type,
            "infrastructureType": "Kubernetes",
            "tags": arguments.string_list("tags"),
        });
        match property_block(&probe_type, properties) {
            Some((key, block)) => request[key] = block,
            None => tracing::warn!(probe_type = %probe_type, "No property block for probe type"),
        }

        let mut variables = Variables::new();
        variables.insert("request".to_string(), request);

        let data = self.executor.execute(ADD_PROBE_MUTATION, Some(variables)).await?;
        let created = root_object(&data, "addProbe")?;

        tracing::info!(probe = %name, "Created resilience probe");

        json_result(&json!({
            "success": true,
            "message": format!("Resilience probe '{}' created successfully", name),
            "probe": {
                "name": created.field("name"),
                "description": created.field("description"),
                "type": created.field("type"),
                "infrastructureType": created.field("infrastructureType"),
                "tags": created.field("tags"),
                "createdBy": created.nested_str(&["createdBy", "username"]),
                "createdAt": created.field("createdAt"),
            }
        }))
    }
}
