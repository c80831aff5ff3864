// Experiment run history tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_result, json_schema_boolean, json_schema_enum, json_schema_number, json_schema_object,
    json_schema_string, list, require, root_object, Tool,
};
use crate::value::ValueExt;
use anyhow::Result;
use litmus_sdk::{GraphQlExecutor, Variables};
use serde_json::{json, Value};
use std::sync::Arc;

/// Number of runs returned when the caller names no limit
pub const DEFAULT_RUN_LIMIT: i64 = 20;

const RUN_STATUSES: &[&str] = &["Running", "Completed", "Failed", "Stopped", "Queued"];

const LIST_RUNS_QUERY: &str = r#"
query ListExperimentRun($projectID: ID!, $request: ListExperimentRunRequest!) {
    listExperimentRun(projectID: $projectID, request: $request) {
        totalNoOfExperimentRuns
        experimentRuns {
            projectID
            experimentRunID
            experimentID
            experimentName
            phase
            resiliencyScore
            faultsPassed
            faultsFailed
            faultsAwaited
            faultsStopped
            totalFaults
            updatedAt
            createdAt
            runSequence
            infra {
                infraID
                name
                environmentID
                platformName
            }
            createdBy {
                username
            }
        }
    }
}
"#;

const GET_RUN_QUERY: &str = r#"
query GetExperimentRun($projectID: ID!, $experimentRunID: ID, $notifyID: ID) {
    getExperimentRun(
        projectID: $projectID,
        experimentRunID: $experimentRunID,
        notifyID: $notifyID
    ) {
        projectID
        experimentRunID
        experimentID
        experimentName
        experimentManifest
        phase
        resiliencyScore
        faultsPassed
        faultsFailed
        faultsAwaited
        faultsStopped
        faultsNa
        totalFaults
        executionData
        updatedAt
        createdAt
        runSequence
        infra {
            infraID
            name
            environmentID
            platformName
            version
        }
        createdBy {
            username
            email
        }
        updatedBy {
            username
            email
        }
    }
}
"#;

/// Tool to list experiment runs
pub struct ListExperimentRunsTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl ListExperimentRunsTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }

    fn request_variables(args: &Value) -> Variables {
        let mut request = json!({
            "pagination": {
                "page": 0,
                "limit": args.int_or("limit", DEFAULT_RUN_LIMIT),
            }
        });

        let experiment_id = args.str_or("experimentId", "");
        if !experiment_id.is_empty() {
            request["experimentIDs"] = json!([experiment_id]);
        }

        let status = args.str_or("status", "");
        if !status.is_empty() {
            request["filter"] = json!({"experimentStatus": status});
        }

        let mut variables = Variables::new();
        variables.insert("request".to_string(), request);
        variables
    }
}

#[async_trait::async_trait]
impl Tool for ListExperimentRunsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_experiment_runs".to_string(),
            description: "List experiment runs with detailed execution history".to_string(),
            input_schema: json_schema_object(
                json!({
                    "experimentId": json_schema_string("Filter by specific experiment"),
                    "status": json_schema_enum(RUN_STATUSES, "Filter by run status"),
                    "limit": json_schema_number("Number of runs to return", 1, Some(50))
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let data = self
            .executor
            .execute(LIST_RUNS_QUERY, Some(Self::request_variables(&arguments)))
            .await?;

        let listing = root_object(&data, "listExperimentRun")?;
        let runs: Vec<Value> = list(listing, "experimentRuns")
            .iter()
            .map(run_summary)
            .collect();
        let total = listing.field("totalNoOfExperimentRuns");

        json_result(&json!({
            "summary": format!("Found {} experiment runs", total),
            "totalRuns": total,
            "runs": runs,
        }))
    }
}

fn run_summary(run: &Value) -> Value {
    let infrastructure = match run.get("infra") {
        Some(infra) if infra.is_object() => json!({
            "id": infra.field("infraID"),
            "name": infra.field("name"),
            "environment": infra.field("environmentID"),
            "platform": infra.field("platformName"),
        }),
        _ => json!({}),
    };

    json!({
        "id": run.field("experimentRunID"),
        "experimentId": run.field("experimentID"),
        "experimentName": run.field("experimentName"),
        "status": run.field("phase"),
        "resiliencyScore": run.field("resiliencyScore"),
        "faultsSummary": {
            "passed": run.field("faultsPassed"),
            "failed": run.field("faultsFailed"),
            "awaited": run.field("faultsAwaited"),
            "stopped": run.field("faultsStopped"),
            "total": run.field("totalFaults"),
        },
        "infrastructure": infrastructure,
        "sequence": run.field("runSequence"),
        "createdBy": run.nested_str(&["createdBy", "username"]),
        "createdAt": run.field("createdAt"),
        "updatedAt": run.field("updatedAt"),
    })
}

/// Tool to inspect one experiment run
pub struct GetExperimentRunDetailsTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl GetExperimentRunDetailsTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for GetExperimentRunDetailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_experiment_run_details".to_string(),
            description: "Get detailed information about a specific experiment run".to_string(),
            input_schema: json_schema_object(
                json!({
                    "experimentRunId": json_schema_string("Experiment run ID"),
                    "includeLogs": json_schema_boolean("Include execution logs")
                }),
                vec!["experimentRunId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let run_id = require(&arguments, "experimentRunId")?;

        let mut variables = Variables::new();
        variables.insert("experimentRunID".to_string(), json!(run_id));

        let data = self.executor.execute(GET_RUN_QUERY, Some(variables)).await?;
        let run = root_object(&data, "getExperimentRun")?;

        let infrastructure = match run.get("infra") {
            Some(infra) if infra.is_object() => json!({
                "id": infra.field("infraID"),
                "name": infra.field("name"),
                "environment": infra.field("environmentID"),
                "platform": infra.field("platformName"),
                "version": infra.field("version"),
            }),
            _ => json!({}),
        };

        let execution_data = if arguments.bool_or("includeLogs", false) {
            execution_data(run)
        } else {
            Value::Null
        };

        json_result(&json!({
            "run": {
                "id": run.field("experimentRunID"),
                "experimentId": run.field("experimentID"),
                "experimentName": run.field("experimentName"),
                "status": run.field("phase"),
                "resiliencyScore": run.field("resiliencyScore"),
                "faultsSummary": {
                    "passed": run.field("faultsPassed"),
                    "failed": run.field("faultsFailed"),
                    "awaited": run.field("faultsAwaited"),
                    "stopped": run.field("faultsStopped"),
                    "notApplicable": run.field("faultsNa"),
                    "total": run.field("totalFaults"),
                },
                "infrastructure": infrastructure,
                "executionData": execution_data,
                "sequence": run.field("runSequence"),
                "createdBy": run.nested_str(&["createdBy", "username"]),
                "updatedBy": run.nested_str(&["updatedBy", "username"]),
                "createdAt": run.field("createdAt"),
                "updatedAt": run.field("updatedAt"),
            }
        }))
    }
}

/// Decode the run's embedded execution document; anything unparseable is `null`.
fn execution_data(run: &Value) -> Value {
    let raw = run.str_or("executionData", "");
    if raw.is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("Discarding unparseable execution data: {}", e);
            Value::Null
        }
    }
}
