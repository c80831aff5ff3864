// Experiment tools: list, inspect, run and stop chaos experiments

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_result, json_schema_boolean, json_schema_number, json_schema_object, json_schema_string,
    list, require, root_object, Tool,
};
use crate::value::ValueExt;
use anyhow::Result;
use litmus_sdk::{GraphQlExecutor, Variables};
use serde_json::{json, Value};
use std::sync::Arc;

/// Page requested when the caller names none
pub const DEFAULT_PAGE: i64 = 0;
/// Page size requested when the caller names none
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

const LIST_EXPERIMENTS_QUERY: &str = r#"
query ListExperiment($projectID: ID!, $request: ListExperimentRequest!) {
    listExperiment(projectID: $projectID, request: $request) {
        totalNoOfExperiments
        experiments {
            projectID
            experimentID
            name
            description
            experimentType
            cronSyntax
            isCustomExperiment
            tags
            updatedAt
            createdAt
            infra {
                infraID
                name
                environmentID
                isActive
                isInfraConfirmed
                platformName
            }
            recentExperimentRunDetails {
                experimentRunID
                phase
                resiliencyScore
                updatedAt
                runSequence
            }
            createdBy {
                username
                email
            }
        }
    }
}
"#;

const GET_EXPERIMENT_QUERY: &str = r#"
query GetExperiment($projectID: ID!, $experimentID: String!) {
    getExperiment(projectID: $projectID, experimentID: $experimentID) {
        experimentDetails {
            projectID
            experimentID
            name
            description
            experimentManifest
            experimentType
            cronSyntax
            isCustomExperiment
            weightages {
                faultName
                weightage
            }
            tags
            infra {
                infraID
                name
                description
                environmentID
                platformName
                isActive
                infraScope
                version
                noOfExperiments
                noOfExperimentRuns
            }
            createdBy {
                username
                email
            }
            updatedBy {
                username
                email
            }
            createdAt
            updatedAt
        }
        averageResiliencyScore
    }
}
"#;

const RUN_EXPERIMENT_MUTATION: &str = r#"
mutation RunChaosExperiment($experimentID: String!, $projectID: ID!) {
    runChaosExperiment(experimentID: $experimentID, projectID: $projectID) {
        notifyID
    }
}
"#;

const STOP_EXPERIMENT_MUTATION: &str = r#"
mutation StopExperimentRuns(
    $projectID: ID!,
    $experimentID: String!,
    $experimentRunID: String,
    $notifyID: String
) {
    stopExperimentRuns(
        projectID: $projectID,
        experimentID: $experimentID,
        experimentRunID: $experimentRunID,
        notifyID: $notifyID
    )
}
"#;

/// Tool to list chaos experiments
pub struct ListChaosExperimentsTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl ListChaosExperimentsTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }

    fn request_variables(args: &Value) -> Variables {
        let pagination = args.field("pagination");
        let mut request = json!({
            "pagination": {
                "page": pagination.int_or("page", DEFAULT_PAGE),
                "limit": pagination.int_or("limit", DEFAULT_PAGE_LIMIT),
            }
        });
        if let Some(filter) = args.object("filter") {
            request["filter"] = Value::Object(filter.clone());
        }

        let mut variables = Variables::new();
        variables.insert("request".to_string(), request);
        variables
    }
}

#[async_trait::async_trait]
impl Tool for ListChaosExperimentsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_chaos_experiments".to_string(),
            description: "List all chaos experiments with optional filtering".to_string(),
            input_schema: json_schema_object(
                json!({
                    "filter": {
                        "type": "object",
                        "properties": {
                            "experimentName": json_schema_string("Filter by experiment name"),
                            "infraName": json_schema_string("Filter by infrastructure name"),
                            "infraId": json_schema_string("Filter by infrastructure ID"),
                            "status": json_schema_string("Filter by experiment status")
                        }
                    },
                    "pagination": {
                        "type": "object",
                        "properties": {
                            "page": json_schema_number("", 0, None),
                            "limit": json_schema_number("", 1, Some(100))
                        }
                    }
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let data = self
            .executor
            .execute(LIST_EXPERIMENTS_QUERY, Some(Self::request_variables(&arguments)))
            .await?;

        let listing = root_object(&data, "listExperiment")?;
        let experiments: Vec<Value> = list(listing, "experiments")
            .iter()
            .map(experiment_summary)
            .collect();
        let total = listing.field("totalNoOfExperiments");

        json_result(&json!({
            "summary": format!("Found {} chaos experiments", total),
            "totalExperiments": total,
            "experiments": experiments,
        }))
    }
}

fn experiment_summary(experiment: &Value) -> Value {
    let infrastructure = match experiment.get("infra") {
        Some(infra) if infra.is_object() => json!({
            "id": infra.field("infraID"),
            "name": infra.field("name"),
            "environment": infra.field("environmentID"),
            "active": infra.field("isActive"),
            "confirmed": infra.field("isInfraConfirmed"),
            "platform": infra.field("platformName"),
        }),
        _ => Value::Null,
    };

    let recent_run = match list(experiment, "recentExperimentRunDetails").first() {
        Some(run) => json!({
            "id": run.field("experimentRunID"),
            "status": run.field("phase"),
            "resiliencyScore": run.field("resiliencyScore"),
            "lastRun": run.field("updatedAt"),
            "sequence": run.field("runSequence"),
        }),
        None => Value::Null,
    };

    json!({
        "id": experiment.field("experimentID"),
        "name": experiment.field("name"),
        "description": experiment.field("description"),
        "type": experiment.field("experimentType"),
        "isCustom": experiment.field("isCustomExperiment"),
        "schedule": experiment.field("cronSyntax"),
        "tags": experiment.field("tags"),
        "infrastructure": infrastructure,
        "recentRun": recent_run,
        "createdBy": experiment.nested_str(&["createdBy", "username"]),
        "createdAt": experiment.field("createdAt"),
        "updatedAt": experiment.field("updatedAt"),
    })
}

/// Tool to get a single chaos experiment
pub struct GetChaosExperimentTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl GetChaosExperimentTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for GetChaosExperimentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_chaos_experiment".to_string(),
            description: "Get detailed information about a specific chaos experiment".to_string(),
            input_schema: json_schema_object(
                json!({
                    "experimentId": json_schema_string("Unique experiment identifier"),
                    "includeRuns": json_schema_boolean("Include recent experiment runs")
                }),
                vec!["experimentId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let experiment_id = require(&arguments, "experimentId")?;

        let mut variables = Variables::new();
        variables.insert("experimentID".to_string(), json!(experiment_id));

        let data = self
            .executor
            .execute(GET_EXPERIMENT_QUERY, Some(variables))
            .await?;

        let outer = root_object(&data, "getExperiment")?;
        let exp = root_object(outer, "experimentDetails")?;

        let faults = exp.array("weightages").map(|weightages| {
            weightages
                .iter()
                .map(|w| json!({"name": w.field("faultName"), "weight": w.field("weightage")}))
                .collect::<Vec<_>>()
        });

        let infrastructure = match exp.get("infra") {
            Some(infra) if infra.is_object() => json!({
                "id": infra.field("infraID"),
                "name": infra.field("name"),
                "description": infra.field("description"),
                "environment": infra.field("environmentID"),
                "platform": infra.field("platformName"),
                "active": infra.field("isActive"),
                "scope": infra.field("infraScope"),
                "version": infra.field("version"),
                "totalExperiments": infra.field("noOfExperiments"),
                "totalRuns": infra.field("noOfExperimentRuns"),
            }),
            _ => json!({}),
        };

        json_result(&json!({
            "experiment": {
                "id": exp.field("experimentID"),
                "name": exp.field("name"),
                "description": exp.field("description"),
                "type": exp.field("experimentType"),
                "isCustom": exp.field("isCustomExperiment"),
                "schedule": exp.field("cronSyntax"),
                "manifest": exp.field("experimentManifest"),
                "averageResiliencyScore": outer.field("averageResiliencyScore"),
                "faults": faults,
                "tags": exp.field("tags"),
                "infrastructure": infrastructure,
                "createdBy": exp.nested_str(&["createdBy", "username"]),
                "updatedBy": exp.nested_str(&["updatedBy", "username"]),
                "createdAt": exp.field("createdAt"),
                "updatedAt": exp.field("updatedAt"),
            }
        }))
    }
}

/// Tool to start a chaos experiment run
pub struct RunChaosExperimentTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl RunChaosExperimentTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for RunChaosExperimentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "run_chaos_experiment".to_string(),
            description: "Execute a chaos experiment immediately".to_string(),
            input_schema: json_schema_object(
                json!({
                    "experimentId": json_schema_string("Experiment ID to run")
                }),
                vec!["experimentId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let experiment_id = require(&arguments, "experimentId")?;

        let mut variables = Variables::new();
        variables.insert("experimentID".to_string(), json!(experiment_id));

        let data = self
            .executor
            .execute(RUN_EXPERIMENT_MUTATION, Some(variables))
            .await?;
        let run = root_object(&data, "runChaosExperiment")?;

        json_result(&json!({
            "success": true,
            "message": "Chaos experiment started successfully",
            "notifyId": run.field("notifyID"),
            "experimentId": experiment_id,
        }))
    }
}

/// Tool to stop running chaos experiments
pub struct StopChaosExperimentTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl StopChaosExperimentTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for StopChaosExperimentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "stop_chaos_experiment".to_string(),
            description: "Stop a running chaos experiment".to_string(),
            input_schema: json_schema_object(
                json!({
                    "experimentId": json_schema_string("Experiment ID to stop"),
                    "experimentRunId": json_schema_string("Specific run ID to stop (optional)")
                }),
                vec!["experimentId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let experiment_id = require(&arguments, "experimentId")?;
        let run_id = arguments.str_or("experimentRunId", "");

        let mut variables = Variables::new();
        variables.insert("experimentID".to_string(), json!(experiment_id));
        if !run_id.is_empty() {
            variables.insert("experimentRunID".to_string(), json!(run_id));
        }

        let data = self
            .executor
            .execute(STOP_EXPERIMENT_MUTATION, Some(variables))
            .await?;

        let success = data
            .get("stopExperimentRuns")
            .and_then(Value::as_bool)
            .ok_or_else(|| crate::tools::ToolError::UnexpectedResponse("stopExperimentRuns".into()))?;
        let message = if success {
            "Chaos experiment stopped successfully"
        } else {
            "Failed to stop chaos experiment"
        };

        json_result(&json!({
            "success": success,
            "message": message,
            "experimentId": experiment_id,
            "experimentRunId": run_id,
        }))
    }
}
