// Project-wide statistics, folded from three independent queries

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_result, json_schema_boolean, json_schema_object, root_object, Tool};
use crate::value::ValueExt;
use anyhow::Result;
use litmus_sdk::GraphQlExecutor;
use serde_json::{json, Value};
use std::sync::Arc;

const EXPERIMENT_STATS_QUERY: &str = r#"
query GetExperimentStats($projectID: ID!) {
    getExperimentStats(projectID: $projectID) {
        totalExperiments
        totalExpCategorizedByResiliencyScore {
            id
            count
        }
    }
}
"#;

const RUN_STATS_QUERY: &str = r#"
query GetExperimentRunStats($projectID: ID!) {
    getExperimentRunStats(projectID: $projectID) {
        totalExperimentRuns
        totalCompletedExperimentRuns
        totalTerminatedExperimentRuns
        totalRunningExperimentRuns
        totalStoppedExperimentRuns
        totalErroredExperimentRuns
    }
}
"#;

const INFRA_STATS_QUERY: &str = r#"
query GetInfraStats($projectID: ID!) {
    getInfraStats(projectID: $projectID) {
        totalInfrastructures
        totalActiveInfrastructure
        totalInactiveInfrastructures
        totalConfirmedInfrastructure
        totalNonConfirmedInfrastructures
    }
}
"#;

/// Tool to summarize experiments, runs and infrastructures
///
/// The three queries run concurrently; the first failure fails the tool.
pub struct GetExperimentStatisticsTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl GetExperimentStatisticsTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for GetExperimentStatisticsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_experiment_statistics".to_string(),
            description: "Get comprehensive experiment and infrastructure statistics".to_string(),
            input_schema: json_schema_object(
                json!({
                    "includeResiliencyScores": json_schema_boolean("Include resiliency score distribution")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        let (experiments, runs, infras) = tokio::try_join!(
            self.executor.execute(EXPERIMENT_STATS_QUERY, None),
            self.executor.execute(RUN_STATS_QUERY, None),
            self.executor.execute(INFRA_STATS_QUERY, None),
        )?;

        let exp = root_object(&experiments, "getExperimentStats")?;
        let run = root_object(&runs, "getExperimentRunStats")?;
        let infra = root_object(&infras, "getInfraStats")?;

        json_result(&json!({
            "overview": {
                "totalExperiments": exp.field("totalExperiments"),
                "totalExperimentRuns": run.field("totalExperimentRuns"),
                "totalInfrastructures": infra.field("totalInfrastructures"),
            },
            "experimentStatistics": {
                "total": exp.field("totalExperiments"),
                "resiliencyScoreDistribution": exp.field("totalExpCategorizedByResiliencyScore"),
            },
            "experimentRunStatistics": {
                "total": run.field("totalExperimentRuns"),
                "completed": run.field("totalCompletedExperimentRuns"),
                "terminated": run.field("totalTerminatedExperimentRuns"),
                "running": run.field("totalRunningExperimentRuns"),
                "stopped": run.field("totalStoppedExperimentRuns"),
                "errored": run.field("totalErroredExperimentRuns"),
            },
            "infrastructureStatistics": {
                "total": infra.field("totalInfrastructures"),
                "active": infra.field("totalActiveInfrastructure"),
                "inactive": infra.field("totalInactiveInfrastructures"),
                "confirmed": infra.field("totalConfirmedInfrastructure"),
                "unconfirmed": infra.field("totalNonConfirmedInfrastructures"),
            },
        }))
    }
}
