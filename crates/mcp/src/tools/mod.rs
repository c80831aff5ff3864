//! Chaos Center tools.
//!
//! Every tool follows the same shape: read and validate arguments with
//! [`ValueExt`], send one GraphQL operation built from a static document,
//! then rename and re-nest the payload into a stable output document
//! returned as a single pretty-printed text item.

pub mod environments;
pub mod experiments;
pub mod hubs;
pub mod infrastructure;
pub mod probes;
mod registry;
pub mod runs;
pub mod statistics;

pub use environments::{CreateEnvironmentTool, ListEnvironmentsTool};
pub use experiments::{
    GetChaosExperimentTool, ListChaosExperimentsTool, RunChaosExperimentTool,
    StopChaosExperimentTool,
};
pub use hubs::{GetChaosFaultsTool, ListChaosHubsTool};
pub use infrastructure::{
    GetInfrastructureDetailsTool, ListChaosInfrastructuresTool, RegisterChaosInfrastructureTool,
};
pub use probes::{CreateResilienceProbeTool, ListResilienceProbesTool};
pub use registry::{
    json_schema_boolean, json_schema_enum, json_schema_number, json_schema_object,
    json_schema_string, json_schema_string_array, Tool, ToolRegistry,
};
pub use runs::{GetExperimentRunDetailsTool, ListExperimentRunsTool};
pub use statistics::GetExperimentStatisticsTool;

use crate::config::ToolDefaults;
use crate::protocol::CallToolResult;
use crate::value::ValueExt;
use litmus_sdk::GraphQlExecutor;
use serde_json::Value;
use std::sync::Arc;

/// Failures raised by the tools themselves, as opposed to the remote side.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0} is required")]
    MissingArgument(&'static str),

    /// A required plural argument, such as a property set
    #[error("{0} are required")]
    MissingArguments(&'static str),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Build the registry of every Chaos Center tool, in listing order.
pub fn litmus_tools(executor: Arc<dyn GraphQlExecutor>, defaults: &ToolDefaults) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Experiments
    registry.register(Arc::new(ListChaosExperimentsTool::new(executor.clone())));
    registry.register(Arc::new(GetChaosExperimentTool::new(executor.clone())));
    registry.register(Arc::new(RunChaosExperimentTool::new(executor.clone())));
    registry.register(Arc::new(StopChaosExperimentTool::new(executor.clone())));

    // Runs
    registry.register(Arc::new(ListExperimentRunsTool::new(executor.clone())));
    registry.register(Arc::new(GetExperimentRunDetailsTool::new(executor.clone())));

    // Infrastructure and environments
    registry.register(Arc::new(ListChaosInfrastructuresTool::new(executor.clone())));
    registry.register(Arc::new(GetInfrastructureDetailsTool::new(
        executor.clone(),
        defaults.infra_id.clone(),
    )));
    registry.register(Arc::new(ListEnvironmentsTool::new(executor.clone())));
    registry.register(Arc::new(CreateEnvironmentTool::new(executor.clone())));

    // Probes
    registry.register(Arc::new(ListResilienceProbesTool::new(executor.clone())));
    registry.register(Arc::new(CreateResilienceProbeTool::new(executor.clone())));

    // ChaosHub
    registry.register(Arc::new(ListChaosHubsTool::new(executor.clone())));
    registry.register(Arc::new(GetChaosFaultsTool::new(executor.clone())));

    registry.register(Arc::new(GetExperimentStatisticsTool::new(executor.clone())));
    registry.register(Arc::new(RegisterChaosInfrastructureTool::new(
        executor,
        defaults.environment_id.clone(),
    )));

    registry
}

/// Non-empty string argument, or a `MissingArgument` error.
pub(crate) fn require(args: &Value, key: &'static str) -> Result<String, ToolError> {
    required_or(args, key, "")
}

/// Like [`require`], with a fallback used when the argument is absent.
pub(crate) fn required_or(args: &Value, key: &'static str, fallback: &str) -> Result<String, ToolError> {
    let value = args.str_or(key, fallback);
    if value.is_empty() {
        return Err(ToolError::MissingArgument(key));
    }
    Ok(value)
}

/// Object stored under the operation's root field.
pub(crate) fn root_object<'a>(data: &'a Value, field: &str) -> Result<&'a Value, ToolError> {
    data.get(field)
        .filter(|v| v.is_object())
        .ok_or_else(|| ToolError::UnexpectedResponse(field.to_string()))
}

/// Array stored under the operation's root field.
pub(crate) fn root_array<'a>(data: &'a Value, field: &str) -> Result<&'a [Value], ToolError> {
    data.get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ToolError::UnexpectedResponse(field.to_string()))
}

/// Nested list that may come back as `null`.
pub(crate) fn list<'a>(obj: &'a Value, key: &str) -> &'a [Value] {
    obj.array(key).map(Vec::as_slice).unwrap_or_default()
}

/// Render the output document as the tool's single text item.
pub(crate) fn json_result(document: &Value) -> anyhow::Result<CallToolResult> {
    Ok(CallToolResult::text(serde_json::to_string_pretty(document)?))
}

/// Lowercase, with spaces replaced by dashes.
pub(crate) fn slugify(name: &str) -> String {
    name.replace(' ', "-").to_lowercase()
}
