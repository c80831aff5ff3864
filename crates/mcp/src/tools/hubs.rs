// ChaosHub tools: hub listing and the fault catalogue of one hub

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_result, json_schema_enum, json_schema_object, json_schema_string, require, root_array,
    Tool,
};
use crate::value::ValueExt;
use anyhow::Result;
use litmus_sdk::{GraphQlExecutor, Variables};
use serde_json::{json, Value};
use std::sync::Arc;

const LIST_HUBS_QUERY: &str = r#"
query ListChaosHub($projectID: ID!, $request: ListChaosHubRequest) {
    listChaosHub(projectID: $projectID, request: $request) {
        id
        name
        description
        repoURL
        repoBranch
        remoteHub
        hubType
        isPrivate
        isAvailable
        totalFaults
        totalExperiments
        tags
        lastSyncedAt
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
"#;

const LIST_FAULTS_QUERY: &str = r#"
query ListChaosFaults($hubID: ID!, $projectID: ID!) {
    listChaosFaults(hubID: $hubID, projectID: $projectID) {
        apiVersion
        kind
        metadata {
            name
            version
            annotations {
                categories
                vendor
                repository
            }
        }
        spec {
            displayName
            categoryDescription
            keywords
            maturity
            platforms
            chaosType
            faults {
                name
                displayName
                description
            }
        }
    }
}
"#;

/// Tool to list ChaosHubs
pub struct ListChaosHubsTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl ListChaosHubsTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait::async_trait]
impl Tool for ListChaosHubsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_chaos_hubs".to_string(),
            description: "List all ChaosHubs (experiment repositories)".to_string(),
            input_schema: json_schema_object(
                json!({
                    "hubType": json_schema_enum(&["GIT", "REMOTE"], "Filter by hub type")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let mut variables = Variables::new();
        let hub_type = arguments.str_or("hubType", "");
        if !hub_type.is_empty() {
            variables.insert("request".to_string(), json!({"filter": {"hubType": hub_type}}));
        }

        let data = self.executor.execute(LIST_HUBS_QUERY, Some(variables)).await?;

        let hubs: Vec<Value> = root_array(&data, "listChaosHub")?
            .iter()
            .map(|hub| {
                json!({
                    "id": hub.field("id"),
                    "name": hub.field("name"),
                    "description": hub.field("description"),
                    "repoUrl": hub.field("repoURL"),
                    "branch": hub.field("repoBranch"),
                    "remoteHub": hub.field("remoteHub"),
                    "type": hub.field("hubType"),
                    "private": hub.field("isPrivate"),
                    "available": hub.field("isAvailable"),
                    "statistics": {
                        "totalFaults": hub.field("totalFaults"),
                        "totalExperiments": hub.field("totalExperiments"),
                    },
                    "tags": hub.field("tags"),
                    "lastSynced": hub.field("lastSyncedAt"),
                    "createdBy": hub.nested_str(&["createdBy", "username"]),
                    "updatedBy": hub.nested_str(&["updatedBy", "username"]),
                    "createdAt": hub.field("createdAt"),
                    "updatedAt": hub.field("updatedAt"),
                })
            })
            .collect();

        json_result(&json!({
            "summary": format!("Found {} chaos hubs", hubs.len()),
            "totalHubs": hubs.len(),
            "hubs": hubs,
        }))
    }
}

/// Tool to browse the fault catalogue of a ChaosHub
///
/// `category` keeps fault categories whose name contains it, ignoring case.
pub struct GetChaosFaultsTool {
    executor: Arc<dyn GraphQlExecutor>,
}

impl GetChaosFaultsTool {
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }
}

fn fault_category(entry: &Value) -> Value {
    let metadata = entry.field("metadata");
    let spec = entry.field("spec");

    let faults = spec.array("faults").map(|faults| {
        faults
            .iter()
            .map(|fault| {
                json!({
                    "name": fault.field("name"),
                    "displayName": fault.field("displayName"),
                    "description": fault.field("description"),
                })
            })
            .collect::<Vec<_>>()
    });

    let mut category = json!({
        "name": metadata.str_or("name", ""),
        "displayName": spec.field("displayName"),
        "description": spec.field("categoryDescription"),
        "version": metadata.field("version"),
        "keywords": spec.field("keywords"),
        "maturity": spec.field("maturity"),
        "platforms": spec.field("platforms"),
        "chaosType": spec.field("chaosType"),
        "faults": faults,
    });

    if let Some(annotations) = metadata.get("annotations").filter(|a| a.is_object()) {
        category["vendor"] = annotations.field("vendor");
        category["repository"] = annotations.field("repository");
    }
    category
}

#[async_trait::async_trait]
impl Tool for GetChaosFaultsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_chaos_faults".to_string(),
            description: "Get available chaos faults from ChaosHub".to_string(),
            input_schema: json_schema_object(
                json!({
                    "hubId": json_schema_string("ChaosHub ID"),
                    "category": json_schema_string("Fault category (e.g., pod, node, network)")
                }),
                vec!["hubId"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let hub_id = require(&arguments, "hubId")?;
        let wanted = arguments.str_or("category", "").to_lowercase();

        let mut variables = Variables::new();
        variables.insert("hubID".to_string(), json!(hub_id));

        let data = self.executor.execute(LIST_FAULTS_QUERY, Some(variables)).await?;

        let categories: Vec<Value> = root_array(&data, "listChaosFaults")?
            .iter()
            .filter(|entry| {
                wanted.is_empty()
                    || entry
                        .nested_str(&["metadata", "name"])
                        .to_lowercase()
                        .contains(&wanted)
            })
            .map(fault_category)
            .collect();

        json_result(&json!({
            "hubId": hub_id,
            "totalFaultCategories": categories.len(),
            "faultCategories": categories,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{document, StubExecutor};

    #[tokio::test]
    async fn test_list_hubs() {
        let stub = Arc::new(StubExecutor::new().respond(
            "listChaosHub",
            json!({"listChaosHub": [{
                "id": "hub-1",
                "name": "Litmus ChaosHub",
                "repoURL": "https://github.com/litmuschaos/chaos-charts",
                "repoBranch": "master",
                "hubType": "GIT",
                "isPrivate": false,
                "totalFaults": "52",
                "totalExperiments": "10",
                "lastSyncedAt": "1700000000"
            }]}),
        ));
        let tool = ListChaosHubsTool::new(stub.clone());

        let doc = document(&tool.execute(json!({"hubType": "GIT"})).await.unwrap());

        assert_eq!(
            stub.variables_for("listChaosHub")["request"],
            json!({"filter": {"hubType": "GIT"}})
        );
        assert_eq!(doc["summary"], "Found 1 chaos hubs");
        let hub = &doc["hubs"][0];
        assert_eq!(hub["repoUrl"], "https://github.com/litmuschaos/chaos-charts");
        assert_eq!(hub["branch"], "master");
        assert_eq!(hub["statistics"], json!({"totalFaults": "52", "totalExperiments": "10"}));
        assert_eq!(hub["lastSynced"], "1700000000");
    }

    #[tokio::test]
    async fn test_list_hubs_without_filter_sends_no_request() {
        let stub = Arc::new(StubExecutor::new().respond("listChaosHub", json!({"listChaosHub": []})));
        let tool = ListChaosHubsTool::new(stub.clone());

        let doc = document(&tool.execute(json!({})).await.unwrap());
        assert!(stub.variables_for("listChaosHub").is_empty());
        assert_eq!(doc["totalHubs"], 0);
    }

    fn catalogue() -> Value {
        json!({"listChaosFaults": [
            {
                "metadata": {
                    "name": "Kubernetes-Pod",
                    "version": "3.16.0",
                    "annotations": {"vendor": "CNCF", "repository": "https://github.com/litmuschaos/chaos-charts"}
                },
                "spec": {
                    "displayName": "Pod chaos",
                    "categoryDescription": "Faults that target pods",
                    "faults": [{"name": "pod-delete", "displayName": "Pod Delete", "description": "Deletes pods"}]
                }
            },
            {
                "metadata": {"name": "node", "annotations": null},
                "spec": {"displayName": "Node chaos", "faults": null}
            }
        ]})
    }

    #[tokio::test]
    async fn test_faults_filtered_by_category_ignoring_case() {
        let stub = Arc::new(StubExecutor::new().respond("listChaosFaults", catalogue()));
        let tool = GetChaosFaultsTool::new(stub.clone());

        let doc = document(
            &tool
                .execute(json!({"hubId": "hub-1", "category": "POD"}))
                .await
                .unwrap(),
        );

        assert_eq!(stub.variables_for("listChaosFaults")["hubID"], "hub-1");
        assert_eq!(doc["hubId"], "hub-1");
        assert_eq!(doc["totalFaultCategories"], 1);

        let category = &doc["faultCategories"][0];
        assert_eq!(category["name"], "Kubernetes-Pod");
        assert_eq!(category["description"], "Faults that target pods");
        assert_eq!(category["vendor"], "CNCF");
        assert_eq!(category["faults"][0]["name"], "pod-delete");
    }

    #[tokio::test]
    async fn test_faults_without_category_keeps_all() {
        let stub = Arc::new(StubExecutor::new().respond("listChaosFaults", catalogue()));
        let tool = GetChaosFaultsTool::new(stub);

        let doc = document(&tool.execute(json!({"hubId": "hub-1"})).await.unwrap());

        assert_eq!(doc["totalFaultCategories"], 2);
        let node = &doc["faultCategories"][1];
        assert_eq!(node["faults"], Value::Null);
        assert!(node.get("vendor").is_none());
    }

    #[tokio::test]
    async fn test_faults_require_hub() {
        let stub = Arc::new(StubExecutor::new());
        let tool = GetChaosFaultsTool::new(stub.clone());

        let err = tool.execute(json!({"category": "pod"})).await.unwrap_err();
        assert_eq!(err.to_string(), "hubId is required");
        assert_eq!(stub.call_count(), 0);
    }
}
