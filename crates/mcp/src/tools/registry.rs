// Tool trait and the name -> tool dispatch table

use crate::protocol::{CallToolResult, ToolSchema};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult>;
}

/// Tool registry for managing available tools
///
/// Tools are listed in registration order. Registering a name twice
/// replaces the earlier tool in place.
pub struct ToolRegistry {
    tools: Vec<(ToolSchema, Arc<dyn Tool>)>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        match self.index.get(&schema.name) {
            Some(&slot) => self.tools[slot] = (schema, tool),
            None => {
                self.index.insert(schema.name.clone(), self.tools.len());
                self.tools.push((schema, tool));
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| self.tools[slot].1.clone())
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|(schema, _)| schema.clone()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    let mut schema = serde_json::json!({
        "type": "object",
        "properties": properties
    });
    if !required.is_empty() {
        schema["required"] = serde_json::json!(required);
    }
    schema
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_enum(values: &[&str], description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": values,
        "description": description
    })
}

pub fn json_schema_number(description: &str, minimum: i64, maximum: Option<i64>) -> serde_json::Value {
    let mut schema = serde_json::json!({
        "type": "number",
        "minimum": minimum
    });
    if !description.is_empty() {
        schema["description"] = serde_json::json!(description);
    }
    if let Some(maximum) = maximum {
        schema["maximum"] = serde_json::json!(maximum);
    }
    schema
}

pub fn json_schema_boolean(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_string_array(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": {"type": "string"},
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolContent;

    struct NamedTool {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait::async_trait]
    impl Tool for NamedTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name.to_string(),
                description: format!("{} tool", self.name),
                input_schema: json_schema_object(serde_json::json!({}), vec![]),
            }
        }

        async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
            Ok(CallToolResult::text(self.reply))
        }
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(Arc::new(NamedTool { name, reply: "" }));
        }

        let names: Vec<_> = registry.list_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("alpha"));
        assert!(!registry.contains("omega"));
    }

    #[tokio::test]
    async fn test_reregistering_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool { name: "a", reply: "first" }));
        registry.register(Arc::new(NamedTool { name: "b", reply: "b" }));
        registry.register(Arc::new(NamedTool { name: "a", reply: "second" }));

        assert_eq!(registry.len(), 2);
        let result = registry.get("a").unwrap().execute(serde_json::Value::Null).await.unwrap();
        assert_eq!(result.content, vec![ToolContent::text("second")]);
        assert_eq!(registry.list_schemas()[0].name, "a");
    }

    #[test]
    fn test_schema_helpers() {
        let schema = json_schema_object(
            serde_json::json!({"limit": json_schema_number("Page size", 1, Some(100))}),
            vec!["limit"],
        );
        assert_eq!(schema["required"], serde_json::json!(["limit"]));
        assert_eq!(schema["properties"]["limit"]["maximum"], 100);

        let open = json_schema_object(serde_json::json!({}), vec![]);
        assert!(open.get("required").is_none());
    }
}
