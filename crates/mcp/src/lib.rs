// MCP (Model Context Protocol) server for the LitmusChaos Chaos Center
// Exposes chaos engineering operations as tools to agent clients

pub mod config;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod value;

pub use config::{ServerConfig, ToolDefaults};
pub use server::McpServer;
