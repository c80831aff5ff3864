//! # Litmus SDK
//!
//! GraphQL client for the LitmusChaos Chaos Center.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use litmus_sdk::{GraphQlExecutor, LitmusClient, LitmusResult, Variables};
//!
//! #[tokio::main]
//! async fn main() -> LitmusResult<()> {
//!     let client = LitmusClient::builder()
//!         .endpoint("http://localhost:8080")
//!         .project_id("my-project")
//!         .access_token("my-token")
//!         .build()?;
//!
//!     // `projectID` is injected automatically
//!     let mut variables = Variables::new();
//!     variables.insert("experimentID".into(), "exp-1".into());
//!
//!     let data = client
//!         .execute(
//!             "mutation RunChaosExperiment($experimentID: String!, $projectID: ID!) {
//!                 runChaosExperiment(experimentID: $experimentID, projectID: $projectID) { notifyID }
//!             }",
//!             Some(variables),
//!         )
//!         .await?;
//!     println!("{}", data["runChaosExperiment"]["notifyID"]);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod transport;

pub use client::{LitmusClient, LitmusClientBuilder};
pub use config::ClientConfig;
pub use error::{LitmusError, LitmusResult};
pub use graphql::{GraphQlExecutor, GraphQlRequest, GraphQlResponse, Variables};
