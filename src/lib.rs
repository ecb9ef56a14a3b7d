pub mod app;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::FileSessionStore, CliConfig, Settings};

pub use core::{
    client::HttpAnalysisClient,
    session::MemorySessionStore,
    workflow::{IntakeRequest, Orchestrator, RoadmapView, WorkflowStage},
};
pub use utils::error::{PathplanError, Result};
