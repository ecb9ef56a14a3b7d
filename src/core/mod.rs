pub mod client;
pub mod normalize;
pub mod role;
pub mod session;
pub mod workflow;

pub use crate::domain::model::{
    Capabilities, OpportunitySet, ResolvedRole, ResumeDocument, Roadmap, RoleSource, StoreKey,
};
pub use crate::domain::ports::{AnalysisService, ConfigProvider, SessionStore};
pub use crate::utils::error::Result;
