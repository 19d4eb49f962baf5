//! Storage types
//!
//! Types for persistent storage including workflow state, session data,
//! and artifact storage structures.

pub mod artifact;
pub mod session;
pub mod workflow;

// Re-export artifact types
pub use artifact::{Artifact, ArtifactId, ArtifactType, ContentHash, SessionStorageStats};

// Re-export session types
pub use session::{SessionData, SessionStatus};

// Re-export workflow types
pub use workflow::{WorkflowState, WorkflowStatus};
