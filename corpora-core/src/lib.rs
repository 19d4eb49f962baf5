//! Shared types, error taxonomy, and cross-cutting traits for the corpora
//! multi-tenant RAG backend. Every other crate in the workspace depends on
//! this one; it depends on nothing internal.

pub mod document;
pub mod error;
pub mod metrics;
pub mod tenant;
pub mod usage;

pub use document::{Document, DocType, DocumentJobStage, DocumentStatus, JobProgress, UrlJobStage};
pub use error::{CoreError, Result};
pub use metrics::{Metrics, MetricsSnapshot};
pub use tenant::{DocumentId, TenantId, TenantScoped};
pub use usage::{UsageMetric, UsageMetricType};
