//! Document-shaped types shared between the catalog, orchestrator, and API
//! edge (spec §3 "Document").

use crate::tenant::{DocumentId, TenantId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Pdf,
    Txt,
    Html,
    Md,
}

impl DocType {
    /// Detect a document type from a filename extension (spec §4.5).
    /// Returns `None` when the extension is unknown, which must reject the
    /// upload before it is ever enqueued.
    #[must_use]
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = name.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "htm" | "html" => Some(Self::Html),
            "txt" => Some(Self::Txt),
            "md" | "markdown" => Some(Self::Md),
            _ => None,
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Html => "html",
            Self::Md => "md",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    /// Terminal states are monotonic within an attempt (spec §5 Ordering).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Catalog-facing document record (spec §3 Document).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub tenant_id: TenantId,
    pub title: String,
    pub doc_type: DocType,
    pub source_url: Option<String>,
    pub blob_key: Option<String>,
    pub content_hash: Option<String>,
    pub size_bytes: i64,
    pub status: DocumentStatus,
    pub chunk_count: i32,
    pub character_count: i32,
    pub page_count: Option<i32>,
    pub embedding_tokens_used: i64,
    pub embedding_cost_usd: f64,
    pub processing_time_ms: Option<i64>,
    pub error_message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Progress stages for a `process_document` job (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentJobStage {
    Downloading,
    Parsing,
    Embedding,
    Storing,
    Finalizing,
    Completed,
}

/// Progress stages for a `scrape_url` job (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlJobStage {
    Fetching,
    Parsing,
    Embedding,
    Storing,
    Finalizing,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProgress {
    pub stage: String,
    pub percent: u8,
}

impl JobProgress {
    #[must_use]
    pub fn document(stage: DocumentJobStage) -> Self {
        let percent = match stage {
            DocumentJobStage::Downloading => 10,
            DocumentJobStage::Parsing => 30,
            DocumentJobStage::Embedding => 60,
            DocumentJobStage::Storing => 85,
            DocumentJobStage::Finalizing => 95,
            DocumentJobStage::Completed => 100,
        };
        Self {
            stage: serde_json::to_value(stage)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            percent,
        }
    }

    #[must_use]
    pub fn url(stage: UrlJobStage) -> Self {
        let percent = match stage {
            UrlJobStage::Fetching => 10,
            UrlJobStage::Parsing => 30,
            UrlJobStage::Embedding => 60,
            UrlJobStage::Storing => 85,
            UrlJobStage::Finalizing => 95,
            UrlJobStage::Completed => 100,
        };
        Self {
            stage: serde_json::to_value(stage)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_type_from_filename() {
        assert_eq!(DocType::from_filename("report.PDF"), Some(DocType::Pdf));
        assert_eq!(DocType::from_filename("notes.md"), Some(DocType::Md));
        assert_eq!(DocType::from_filename("notes.markdown"), Some(DocType::Md));
        assert_eq!(DocType::from_filename("page.html"), Some(DocType::Html));
        assert_eq!(DocType::from_filename("archive.zip"), None);
        assert_eq!(DocType::from_filename("noext"), None);
    }

    #[test]
    fn terminal_states() {
        assert!(DocumentStatus::Completed.is_terminal());
        assert!(DocumentStatus::Failed.is_terminal());
        assert!(!DocumentStatus::Processing.is_terminal());
    }
}
