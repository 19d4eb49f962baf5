//! Job payload shapes for the two ingestion job kinds (spec §3 `Job`, §9
//! "Document-job variants"). The variant itself lives in
//! [`corpora_jobs::JobKind`]; these are the `payload` field each variant
//! carries.

use corpora_core::{DocumentId, TenantId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPayload {
    pub tenant_id: TenantId,
    pub document_id: DocumentId,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlPayload {
    pub tenant_id: TenantId,
    pub document_id: DocumentId,
    pub url: String,
}
