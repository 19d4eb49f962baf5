use corpora_core::{DocumentId, TenantId};
use sha2::{Digest, Sha256};

/// Replace every byte outside `[A-Za-z0-9._-]` with `_` so a filename can
/// never escape its tenant/document prefix or collide with S3 delimiters.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the tenant-prefixed storage key for a document's source blob.
#[must_use]
pub fn blob_key(tenant_id: TenantId, document_id: DocumentId, filename: &str) -> String {
    format!(
        "{tenant_id}/documents/{document_id}/{}",
        sanitize_filename(filename)
    )
}

#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_unsafe_characters() {
        assert_eq!(sanitize_filename("a b/c?.pdf"), "a_b_c_.pdf");
    }

    #[test]
    fn leaves_safe_characters_untouched() {
        assert_eq!(sanitize_filename("report-v1.2_final.pdf"), "report-v1.2_final.pdf");
    }

    #[test]
    fn key_has_tenant_and_document_prefix() {
        let t = TenantId::new();
        let d = DocumentId::new();
        let key = blob_key(t, d, "report.pdf");
        assert_eq!(key, format!("{t}/documents/{d}/report.pdf"));
    }

    #[test]
    fn content_hash_is_deterministic() {
        assert_eq!(content_hash(b"hello"), content_hash(b"hello"));
        assert_ne!(content_hash(b"hello"), content_hash(b"world"));
    }
}
