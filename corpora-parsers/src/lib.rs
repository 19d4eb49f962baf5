//! Format-specific text extraction, dispatched by [`corpora_core::DocType`].
//! Every parser normalizes to the same [`ParsedDocument`] shape so the
//! ingestion pipeline never needs to know which format it started from.

pub mod html;
pub mod markdown;
pub mod model;
pub mod pdf;
pub mod text;

pub use model::ParsedDocument;

use corpora_core::{CoreError, DocType};

pub fn parse(doc_type: DocType, bytes: &[u8]) -> Result<ParsedDocument, CoreError> {
    match doc_type {
        DocType::Pdf => pdf::parse(bytes),
        DocType::Html => {
            let text = String::from_utf8(bytes.to_vec()).map_err(|e| CoreError::Parse {
                kind: "html".to_string(),
                message: e.to_string(),
            })?;
            html::parse(&text)
        }
        DocType::Txt => text::parse(bytes),
        DocType::Md => {
            let text = String::from_utf8(bytes.to_vec()).map_err(|e| CoreError::Parse {
                kind: "md".to_string(),
                message: e.to_string(),
            })?;
            markdown::parse(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_by_doc_type() {
        let parsed = parse(DocType::Txt, b"hello").unwrap();
        assert_eq!(parsed.text, "hello");
    }

    #[test]
    fn dispatches_markdown() {
        let parsed = parse(DocType::Md, b"# Title\nbody").unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Title"));
    }
}
