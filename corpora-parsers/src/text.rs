use crate::model::ParsedDocument;
use corpora_core::CoreError;

pub fn parse(bytes: &[u8]) -> Result<ParsedDocument, CoreError> {
    let text = String::from_utf8(bytes.to_vec()).map_err(|e| CoreError::Parse {
        kind: "txt".to_string(),
        message: e.to_string(),
    })?;
    let word_count = text.split_whitespace().count();
    Ok(ParsedDocument {
        text,
        title: None,
        author: None,
        word_count,
        page_count: None,
    })
}
