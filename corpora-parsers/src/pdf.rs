use crate::model::ParsedDocument;
use corpora_core::CoreError;

pub fn parse(bytes: &[u8]) -> Result<ParsedDocument, CoreError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| CoreError::Parse {
        kind: "pdf".to_string(),
        message: e.to_string(),
    })?;
    // pdf-extract separates pages with form-feeds; count them without
    // requiring a second pass over the page tree.
    let page_count = (text.matches('\u{c}').count() + 1) as i32;
    let word_count = text.split_whitespace().count();
    let (title, author) = read_info_dict(bytes);
    Ok(ParsedDocument {
        text,
        title,
        author,
        word_count,
        page_count: Some(page_count),
    })
}

/// Title/Author live in the PDF's Info dictionary, which `pdf-extract`'s
/// text-only API never surfaces. `lopdf` gives us the raw object graph to
/// pull them from. A missing or malformed trailer just means no metadata —
/// the text already extracted above is still usable.
fn read_info_dict(bytes: &[u8]) -> (Option<String>, Option<String>) {
    let Ok(doc) = lopdf::Document::load_mem(bytes) else {
        return (None, None);
    };
    let Some(dict) = info_dictionary(&doc) else {
        return (None, None);
    };
    let title = dict
        .get(b"Title")
        .ok()
        .and_then(pdf_string)
        .filter(|s| !s.is_empty());
    let author = dict
        .get(b"Author")
        .ok()
        .and_then(pdf_string)
        .filter(|s| !s.is_empty());
    (title, author)
}

fn info_dictionary(doc: &lopdf::Document) -> Option<&lopdf::Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    let resolved = match info {
        lopdf::Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    match resolved {
        lopdf::Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn pdf_string(obj: &lopdf::Object) -> Option<String> {
    match obj {
        lopdf::Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// PDF strings are either UTF-16BE with a `FE FF` byte-order mark, or
/// PDFDocEncoding, which maps bytewise onto Unicode for the ASCII-range
/// characters titles and author names are made of in practice.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_produce_parse_error() {
        let err = parse(b"not a pdf").unwrap_err();
        match err {
            CoreError::Parse { kind, .. } => assert_eq!(kind, "pdf"),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn decodes_ascii_pdfdoc_string() {
        assert_eq!(decode_pdf_string(b"Jane Doe"), "Jane Doe");
    }

    #[test]
    fn decodes_utf16be_string_with_bom() {
        let bytes = [0xFEu8, 0xFF, 0x00, 0x4A, 0x00, 0x61, 0x00, 0x6E, 0x00, 0x65];
        assert_eq!(decode_pdf_string(&bytes), "Jane");
    }

    #[test]
    fn unparseable_bytes_have_no_metadata() {
        let (title, author) = read_info_dict(b"not a pdf");
        assert_eq!(title, None);
        assert_eq!(author, None);
    }
}
