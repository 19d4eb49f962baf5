use crate::model::ParsedDocument;
use corpora_core::CoreError;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// First top-level `# heading` becomes the document title; everything else
/// is flattened to plain text.
pub fn parse(markdown: &str) -> Result<ParsedDocument, CoreError> {
    let mut title = None;
    let mut in_h1 = false;
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_h1 = title.is_none() && level == pulldown_cmark::HeadingLevel::H1;
                if in_h1 {
                    title = Some(String::new());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                in_h1 = false;
            }
            Event::Text(t) | Event::Code(t) => {
                if in_h1 {
                    if let Some(h) = title.as_mut() {
                        h.push_str(&t);
                    }
                }
                text.push_str(&t);
                text.push(' ');
            }
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            _ => {}
        }
    }

    let text = text.trim().to_string();
    let word_count = text.split_whitespace().count();
    Ok(ParsedDocument {
        text,
        title: title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        author: None,
        word_count,
        page_count: None,
    })
}
