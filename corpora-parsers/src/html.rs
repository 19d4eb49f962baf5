use crate::model::ParsedDocument;
use corpora_core::CoreError;
use scraper::{Html, Selector};

/// Selectors tried in order; the first that matches anything wins the body
/// text. Falls back to the whole document if none of them are present.
const CONTENT_SELECTORS: &[&str] = &["main", "article", "body"];

pub fn parse(html: &str) -> Result<ParsedDocument, CoreError> {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty());

    let skip = Selector::parse("script, style, noscript").map_err(|_| CoreError::Parse {
        kind: "html".to_string(),
        message: "invalid skip selector".to_string(),
    })?;
    let skip_nodes: std::collections::HashSet<_> =
        document.select(&skip).map(|el| el.id()).collect();

    let mut text = None;
    for selector in CONTENT_SELECTORS {
        let Ok(sel) = Selector::parse(selector) else {
            continue;
        };
        if let Some(root) = document.select(&sel).next() {
            let extracted = extract_text(&root, &skip_nodes);
            if !extracted.trim().is_empty() {
                text = Some(extracted);
                break;
            }
        }
    }

    let text = text.unwrap_or_else(|| {
        let root = document.root_element();
        extract_text(&root, &skip_nodes)
    });

    let text = normalize_whitespace(&text);
    let word_count = text.split_whitespace().count();
    Ok(ParsedDocument {
        text,
        title,
        author: None,
        word_count,
        page_count: None,
    })
}

fn extract_text(
    el: &scraper::ElementRef,
    skip: &std::collections::HashSet<ego_tree::NodeId>,
) -> String {
    let mut out = String::new();
    collect_text(*el, skip, &mut out);
    out
}

fn collect_text(
    el: scraper::ElementRef,
    skip: &std::collections::HashSet<ego_tree::NodeId>,
    out: &mut String,
) {
    if skip.contains(&el.id()) {
        return;
    }
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_el) = scraper::ElementRef::wrap(child) {
            collect_text(child_el, skip, out);
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
