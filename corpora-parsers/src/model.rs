/// Plain text plus whatever structural metadata a format's parser can
/// recover. Every parser produces this shape regardless of source format.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub text: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub word_count: usize,
    pub page_count: Option<i32>,
}
