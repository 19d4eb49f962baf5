/// Chunking parameters. `overlap` must be strictly less than `chunk_size` or
/// the chunker would never make forward progress.
#[derive(Debug, Clone, Copy)]
pub struct ChunkParams {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub chunk_index: usize,
    pub content: String,
    pub start_char: usize,
    pub end_char: usize,
}

/// Split `text` into paragraphs on runs of two or more newlines, dropping
/// empty paragraphs.
fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'\n' {
                i += 1;
            }
            if i - run_start >= 2 {
                let para = &text[start..run_start];
                if !para.trim().is_empty() {
                    paragraphs.push(para);
                }
                start = i;
                continue;
            }
        }
        i += 1;
    }
    let tail = &text[start..];
    if !tail.trim().is_empty() {
        paragraphs.push(tail);
    }
    paragraphs
}

/// Nearest sentence terminator (`.`, `!`, `?` followed by whitespace) to
/// `target` within `[target-100, target+100]`, searched outward from the
/// target so ties go to the closer candidate.
fn find_sentence_split(text: &str, target: usize) -> Option<usize> {
    let chars: Vec<char> = text.chars().collect();
    let lo = target.saturating_sub(100);
    let hi = (target + 100).min(chars.len());
    let mut best: Option<(usize, usize)> = None;
    for idx in lo..hi {
        if idx + 1 >= chars.len() {
            continue;
        }
        if matches!(chars[idx], '.' | '!' | '?') && chars[idx + 1].is_whitespace() {
            let distance = idx.abs_diff(target);
            if best.map(|(_, d)| distance < d).unwrap_or(true) {
                best = Some((idx + 1, distance));
            }
        }
    }
    best.map(|(pos, _)| pos)
}

/// Nearest space in `[chunk_size*0.8, chunk_size]`, searched from the end
/// backward so the split stays as close to `chunk_size` as possible.
fn find_space_split(text: &str, chunk_size: usize) -> Option<usize> {
    let chars: Vec<char> = text.chars().collect();
    let lo = (chunk_size as f64 * 0.8) as usize;
    let hi = chunk_size.min(chars.len());
    (lo..hi).rev().find(|&idx| chars[idx].is_whitespace())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn char_slice(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end - start).collect()
}

fn last_chars(s: &str, n: usize) -> String {
    let len = char_len(s);
    let start = len.saturating_sub(n);
    char_slice(s, start, len)
}

/// Split an over-long `current_chunk` into emitted prefixes, returning the
/// residual that still needs more paragraphs appended to it.
fn drain_overlong(
    mut current: String,
    params: ChunkParams,
    emitted: &mut Vec<String>,
) -> String {
    while char_len(&current) as f64 > params.chunk_size as f64 * 1.5 {
        let split = find_sentence_split(&current, params.chunk_size)
            .or_else(|| find_space_split(&current, params.chunk_size))
            .unwrap_or(params.chunk_size);
        let split = split.min(char_len(&current));
        let prefix = char_slice(&current, 0, split);
        let remainder = char_slice(&current, split, char_len(&current));
        emitted.push(prefix.trim().to_string());
        let seed = last_chars(&prefix, params.overlap);
        current = format!("{seed}{remainder}");
    }
    current
}

/// Paragraph-with-overlap chunking: paragraphs are packed into
/// `chunk_size`-ish windows, each new chunk reseeded with the trailing
/// `overlap` characters of the previous one so neighboring chunks share
/// context.
#[must_use]
pub fn chunk_text(text: &str, params: ChunkParams) -> Vec<Chunk> {
    let paragraphs = split_paragraphs(text);
    let mut emitted_texts: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in paragraphs {
        if char_len(&current) + char_len(paragraph) > params.chunk_size && !current.is_empty() {
            emitted_texts.push(current.trim().to_string());
            let seed = last_chars(&current, params.overlap);
            current = format!("{seed}\n\n{paragraph}");
        } else if current.is_empty() {
            current = paragraph.to_string();
        } else {
            current = format!("{current}\n\n{paragraph}");
        }
        current = drain_overlong(current, params, &mut emitted_texts);
    }

    if !current.trim().is_empty() {
        emitted_texts.push(current.trim().to_string());
    }

    // Map trimmed chunk texts back onto `[start_char, end_char)` ranges in
    // the original text. Overlap means ranges may overlap; we locate each
    // chunk's first occurrence at or after the previous chunk's start.
    let mut chunks = Vec::with_capacity(emitted_texts.len());
    let mut search_from = 0usize;
    for (idx, content) in emitted_texts.into_iter().enumerate() {
        if content.is_empty() {
            continue;
        }
        let start = text[search_from.min(text.len())..]
            .find(content.as_str())
            .map(|byte_off| {
                text[..search_from.min(text.len()) + byte_off].chars().count()
            })
            .unwrap_or(0);
        let end = start + char_len(&content);
        search_from = text
            .char_indices()
            .nth(start + 1)
            .map(|(b, _)| b)
            .unwrap_or(search_from);
        chunks.push(Chunk {
            chunk_index: idx,
            content,
            start_char: start,
            end_char: end,
        });
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_blank_lines() {
        let text = "para one\n\npara two\n\npara three";
        let paras = split_paragraphs(text);
        assert_eq!(paras, vec!["para one", "para two", "para three"]);
    }

    #[test]
    fn drops_empty_paragraphs() {
        let text = "a\n\n\n\nb";
        let paras = split_paragraphs(text);
        assert_eq!(paras, vec!["a", "b"]);
    }

    #[test]
    fn single_short_paragraph_is_one_chunk() {
        let chunks = chunk_text("hello world", ChunkParams::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "hello world");
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn three_paragraphs_split_at_chunk_size() {
        let para = "x".repeat(200);
        let text = format!("{para}\n\n{para}\n\n{para}");
        let params = ChunkParams {
            chunk_size: 150,
            overlap: 20,
        };
        let chunks = chunk_text(&text, params);
        assert!(chunks.len() == 3 || chunks.len() == 4);
    }

    #[test]
    fn chunk_count_respects_invariant_bound() {
        let text = "word ".repeat(2000);
        let params = ChunkParams {
            chunk_size: 500,
            overlap: 50,
        };
        let chunks = chunk_text(&text, params);
        let bound = (char_len(&text) as f64 / (params.chunk_size - params.overlap) as f64).ceil()
            as usize
            + 1;
        assert!(chunks.len() <= bound, "{} > {}", chunks.len(), bound);
    }

    #[test]
    fn chunk_indices_are_dense_from_zero() {
        let text = "word ".repeat(2000);
        let chunks = chunk_text(
            &text,
            ChunkParams {
                chunk_size: 300,
                overlap: 40,
            },
        );
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i);
        }
    }

    proptest::proptest! {
        #[test]
        fn never_panics_on_arbitrary_text(text in ".{0,3000}") {
            let _ = chunk_text(&text, ChunkParams::default());
        }
    }
}
