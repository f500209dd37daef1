/// Length of `text` in characters (not bytes). Provider limits are expressed in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split a paragraph into near-equal, word-aligned chunks that fit `max_chars`.
///
/// A non-empty paragraph within the limit comes back unchanged as a single
/// chunk, even if it is only whitespace; an empty paragraph produces no
/// chunks. Longer text is cut into `ceil(len / max_chars)` chunks, each filled greedily with whole
/// words until it reaches `ceil(len / chunk_count)` characters. Words are
/// never split, so a single word longer than `max_chars` yields an over-limit
/// chunk (logged as a warning). Chunks are rejoined with single spaces and
/// carry no trailing separator.
pub fn split_paragraph(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let len = char_len(text);

    if text.is_empty() {
        return Vec::new();
    }
    if len <= max_chars {
        return vec![text.to_string()];
    }

    let chunk_count = len.div_ceil(max_chars);
    let target = len.div_ceil(chunk_count);

    let mut words = text.split_whitespace();
    let mut chunks: Vec<String> = Vec::with_capacity(chunk_count);

    for _ in 0..chunk_count {
        let mut chunk = String::new();
        // Counts each word plus one separator, so a chunk closes as soon as
        // the text it covers reaches the target.
        let mut accumulated = 0usize;

        while accumulated < target {
            let Some(word) = words.next() else { break };
            let word_len = char_len(word);
            if word_len > max_chars {
                tracing::warn!(
                    "Word of {word_len} chars exceeds the {max_chars} char limit; sending it as an oversized chunk"
                );
            }
            if !chunk.is_empty() {
                chunk.push(' ');
            }
            chunk.push_str(word);
            accumulated += word_len + 1;
        }

        if !chunk.is_empty() {
            chunks.push(chunk);
        }
    }

    // Unreachable with single-space text, but irregular whitespace must not drop words.
    let rest: Vec<&str> = words.collect();
    if !rest.is_empty() {
        let tail = rest.join(" ");
        match chunks.last_mut() {
            Some(last) => {
                last.push(' ');
                last.push_str(&tail);
            }
            None => chunks.push(tail),
        }
    }

    for chunk in &chunks {
        let n = char_len(chunk);
        if n > max_chars {
            tracing::warn!("Chunk of {n} chars exceeds the {max_chars} char provider limit");
        }
    }

    chunks
}
