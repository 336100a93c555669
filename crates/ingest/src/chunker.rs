//! Text chunking with overlapping word windows.
//!
//! Window `i` covers words `[i*(size-overlap), i*(size-overlap)+size)`.
//! Overlap-adjusted windowing guarantees every word of the input appears
//! in at least one chunk.

/// Chunk text into overlapping windows of whitespace-delimited words.
///
/// `overlap` must be smaller than `size`; that is enforced at
/// configuration time, not here. Empty or whitespace-only input produces
/// an empty sequence.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![];
    }

    let step = if size > overlap { size - overlap } else { size.max(1) };
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + size).min(words.len());
        let chunk = words[start..end].join(" ");
        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }
        start += step;
    }

    tracing::debug!(
        "Chunked {} words into {} chunks (size: {}, overlap: {})",
        words.len(),
        chunks.len(),
        size,
        overlap
    );

    chunks
}
