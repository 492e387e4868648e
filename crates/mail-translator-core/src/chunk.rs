//! Long-input chunking.
//!
//! Provider APIs bound the size of a single request, so longer texts are
//! split left-to-right into fixed-size character windows with no semantic
//! boundary awareness. Concatenating the chunks in order reconstructs the
//! original text.

/// Maximum characters per translated chunk
pub const MAX_CHUNK_CHARS: usize = 3000;

/// Split `text` into slices of at most `max_chars` characters each,
/// in original order. Slices always fall on char boundaries.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 || text.len() <= max_chars {
        // A str shorter in bytes than max_chars cannot exceed it in chars
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = split_chunks("hello", 3000);
        assert_eq!(chunks, vec!["hello"]);
    }

    #[test]
    fn test_exact_boundary_is_single_chunk() {
        let text = "a".repeat(3000);
        assert_eq!(split_chunks(&text, 3000).len(), 1);
    }

    #[test]
    fn test_seven_thousand_chars_make_three_chunks() {
        let text = "x".repeat(7000);
        let chunks = split_chunks(&text, 3000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 3000);
        assert_eq!(chunks[1].chars().count(), 3000);
        assert_eq!(chunks[2].chars().count(), 1000);
    }

    #[test]
    fn test_concatenation_reconstructs_original() {
        let text: String = ('a'..='z').cycle().take(9500).collect();
        let chunks = split_chunks(&text, 3000);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let text = "中文".repeat(2000); // 4000 chars, 12000 bytes
        let chunks = split_chunks(&text, 3000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 3000);
        assert_eq!(chunks[1].chars().count(), 1000);
        assert_eq!(chunks.concat(), text);
    }
}
