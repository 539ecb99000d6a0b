use crate::config::ChunkingConfig;

/// Splits a document into overlapping word windows.
///
/// Documents shorter than `chunk_size` *characters* are returned whole;
/// longer ones are cut into windows of `chunk_size` *words* advancing by
/// `chunk_size - overlap` words (at least one).
pub fn chunk_document(content: &str, config: &ChunkingConfig) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }

    let chunk_size = config.chunk_size.max(1);
    if content.chars().count() < chunk_size {
        return vec![content.to_string()];
    }

    let words: Vec<&str> = content.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let step = config.step();
    let mut chunks = Vec::with_capacity(words.len() / step + 1);
    let mut start = 0;
    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        let chunk = words[start..end].join(" ");
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn test_short_document_kept_whole() {
        let text = "This is a test.\n\nIt has   irregular   spacing.";
        let chunks = chunk_document(text, &ChunkingConfig::default());
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_empty_document() {
        assert!(chunk_document("", &ChunkingConfig::default()).is_empty());
    }

    #[test]
    fn test_whitespace_only_long_document() {
        let text = " ".repeat(2000);
        assert!(chunk_document(&text, &ChunkingConfig::default()).is_empty());
    }

    #[test]
    fn test_1500_words_make_two_windows() {
        let words = numbered_words(1500);
        let text = words.join(" ");
        let chunks = chunk_document(&text, &ChunkingConfig::default());

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], words[0..1000].join(" "));
        assert_eq!(chunks[1], words[800..1500].join(" "));
    }

    #[test]
    fn test_windows_normalise_whitespace() {
        let config = ChunkingConfig {
            chunk_size: 4,
            overlap: 1,
        };
        let chunks = chunk_document("a\tb\n\nc  d e f g", &config);
        assert_eq!(chunks, vec!["a b c d", "d e f g", "g"]);
    }

    #[test]
    fn test_overlap_not_smaller_than_window_terminates() {
        let config = ChunkingConfig {
            chunk_size: 3,
            overlap: 3,
        };
        let chunks = chunk_document("one two three four", &config);
        assert_eq!(
            chunks,
            vec!["one two three", "two three four", "three four", "four"]
        );
    }

    #[test]
    fn test_character_threshold_not_word_count() {
        // past the character threshold, but fewer words than one window
        let config = ChunkingConfig {
            chunk_size: 20,
            overlap: 5,
        };
        let text = "alpha bravo charlie delta echo fox";
        let chunks = chunk_document(text, &config);
        assert_eq!(chunks, vec!["alpha bravo charlie delta echo fox"]);
    }
}
