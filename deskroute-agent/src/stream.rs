//! Post-hoc segmentation of a finished reply into word chunks

use std::iter::FusedIterator;

/// Consuming, finite iterator over word-sized pieces of a message.
///
/// Each chunk is a word followed by its trailing whitespace run; leading
/// whitespace of the message rides on the first chunk. Concatenating every
/// chunk reproduces the message byte-for-byte.
#[derive(Debug, Clone)]
pub struct ReplyChunks {
    text: String,
    position: usize,
}

impl ReplyChunks {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: 0,
        }
    }

    /// The part of the message not yet yielded.
    pub fn remaining(&self) -> &str {
        &self.text[self.position..]
    }
}

impl Iterator for ReplyChunks {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.remaining();
        if rest.is_empty() {
            return None;
        }

        let mut chars = rest.char_indices().peekable();
        if self.position == 0 {
            while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        }
        while chars.next_if(|(_, c)| !c.is_whitespace()).is_some() {}
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let len = chars.peek().map(|(i, _)| *i).unwrap_or(rest.len());
        let chunk = rest[..len].to_string();
        self.position += len;
        Some(chunk)
    }
}

impl FusedIterator for ReplyChunks {}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_carry_trailing_whitespace() {
        let chunks: Vec<String> = ReplyChunks::new("Тикет  создан.\nСпасибо!").collect();
        assert_eq!(chunks, vec!["Тикет  ", "создан.\n", "Спасибо!"]);
    }

    #[test]
    fn test_leading_whitespace_joins_first_chunk() {
        let chunks: Vec<String> = ReplyChunks::new("  привет мир ").collect();
        assert_eq!(chunks, vec!["  привет ", "мир "]);
    }

    #[test]
    fn test_empty_and_blank_messages() {
        assert_eq!(ReplyChunks::new("").count(), 0);
        let blank: Vec<String> = ReplyChunks::new(" \n ").collect();
        assert_eq!(blank, vec![" \n "]);
    }

    #[test]
    fn test_iterator_is_fused() {
        let mut chunks = ReplyChunks::new("один");
        assert_eq!(chunks.next().as_deref(), Some("один"));
        assert_eq!(chunks.next(), None);
        assert_eq!(chunks.next(), None);
        assert_eq!(chunks.remaining(), "");
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Chunks concatenate to the input message exactly.
        #[test]
        fn prop_concatenation_is_lossless(text in "[ \\t\\na-zа-я0-9.,!✅]{0,200}") {
            let joined: String = ReplyChunks::new(text.clone()).collect();
            prop_assert_eq!(joined, text);
        }

        /// Apart from the first, every chunk starts with a non-whitespace char.
        #[test]
        fn prop_chunks_start_at_words(text in "[ \\na-z]{0,100}") {
            let chunks: Vec<String> = ReplyChunks::new(text).collect();
            for chunk in chunks.iter().skip(1) {
                prop_assert!(!chunk.starts_with(char::is_whitespace));
                prop_assert!(!chunk.is_empty());
            }
        }
    }
}
