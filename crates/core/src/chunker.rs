//! Sentence-aware splitting of long text into model-sized chunks.
//!
//! Sizes are counted in characters; [`TextChunk::start`] and
//! [`TextChunk::end`] are byte offsets so callers can slice the original
//! string directly.

use serde::Serialize;
use tracing::debug;

use crate::{Result, VertoError};

/// Default maximum chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Default boundary search window in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// One ordered slice of a larger text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    /// Position in the chunk sequence, starting at 0.
    pub index: usize,
    /// Byte offset where the untrimmed slice starts.
    pub start: usize,
    /// Byte offset where the untrimmed slice ends (exclusive).
    pub end: usize,
    /// The slice `[start, end)` with surrounding whitespace trimmed.
    pub content: String,
}

impl TextChunk {
    /// Whether the trimmed content is empty.
    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }

    /// Length of the trimmed content in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Splits text at sentence boundaries near a size limit.
///
/// When the text is longer than `max_size`, each cut is placed right after the
/// last `.`, `!`, `?` or newline in the `overlap` characters before the limit.
/// Failing that, right after the first one in the `overlap` characters past
/// the limit. Failing that, at the limit itself.
///
/// # Example
///
/// ```rust
/// use verto_core::Chunker;
///
/// let chunker = Chunker::new(20, 10).unwrap();
/// let chunks = chunker.split("First sentence. Second sentence here.");
///
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].content, "First sentence.");
/// assert_eq!(chunks[1].content, "Second sentence here.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_size: usize,
    overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self { max_size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

impl Chunker {
    /// # Errors
    ///
    /// Returns [`VertoError::ConfigError`] when `max_size` is zero.
    pub fn new(max_size: usize, overlap: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(VertoError::ConfigError("chunk size must be greater than zero".to_string()));
        }
        Ok(Self { max_size, overlap })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Splits `text` into ordered chunks.
    ///
    /// Text no longer than `max_size` yields exactly one chunk, even when it
    /// is empty.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
        let len = chars.len();
        let byte_at = |index: usize| if index == len { text.len() } else { offsets[index] };

        if len <= self.max_size {
            return vec![TextChunk { index: 0, start: 0, end: text.len(), content: text.trim().to_string() }];
        }

        let mut chunks = Vec::new();
        let mut pos = 0;

        while pos < len {
            let mut end = pos.saturating_add(self.max_size).min(len);
            if end < len {
                end = self.cut_point(&chars, pos, end);
            }

            let (start_byte, end_byte) = (byte_at(pos), byte_at(end));
            chunks.push(TextChunk {
                index: chunks.len(),
                start: start_byte,
                end: end_byte,
                content: text[start_byte..end_byte].trim().to_string(),
            });
            pos = end;
        }

        debug!(
            chunks = chunks.len(),
            sizes = ?chunks.iter().map(TextChunk::char_len).collect::<Vec<_>>(),
            "Chunking complete"
        );

        chunks
    }

    /// Character index to cut at, always greater than `pos`.
    ///
    /// A cut after a boundary character also takes the rest of its run, so
    /// `...`, `?!` and `.\n` never straddle two chunks.
    fn cut_point(&self, chars: &[char], pos: usize, end: usize) -> usize {
        let window_start = pos.max(end.saturating_sub(self.overlap));
        if let Some(index) = (window_start..end).rev().find(|&i| is_boundary(chars[i])) {
            return past_run(chars, index + 1);
        }

        let window_end = chars.len().min(end.saturating_add(self.overlap));
        (end..window_end)
            .find(|&i| is_boundary(chars[i]))
            .map_or(end, |index| past_run(chars, index + 1))
    }
}

fn past_run(chars: &[char], mut cut: usize) -> usize {
    while cut < chars.len() && is_boundary(chars[cut]) {
        cut += 1;
    }
    cut
}

fn is_boundary(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}
