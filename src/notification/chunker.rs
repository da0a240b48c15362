//! Long-form message chunking
//!
//! Robot markdown messages are capped at 4096 bytes, so a long document is
//! split into batches whose joined content stays under a ceiling. The split
//! is greedy and keeps line order; a message that would need more batches
//! than allowed is rejected as a whole.

use super::error::ChunkError;

/// Separator placed between lines of one batch
pub const LINE_SEPARATOR: &str = "\n";

/// Default ceiling for one batch's joined content, in bytes
pub const DEFAULT_CEILING: usize = 4000;

/// Default cap on batches per long-form message
pub const DEFAULT_MAX_BATCHES: usize = 5;

/// Limits applied when splitting a long-form message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPolicy {
    /// Joined content of every batch must stay strictly below this many bytes
    pub ceiling: usize,
    /// Maximum number of batches for one message
    pub max_batches: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_CEILING,
            max_batches: DEFAULT_MAX_BATCHES,
        }
    }
}

/// One send-sized run of consecutive lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch {
    lines: Vec<String>,
}

impl Batch {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with the separator, as posted to the provider
    pub fn content(&self) -> String {
        self.lines.join(LINE_SEPARATOR)
    }

    /// Byte length of `content()`
    pub fn joined_len(&self) -> usize {
        joined_len(&self.lines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

fn joined_len<S: AsRef<str>>(lines: &[S]) -> usize {
    let bytes: usize = lines.iter().map(|l| l.as_ref().len()).sum();
    bytes + lines.len().saturating_sub(1) * LINE_SEPARATOR.len()
}

/// Split `lines` with the given ceiling and the default batch cap.
pub fn chunk<S: AsRef<str>>(lines: &[S], ceiling: usize) -> Result<Vec<Batch>, ChunkError> {
    chunk_with(
        lines,
        &ChunkPolicy {
            ceiling,
            ..ChunkPolicy::default()
        },
    )
}

/// Split `lines` into the fewest batches allowed by `policy`.
///
/// Every line is checked against the ceiling up front, so an oversized line
/// fails the whole message before any batch exists. An empty input yields no
/// batches at all.
pub fn chunk_with<S: AsRef<str>>(lines: &[S], policy: &ChunkPolicy) -> Result<Vec<Batch>, ChunkError> {
    if let Some((index, line)) = lines
        .iter()
        .enumerate()
        .find(|(_, l)| l.as_ref().len() >= policy.ceiling)
    {
        return Err(ChunkError::LineTooLarge {
            index,
            len: line.as_ref().len(),
            ceiling: policy.ceiling,
        });
    }

    let mut batches = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut size = 0;

    for line in lines {
        let line = line.as_ref();
        let projected = if buffer.is_empty() {
            line.len()
        } else {
            size + LINE_SEPARATOR.len() + line.len()
        };

        if !buffer.is_empty() && projected >= policy.ceiling {
            // flushing here means at least one more batch follows
            if batches.len() + 1 >= policy.max_batches {
                return Err(ChunkError::TooManyBatches {
                    max: policy.max_batches,
                });
            }
            batches.push(Batch {
                lines: std::mem::take(&mut buffer),
            });
            size = line.len();
        } else {
            size = projected;
        }

        buffer.push(line.to_string());
    }

    if !buffer.is_empty() {
        if batches.len() >= policy.max_batches {
            return Err(ChunkError::TooManyBatches {
                max: policy.max_batches,
            });
        }
        batches.push(Batch { lines: buffer });
    }

    Ok(batches)
}
