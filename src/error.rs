use std::io;

/// Alias for `Result` with the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the parse/compose engine.
///
/// Nothing here is logged-and-swallowed: every failure is returned to the
/// immediate caller. The only built-in recoveries are the opt-in tolerant
/// mode of [`Parser`](crate::Parser) and the drop rules of
/// [`normalize`](crate::normalize).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A timestamp did not split into exactly four integer fields.
    #[error("malformed timestamp: {text:?}")]
    MalformedTimestamp {
        /// The text that failed to convert.
        text: String,
    },

    /// The recognized blocks did not tile the input.
    #[error(
        "expected contiguous start of match or end of input at byte {expected}, \
         but next match started at byte {actual} (unmatched content: {unmatched:?})"
    )]
    Noncontiguous {
        /// Where the next block was expected to begin: the end of the
        /// previous match, or the start of the input.
        expected: usize,
        /// Where the next block actually began, or the input length if
        /// nothing further matched.
        actual: usize,
        /// The text between the two offsets.
        unmatched: String,
    },

    /// A framed group of lines did not resolve to exactly one subtitle.
    #[error("expected exactly one subtitle per framed block, got {entries}")]
    IncompleteBlock {
        /// How many subtitles the group produced.
        entries: usize,
    },

    /// The caller-supplied line source failed.
    #[error("failed to read from line source")]
    Io(#[from] io::Error),
}
