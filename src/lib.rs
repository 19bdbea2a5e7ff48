//! Parse, modify, and compose SubRip (`.srt`) subtitles.
//!
//! An SRT file is a run of blocks, each an index line, a timing line,
//! and some lines of text, separated by blank lines:
//!
//! ```text
//! 422
//! 00:31:39,931 --> 00:31:41,931
//! Using mainly spoons,
//!
//! 423
//! 00:31:41,933 --> 00:31:43,435
//! we dig a tunnel under the city and release it into the wild.
//! ```
//!
//! Files in the wild bend the format constantly, so [`parse`] works
//! around the common damage (missing trailing blank lines, blank lines
//! inside a block's text, odd arrow spacing, `.` or fullwidth timestamp
//! separators, noise on the index line) while still refusing input
//! whose recognized blocks don't tile the text ([`Error::Noncontiguous`]).
//! [`Parser::tolerant`] turns that refusal into a skip.
//!
//! The usual pipeline: parse, mutate the [`Subtitle`] values, then
//! [`compose`] (which sorts and renumbers by default) back to text.
//! [`parse_stream`] covers inputs too large to hold in memory, and
//! [`parse_timestamp`]/[`render_timestamp`] are exposed for tools doing
//! time arithmetic of their own.

mod error;
mod framing;
mod parser;
mod reindex;
mod serialiser;
mod subtitle;
mod timestamp;

pub use crate::error::{Error, Result};
pub use crate::framing::{frame_blocks, parse_stream, Frames, StreamEntries};
pub use crate::parser::{parse, Entries, Parser};
pub use crate::reindex::{
    normalize, normalize_copy, normalize_in_place, NormalizeOptions, Normalized,
};
pub use crate::serialiser::{
    compose, compose_observed, compose_to, legalize_content, render_block, ComposeOptions,
    LegalizedContent,
};
pub use crate::subtitle::Subtitle;
pub use crate::timestamp::{parse_timestamp, render_timestamp, TimeDelta};
