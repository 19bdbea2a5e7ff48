//! Incremental parsing for inputs too large to hold in memory.
//!
//! Lines from a caller-supplied source are grouped into
//! blank-line-delimited frames and each frame is parsed as one block.
//! Unlike [`Parser`](crate::Parser) on a full text, the grouping does
//! not look past a blank line, so blocks with blank lines embedded in
//! their content do not survive this path. That is the accepted
//! trade-off of the streaming route.

use crate::error::Error;
use crate::parser::Parser;
use crate::subtitle::Subtitle;

use std::io::{self, BufRead};

/// Group `reader`'s lines into blank-line-delimited frames, lazily.
pub fn frame_blocks<R: BufRead>(reader: R) -> Frames<R> {
    Frames {
        reader,
        done: false,
    }
}

/// Parse subtitles frame-by-frame from a line source.
///
/// Each frame must resolve to exactly one subtitle; anything else is an
/// error. A source that truncates mid-block surfaces the underlying
/// parse failure for its final frame.
pub fn parse_stream<R: BufRead>(reader: R) -> StreamEntries<R> {
    StreamEntries {
        frames: frame_blocks(reader),
        parser: Parser::new(),
    }
}

/// Lazy iterator of raw frames. Single-pass, like the source it wraps.
pub struct Frames<R: BufRead> {
    reader: R,
    done: bool,
}

impl<R: BufRead> Iterator for Frames<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut frame = String::new();
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(_) => {
                    if line.trim().is_empty() {
                        if frame.is_empty() {
                            // Blank run before the frame; keep scanning.
                            continue;
                        }
                        break;
                    }
                    frame.push_str(&line);
                }
            }
        }
        if frame.is_empty() {
            None
        } else {
            Some(Ok(frame))
        }
    }
}

/// Lazy iterator of subtitles parsed one frame at a time.
pub struct StreamEntries<R: BufRead> {
    frames: Frames<R>,
    parser: Parser,
}

impl<R: BufRead> Iterator for StreamEntries<R> {
    type Item = Result<Subtitle, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = match self.frames.next()? {
            Ok(frame) => frame,
            Err(err) => return Some(Err(Error::Io(err))),
        };
        let mut entries = self.parser.parse(&frame);
        let first = match entries.next() {
            Some(Ok(sub)) => sub,
            Some(Err(err)) => return Some(Err(err)),
            None => return Some(Err(Error::IncompleteBlock { entries: 0 })),
        };
        let mut count = 1;
        for extra in entries {
            match extra {
                Ok(_) => count += 1,
                Err(err) => return Some(Err(err)),
            }
        }
        if count == 1 {
            Some(Ok(first))
        } else {
            Some(Err(Error::IncompleteBlock { entries: count }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_split_on_blank_runs() {
        let input = "1\nfirst frame\n\n\n2\nsecond frame\n";
        let frames: Vec<_> = frame_blocks(input.as_bytes())
            .collect::<io::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(frames, ["1\nfirst frame\n", "2\nsecond frame\n"]);
    }

    #[test]
    fn streams_one_subtitle_per_frame() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nfoo\n\n\
                     2\n00:00:03,000 --> 00:00:04,000\nbar\nbaz\n";
        let subs: Vec<_> = parse_stream(input.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].content, "bar\nbaz");
    }

    #[test]
    fn truncated_frame_surfaces_the_parse_failure() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nfoo\n\n2\n00:00:03,000 -->";
        let results: Vec<_> = parse_stream(input.as_bytes()).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1].as_ref().unwrap_err(),
            Error::Noncontiguous { .. }
        ));
    }

    #[test]
    fn frame_without_a_subtitle_is_incomplete() {
        // A BOM alone is not whitespace to the framer but parses to
        // nothing, so the frame resolves to zero entries.
        let results: Vec<_> = parse_stream("\u{feff}\n".as_bytes()).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0].as_ref().unwrap_err(),
            Error::IncompleteBlock { entries: 0 }
        ));
    }
}
