use crate::error::Error;
use crate::subtitle::Subtitle;
use crate::timestamp::{parse_timestamp, TimeDelta, FIELD_SEPARATORS};

use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{digit0, digit1, line_ending, multispace0, space0};
use nom::combinator::{map_res, opt, recognize};
use nom::sequence::{pair, preceded, tuple};
use nom::IResult;

use regex::Regex;

type PResult<'a, T> = IResult<&'a str, T>;

/// Looks-like-a-new-block probe: optional leading whitespace, an index
/// line, then the first digits-and-separator of a timestamp. Used to
/// decide whether a blank line ends a block and to resynchronize after
/// unmatched content in tolerant mode.
const LOOKAHEAD: &str = r"^\s*-?[0-9]+\.?[0-9]*[ \t]*\r?\n-?[0-9]+[,.:，：]";

/// Splits SRT text into subtitles.
///
/// Holds the compiled lookahead pattern, so build one parser and reuse it
/// across inputs. Strict by default: any text that does not belong to a
/// recognized block surfaces as [`Error::Noncontiguous`]. With
/// [`tolerant`](Parser::tolerant) enabled, unmatched spans are skipped
/// instead.
pub struct Parser {
    lookahead: Regex,
    tolerant: bool,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            lookahead: Regex::new(LOOKAHEAD).expect("lookahead pattern is valid"),
            tolerant: false,
        }
    }

    /// Skip unmatched spans instead of failing on them.
    pub fn tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }

    /// Lazily parse `input`. Blocks are located one at a time as the
    /// returned iterator is driven.
    pub fn parse<'i>(&self, input: &'i str) -> Entries<'i> {
        // A BOM is the one non-whitespace prefix we accept.
        let rest = input.strip_prefix('\u{feff}').unwrap_or(input);
        Entries {
            lookahead: self.lookahead.clone(),
            tolerant: self.tolerant,
            full: input,
            rest,
            done: false,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse SRT text with a default strict [`Parser`].
pub fn parse(input: &str) -> Entries<'_> {
    Parser::new().parse(input)
}

/// Lazy, single-pass iterator over the blocks of an SRT text.
///
/// In strict mode the first contiguity gap yields
/// [`Error::Noncontiguous`] and the iterator fuses; in tolerant mode
/// unmatched spans are skipped. A consumed `Entries` cannot be rewound;
/// parse the text again to re-iterate.
pub struct Entries<'i> {
    lookahead: Regex,
    tolerant: bool,
    full: &'i str,
    rest: &'i str,
    done: bool,
}

impl<'i> Entries<'i> {
    fn offset(&self) -> usize {
        self.full.len() - self.rest.len()
    }

    /// Find the next line start where a whole block parses. Returns the
    /// remaining input there and its byte offset, or the input length if
    /// nothing further matches (a trailing all-whitespace remainder
    /// counts as nothing).
    fn resync(&self) -> (Option<&'i str>, usize) {
        let mut search = self.rest;
        while let Some(newline) = search.find('\n') {
            search = &search[newline + 1..];
            if search.trim().is_empty() {
                break;
            }
            if block(&self.lookahead, search).is_ok() {
                return (Some(search), self.full.len() - search.len());
            }
        }
        (None, self.full.len())
    }
}

impl<'i> Iterator for Entries<'i> {
    type Item = Result<Subtitle, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match block(&self.lookahead, self.rest) {
                Ok((rest, subtitle)) => {
                    self.rest = rest;
                    return Some(Ok(subtitle));
                }
                Err(BlockError::Timestamp(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                Err(BlockError::NoMatch) => {
                    if self.rest.trim().is_empty() {
                        // Trailing whitespace is permitted unmatched.
                        self.done = true;
                        return None;
                    }
                    let expected = self.offset();
                    let (resumed, actual) = self.resync();
                    if self.tolerant {
                        log::debug!(
                            "skipped {} unmatched bytes at byte {}",
                            actual - expected,
                            expected
                        );
                        match resumed {
                            Some(rest) => {
                                self.rest = rest;
                                continue;
                            }
                            None => {
                                self.done = true;
                                return None;
                            }
                        }
                    }
                    self.done = true;
                    return Some(Err(Error::Noncontiguous {
                        expected,
                        actual,
                        unmatched: self.full[expected..actual].to_string(),
                    }));
                }
            }
        }
    }
}

enum BlockError {
    /// The input at this position is not shaped like a block.
    NoMatch,
    /// Shaped like a block, but a timestamp failed integer conversion.
    Timestamp(Error),
}

/// Match one whole block: leading whitespace, index line, timing line,
/// content, terminator. Returns the remaining input and the subtitle.
fn block<'i>(lookahead: &Regex, input: &'i str) -> Result<(&'i str, Subtitle), BlockError> {
    let (rest, _) = ws(input).map_err(|_| BlockError::NoMatch)?;
    let (rest, index) = index_line(rest).map_err(|_| BlockError::NoMatch)?;
    let (rest, (start, end, proprietary)) = timing_line(rest)?;
    let (rest, content) = match eol(rest) {
        Ok((after, _)) => content_lines(lookahead, after),
        // The file may stop dead on the timing line.
        Err(_) if rest.is_empty() => (rest, String::new()),
        Err(_) => return Err(BlockError::NoMatch),
    };
    Ok((
        rest,
        Subtitle {
            index,
            start,
            end,
            proprietary: proprietary.to_string(),
            content,
        },
    ))
}

fn ws(input: &str) -> PResult<'_, &str> {
    multispace0(input)
}

fn eol(input: &str) -> PResult<'_, &str> {
    line_ending(input)
}

/// The index line: an integer, possibly with leading zeros. A `.digits`
/// tail (seen in the wild, e.g. `5.5`) and trailing blanks are consumed
/// and ignored; the leading integer run is the value.
fn index_line(input: &str) -> PResult<'_, i64> {
    let (input, value) = map_res(recognize(pair(opt(tag("-")), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)?;
    let (input, _) = opt(pair(tag("."), digit0))(input)?;
    let (input, _) = take_while(|c| c == ' ' || c == '\t')(input)?;
    let (input, _) = line_ending(input)?;
    Ok((input, value))
}

/// `<start> --> <end>[ <proprietary>]`, excluding the line ending.
fn timing_line(input: &str) -> Result<(&str, (TimeDelta, TimeDelta, &str)), BlockError> {
    let (input, raw_start) = timestamp_token(input).map_err(|_| BlockError::NoMatch)?;
    let (input, _) = arrow(input).map_err(|_| BlockError::NoMatch)?;
    let (input, raw_end) = timestamp_token(input).map_err(|_| BlockError::NoMatch)?;
    let (input, proprietary) = proprietary_tail(input).map_err(|_| BlockError::NoMatch)?;
    let start = parse_timestamp(raw_start).map_err(BlockError::Timestamp)?;
    let end = parse_timestamp(raw_end).map_err(BlockError::Timestamp)?;
    Ok((input, (start, end, proprietary)))
}

/// A run of digits and field separators, with an optional sign. The
/// split into fields happens in the codec, which is where a lexable but
/// malformed token turns into `MalformedTimestamp`.
fn timestamp_token(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        opt(tag("-")),
        take_while1(|c: char| c.is_ascii_digit() || FIELD_SEPARATORS.contains(&c)),
    ))(input)
}

/// `-->` in well-formed files; `- >`, `-- >` and the no-space variant
/// occur in the wild.
fn arrow(input: &str) -> PResult<'_, &str> {
    recognize(tuple((
        space0,
        tag("-"),
        take_while(|c| c == '-' || c == ' '),
        tag(">"),
        space0,
    )))(input)
}

/// The rest of the timing line. One space delimits the tail; anything
/// beyond it, spaces included, is part of the tail.
fn proprietary_tail(input: &str) -> PResult<'_, &str> {
    preceded(opt(tag(" ")), take_while(|c| c != '\r' && c != '\n'))(input)
}

/// Collect content lines up to the block terminator.
///
/// A blank line ends the block only when what follows looks like a new
/// block (or is the end of input). Otherwise the blank line is part of
/// the content: some producers embed blank lines inside a block's text,
/// and the one-block lookahead is what keeps those files parseable.
fn content_lines<'i>(lookahead: &Regex, mut rest: &'i str) -> (&'i str, String) {
    let mut lines: Vec<&'i str> = Vec::new();
    loop {
        if rest.is_empty() {
            break;
        }
        let (raw_line, after, had_eol) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..], true),
            None => (rest, &rest[rest.len()..], false),
        };
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            if !had_eol {
                // A stray bare carriage return at end of input.
                rest = after;
                break;
            }
            if after.is_empty() || lookahead.is_match(after) {
                rest = after;
                break;
            }
            lines.push("");
            rest = after;
            continue;
        }
        lines.push(line);
        rest = after;
        if !had_eol {
            break;
        }
    }
    (rest, lines.join("\n"))
}
