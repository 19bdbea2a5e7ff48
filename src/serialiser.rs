use crate::reindex::{normalize, NormalizeOptions};
use crate::subtitle::Subtitle;
use crate::timestamp::render_timestamp;

use std::io::{self, Write};

/// Knobs for [`compose`] and friends.
#[derive(Clone, Debug)]
pub struct ComposeOptions {
    /// Run the entries through [`normalize`] before rendering.
    pub reindex: bool,
    /// First index assigned when reindexing.
    pub start_index: i64,
    /// Legalize content: remove blank lines, interior ones included.
    /// With this off, blank lines pass through and the output violates
    /// the format, which some players refuse to play.
    pub strict: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        ComposeOptions {
            reindex: true,
            start_index: 1,
            strict: true,
        }
    }
}

/// Emitted when strict composition had to rewrite a subtitle's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegalizedContent {
    /// Index of the affected subtitle, after any reindexing.
    pub index: i64,
    /// The content as the entry carried it.
    pub before: String,
    /// The content as written.
    pub after: String,
}

/// Remove illegal lines from a content block: blank lines, whether
/// leading, trailing or interior.
pub fn legalize_content(content: &str) -> String {
    content
        .split('\n')
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one subtitle as an SRT block, trailing blank line included.
pub fn render_block(sub: &Subtitle, strict: bool) -> String {
    render_block_with(sub, strict, &mut |_| {})
}

fn render_block_with<F>(sub: &Subtitle, strict: bool, observe: &mut F) -> String
where
    F: FnMut(LegalizedContent),
{
    let mut content = sub.content.replace("\r\n", "\n");
    if strict {
        let legal = legalize_content(&content);
        if legal != content {
            observe(LegalizedContent {
                index: sub.index,
                before: content,
                after: legal.clone(),
            });
            content = legal;
        }
    }
    let proprietary_suffix = if sub.proprietary.is_empty() {
        String::new()
    } else {
        // The tail sits right next to the end timestamp, so it needs the
        // space as a field delimiter.
        format!(" {}", sub.proprietary)
    };
    format!(
        "{}\n{} --> {}{}\n{}\n\n",
        sub.index,
        render_timestamp(sub.start),
        render_timestamp(sub.end),
        proprietary_suffix,
        content
    )
}

/// Join subtitles into a single SRT document.
pub fn compose<I>(subs: I, opts: &ComposeOptions) -> String
where
    I: IntoIterator<Item = Subtitle>,
{
    let mut out = String::new();
    if opts.reindex {
        for sub in normalize(subs.into_iter().collect(), &reindex_options(opts)) {
            out.push_str(&render_block(&sub, opts.strict));
        }
    } else {
        for sub in subs {
            out.push_str(&render_block(&sub, opts.strict));
        }
    }
    out
}

/// Write subtitles to `sink` as SRT blocks, returning how many entries
/// were written (0 for an empty sequence).
pub fn compose_to<I, W>(subs: I, sink: &mut W, opts: &ComposeOptions) -> io::Result<usize>
where
    I: IntoIterator<Item = Subtitle>,
    W: Write,
{
    compose_observed(subs, sink, opts, |_| {})
}

/// [`compose_to`] with a legalization observer: strict-mode rewrites are
/// reported as [`LegalizedContent`] events rather than silently applied.
pub fn compose_observed<I, W, F>(
    subs: I,
    sink: &mut W,
    opts: &ComposeOptions,
    mut observe: F,
) -> io::Result<usize>
where
    I: IntoIterator<Item = Subtitle>,
    W: Write,
    F: FnMut(LegalizedContent),
{
    let mut written = 0;
    if opts.reindex {
        for sub in normalize(subs.into_iter().collect(), &reindex_options(opts)) {
            sink.write_all(render_block_with(&sub, opts.strict, &mut observe).as_bytes())?;
            written += 1;
        }
    } else {
        for sub in subs {
            sink.write_all(render_block_with(&sub, opts.strict, &mut observe).as_bytes())?;
            written += 1;
        }
    }
    Ok(written)
}

fn reindex_options(opts: &ComposeOptions) -> NormalizeOptions {
    NormalizeOptions {
        start_index: opts.start_index,
        ..NormalizeOptions::default()
    }
}
