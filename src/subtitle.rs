use crate::timestamp::TimeDelta;

/// One subtitle block, decoded.
///
/// Fields are public and unvalidated: the parser hands entries over as
/// they appeared in the file, calling code mutates them freely, and all
/// cleanup is deferred to parse-time contiguity checks and compose-time
/// legalization. Two subtitles are equal iff every field is equal, and
/// hashing is consistent with that.
///
/// `start > end` is representable. It is semantically odd, but it occurs
/// in real files and in mid-edit states, so nothing here rejects it.
/// There is deliberately no `Ord` impl: the sorting rule (start, then end
/// as tiebreak) ignores the text fields and would disagree with the
/// field-wise `Eq`. [`normalize`](crate::normalize) applies it instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Subtitle {
    /// Block index as it appeared in the source. Negative, zero and
    /// duplicate values all survive parsing untouched.
    pub index: i64,
    /// When the subtitle appears.
    pub start: TimeDelta,
    /// When the subtitle disappears.
    pub end: TimeDelta,
    /// Opaque vendor metadata trailing the timing line; empty when absent.
    pub proprietary: String,
    /// The display text. Lines are LF-separated; embedded blank lines are
    /// invalid SRT but are preserved as parsed.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn sample() -> Subtitle {
        Subtitle {
            index: 1,
            start: TimeDelta::from_msecs(62_003),
            end: TimeDelta::from_msecs(123_004),
            proprietary: String::new(),
            content: "foo".to_string(),
        }
    }

    fn hash_of(sub: &Subtitle) -> u64 {
        let mut hasher = DefaultHasher::new();
        sub.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality_covers_every_field() {
        assert_eq!(sample(), sample());

        let mut reindexed = sample();
        reindexed.index += 1;
        assert_ne!(sample(), reindexed);

        let mut retimed = sample();
        retimed.end = retimed.end + TimeDelta::from_msecs(1);
        assert_ne!(sample(), retimed);
    }

    #[test]
    fn hash_consistent_with_equality() {
        assert_eq!(hash_of(&sample()), hash_of(&sample()));
    }
}
