use crate::error::Error;

use std::ops::{Add, Neg, Sub};

const MSECS_IN_SECOND: i64 = 1000;
const MSECS_IN_MINUTE: i64 = 60 * MSECS_IN_SECOND;
const MSECS_IN_HOUR: i64 = 60 * MSECS_IN_MINUTE;

/// Separators accepted between timestamp fields on input. Only `,` is
/// ever produced on output. The fullwidth variants show up in files from
/// CJK-locale editors.
pub(crate) const FIELD_SEPARATORS: [char; 5] = [',', '.', ':', '，', '：'];

/// A signed span of time with millisecond resolution.
///
/// SRT timestamps measure from the start of the media, so values are
/// usually non-negative, but negative spans are representable: shifting
/// tools can push a start before zero, and the parser takes timestamp
/// fields as given rather than validating their range.
///
/// An `i64` of milliseconds holds a few trillion hours, comfortably past
/// anything an unbounded hour field produces in practice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeDelta {
    msecs: i64,
}

impl TimeDelta {
    /// The zero span.
    pub const ZERO: TimeDelta = TimeDelta { msecs: 0 };

    /// A span of whole milliseconds.
    pub fn from_msecs(msecs: i64) -> Self {
        TimeDelta { msecs }
    }

    /// Build a span from clock components. The fields are summed
    /// arithmetically; each may be negative or exceed its clock range.
    pub fn new(hours: i64, minutes: i64, seconds: i64, msecs: i64) -> Self {
        TimeDelta {
            msecs: hours * MSECS_IN_HOUR
                + minutes * MSECS_IN_MINUTE
                + seconds * MSECS_IN_SECOND
                + msecs,
        }
    }

    /// The span as whole milliseconds.
    pub fn msecs(self) -> i64 {
        self.msecs
    }

    /// Whether the span lies before time zero.
    pub fn is_negative(self) -> bool {
        self.msecs < 0
    }
}

impl Add for TimeDelta {
    type Output = TimeDelta;

    fn add(self, other: TimeDelta) -> TimeDelta {
        TimeDelta::from_msecs(self.msecs + other.msecs)
    }
}

impl Sub for TimeDelta {
    type Output = TimeDelta;

    fn sub(self, other: TimeDelta) -> TimeDelta {
        TimeDelta::from_msecs(self.msecs - other.msecs)
    }
}

impl Neg for TimeDelta {
    type Output = TimeDelta;

    fn neg(self) -> TimeDelta {
        TimeDelta::from_msecs(-self.msecs)
    }
}

/// Parse an SRT clock value such as `01:23:04,000` into a [`TimeDelta`].
///
/// The text must split into exactly four integer fields on the accepted
/// separators. The fields are taken as given: signs are allowed, the hour
/// field is unbounded, widths are unconstrained, and minutes, seconds and
/// milliseconds are not checked against their clock range. This is a pure
/// arithmetic transform, not a validator.
pub fn parse_timestamp(text: &str) -> Result<TimeDelta, Error> {
    let malformed = || Error::MalformedTimestamp {
        text: text.to_string(),
    };

    let mut fields = [0i64; 4];
    let mut count = 0;
    for piece in text.split(|c| FIELD_SEPARATORS.contains(&c)) {
        if count == fields.len() {
            return Err(malformed());
        }
        fields[count] = piece.trim().parse().map_err(|_| malformed())?;
        count += 1;
    }
    if count != fields.len() {
        return Err(malformed());
    }

    let [hours, minutes, seconds, msecs] = fields;
    hours
        .checked_mul(MSECS_IN_HOUR)
        .and_then(|total| total.checked_add(minutes.checked_mul(MSECS_IN_MINUTE)?))
        .and_then(|total| total.checked_add(seconds.checked_mul(MSECS_IN_SECOND)?))
        .and_then(|total| total.checked_add(msecs))
        .map(TimeDelta::from_msecs)
        .ok_or_else(malformed)
}

/// Render a [`TimeDelta`] as an SRT clock value, `HH:MM:SS,mmm`.
///
/// The hour field counts hours of total duration, so two days render as
/// `48` rather than wrapping at 24. Negative spans get a `-` in front of
/// the hour field of the absolute decomposition; only non-negative values
/// round-trip through [`parse_timestamp`].
pub fn render_timestamp(delta: TimeDelta) -> String {
    let sign = if delta.msecs() < 0 { "-" } else { "" };
    let total = delta.msecs().unsigned_abs();
    let hours = total / MSECS_IN_HOUR as u64;
    let minutes = total % MSECS_IN_HOUR as u64 / MSECS_IN_MINUTE as u64;
    let seconds = total % MSECS_IN_MINUTE as u64 / MSECS_IN_SECOND as u64;
    let msecs = total % MSECS_IN_SECOND as u64;
    format!(
        "{}{:02}:{:02}:{:02},{:03}",
        sign, hours, minutes, seconds, msecs
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let delta = parse_timestamp(input).unwrap();

                assert_eq!(delta.msecs(), expected);
            }
        )*
        }
    }

    test_parse_ts! {
        test_parse_ts_0: ("00:00:01,200", 1200),
        test_parse_ts_1: ("00:00:01,2", 1002),
        test_parse_ts_2: ("00:00:01,002", 1002),
        test_parse_ts_3: ("1:1:1,200", 3_661_200),
        test_parse_ts_4: ("01:01:01,200", 3_661_200),
        test_parse_ts_5: ("01:23:04,000", 4_984_000),
        test_parse_ts_6: ("00:00:01.500", 1500),
        test_parse_ts_7: ("00:00:01：500", 1500),
        test_parse_ts_8: ("00：00：01，500", 1500),
        test_parse_ts_9: ("48:00:00,000", 48 * 3_600_000),
        test_parse_ts_10: ("-01:00:00,000", -3_600_000),
        test_parse_ts_11: ("00:-5:00,000", -300_000),
        test_parse_ts_12: ("0000:00:063,0200", 63_200),
    }

    macro_rules! test_render_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let rendered = render_timestamp(TimeDelta::from_msecs(input));

                assert_eq!(rendered, expected);
            }
        )*
        }
    }

    test_render_ts! {
        test_render_ts_0: (0, "00:00:00,000"),
        test_render_ts_1: (1, "00:00:00,001"),
        test_render_ts_2: (999, "00:00:00,999"),
        test_render_ts_3: (1000, "00:00:01,000"),
        test_render_ts_4: (59_999, "00:00:59,999"),
        test_render_ts_5: (60_000, "00:01:00,000"),
        test_render_ts_6: (3_600_000, "01:00:00,000"),
        test_render_ts_7: (7_326_159, "02:02:06,159"),
        test_render_ts_8: (34_380_001, "09:33:00,001"),
        test_render_ts_9: (360_000_001, "100:00:00,001"),
        test_render_ts_10: (2 * 24 * 3_600_000, "48:00:00,000"),
        test_render_ts_11: (-3_600_000, "-01:00:00,000"),
    }

    macro_rules! test_malformed_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let err = parse_timestamp($value).unwrap_err();

                assert!(matches!(err, Error::MalformedTimestamp { .. }));
            }
        )*
        }
    }

    test_malformed_ts! {
        test_malformed_ts_missing_field: "00:00:01",
        test_malformed_ts_extra_field: "00:00:00:01,000",
        test_malformed_ts_letter_separator: "00:00t01,000",
        test_malformed_ts_letter_field: "00:00:0a,000",
        test_malformed_ts_empty_field: "00:00:01,",
        test_malformed_ts_empty: "",
        test_malformed_ts_overflow: "99999999999999999999:00:00,000",
    }

    #[test]
    fn components_sum_arithmetically() {
        assert_eq!(TimeDelta::new(1, 23, 4, 0).msecs(), 4_984_000);
        assert_eq!(TimeDelta::new(0, 0, -1, 500).msecs(), -500);
        assert_eq!(TimeDelta::new(0, 90, 0, 0), TimeDelta::new(1, 30, 0, 0));
    }

    #[test]
    fn arithmetic_shifts() {
        let base = TimeDelta::from_msecs(1500);
        let shift = TimeDelta::from_msecs(2000);
        assert_eq!((base + shift).msecs(), 3500);
        assert_eq!((base - shift).msecs(), -500);
        assert_eq!((-base).msecs(), -1500);
    }

    #[test]
    fn round_trip_whole_msecs() {
        for msecs in [0, 1, 999, 1000, 3_600_000, 360_000_001, 86_400_000 * 99] {
            let delta = TimeDelta::from_msecs(msecs);
            assert_eq!(parse_timestamp(&render_timestamp(delta)).unwrap(), delta);
        }
    }
}
