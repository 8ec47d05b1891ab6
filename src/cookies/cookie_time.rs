//! Liberal parser for cookie `Expires` dates.
//!
//! Servers send every date format imaginable: RFC 1123, RFC 850, asctime,
//! reordered fields, `/` or `\` separators, quoted values and trailing
//! garbage. Parsing happens in two passes: the input is split into tagged
//! [`DateToken`]s, then the first month, time, day-of-month and year found
//! are assembled into a UTC timestamp. Time zone names are ignored.

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// Characters that separate date fields. `:` is deliberately absent so that
/// `hh:mm:ss` stays a single token.
const DELIMITERS: &[u8] = b"\t !\"#$%&'()*+,-./;<=>?@[\\]^_`{|}~";

const MONTHS: [(&str, Month); 12] = [
    ("jan", Month::January),
    ("feb", Month::February),
    ("mar", Month::March),
    ("apr", Month::April),
    ("may", Month::May),
    ("jun", Month::June),
    ("jul", Month::July),
    ("aug", Month::August),
    ("sep", Month::September),
    ("oct", Month::October),
    ("nov", Month::November),
    ("dec", Month::December),
];

const MIN_YEAR: u32 = 1601;
const MAX_YEAR: u32 = 9999;

/// A classified piece of a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    /// A word whose first three letters name a month.
    Month(Month),
    /// A `h:m:s` triple. Values are not range checked yet.
    Time { hour: u32, minute: u32, second: u32 },
    /// A token starting with a digit. `len` is the length of the whole token.
    Number { value: u32, len: usize },
    /// Week days, zone names and anything else we don't care about.
    Ignored,
}

/// Split `input` into classified tokens.
pub fn tokenize(input: &str) -> Vec<DateToken> {
    input
        .split(|c: char| c.is_ascii() && DELIMITERS.contains(&(c as u8)))
        .filter(|token| !token.is_empty())
        .map(classify)
        .collect()
}

fn classify(token: &str) -> DateToken {
    let bytes = token.as_bytes();

    if !bytes[0].is_ascii_digit() {
        let prefix = match bytes.get(..3) {
            Some(prefix) => prefix,
            None => return DateToken::Ignored,
        };
        return MONTHS
            .iter()
            .find(|(name, _)| prefix.eq_ignore_ascii_case(name.as_bytes()))
            .map_or(DateToken::Ignored, |&(_, month)| DateToken::Month(month));
    }

    if token.contains(':') {
        return match parse_hms(bytes) {
            Some((hour, minute, second)) => DateToken::Time {
                hour,
                minute,
                second,
            },
            None => DateToken::Ignored,
        };
    }

    DateToken::Number {
        value: leading_number(bytes),
        len: bytes.len(),
    }
}

/// Reads `H:M:S` where every field is one or two digits. Anything after the
/// seconds is ignored.
fn parse_hms(bytes: &[u8]) -> Option<(u32, u32, u32)> {
    let mut fields = [0u32; 3];
    let mut pos = 0;

    for (i, field) in fields.iter_mut().enumerate() {
        if i > 0 {
            if bytes.get(pos) != Some(&b':') {
                return None;
            }
            pos += 1;
        }
        let start = pos;
        while pos < bytes.len() && pos - start < 2 && bytes[pos].is_ascii_digit() {
            *field = *field * 10 + u32::from(bytes[pos] - b'0');
            pos += 1;
        }
        if pos == start {
            return None;
        }
    }

    Some((fields[0], fields[1], fields[2]))
}

fn leading_number(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        })
}

/// Build a timestamp from classified tokens.
///
/// The first month and the first well-formed time win. The first number of
/// at most two characters is the day of month, the next number of at most
/// five characters is the year; other numbers are skipped.
pub fn assemble(tokens: &[DateToken]) -> Option<OffsetDateTime> {
    let mut month = None;
    let mut hms = None;
    let mut day = None;
    let mut year = None;

    for token in tokens {
        match *token {
            DateToken::Month(m) => {
                month.get_or_insert(m);
            }
            DateToken::Time {
                hour,
                minute,
                second,
            } => {
                hms.get_or_insert((hour, minute, second));
            }
            DateToken::Number { value, len } => {
                if day.is_none() && len <= 2 {
                    day = Some(value);
                } else if year.is_none() && len <= 5 {
                    year = Some(value);
                }
            }
            DateToken::Ignored => {}
        }
    }

    let (month, (hour, minute, second), day, year) = (month?, hms?, day?, year?);

    let year = match year {
        0..=69 => year + 2000,
        70..=99 => year + 1900,
        _ => year,
    };

    if !(1..=31).contains(&day)
        || !(MIN_YEAR..=MAX_YEAR).contains(&year)
        || hour > 23
        || minute > 59
        || second > 59
    {
        return None;
    }

    let date = Date::from_calendar_date(year as i32, month, day as u8).ok()?;
    let time = Time::from_hms(hour as u8, minute as u8, second as u8).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_utc())
}

/// Parse the value of an `Expires` attribute.
///
/// Returns `None` when the string does not contain a usable date; callers
/// treat that as if the attribute were absent.
pub fn parse_cookie_time(input: &str) -> Option<OffsetDateTime> {
    assemble(&tokenize(input))
}
