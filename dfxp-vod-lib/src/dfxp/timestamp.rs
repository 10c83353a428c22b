//! TTML time expression parser
//!
//! Two grammars, told apart by the character after the leading digits:
//!
//! ```text
//! clock time:  H+:MM:SS            00:01:02
//!              H+:MM:SS.fraction   00:01:02.5
//!              H+:MM:SS:frames     00:01:02:15   (30 fps)
//! offset time: N[.fraction]unit    1.5s  250ms  2m  1h  45f
//! ```
//!
//! Hours are not required to have two digits. Anything not matching exactly
//! (including trailing characters) fails as a whole.

use crate::types::Timestamp;

/// Fixed frame rate for `f` offsets and clock-time frame fields
pub const FRAME_RATE: i64 = 30;

/// Parse a time expression into milliseconds.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let s = value.as_bytes();

    let digits = leading_digits(s);
    if digits == 0 {
        return None;
    }
    let mut num = to_number(&s[..digits])?;
    let rest = &s[digits..];

    match rest.first() {
        Some(b':') => parse_clock_time(num, &rest[1..]),
        _ => {
            // offset time
            let mut den: i64 = 1;
            let mut rest = rest;
            if rest.first() == Some(&b'.') {
                let frac = leading_digits(&rest[1..]);
                if frac == 0 {
                    return None;
                }
                for &d in &rest[1..1 + frac] {
                    num = num.checked_mul(10)?.checked_add(i64::from(d - b'0'))?;
                    den = den.checked_mul(10)?;
                }
                rest = &rest[1 + frac..];
            }

            let (mul, unit_len) = match rest {
                [b'h', ..] => (3_600_000, 1),
                // ms must win over m
                [b'm', b's', ..] => (1, 2),
                [b'm', ..] => (60_000, 1),
                [b's', ..] => (1000, 1),
                [b'f', ..] => {
                    den = den.checked_mul(FRAME_RATE)?;
                    (1000, 1)
                }
                _ => return None,
            };
            if rest.len() != unit_len {
                return None;
            }

            Some(num.checked_mul(mul)? / den)
        }
    }
}

fn parse_clock_time(hours: i64, s: &[u8]) -> Option<Timestamp> {
    // MM:SS
    if s.len() < 5
        || !s[0].is_ascii_digit()
        || !s[1].is_ascii_digit()
        || s[2] != b':'
        || !s[3].is_ascii_digit()
        || !s[4].is_ascii_digit()
    {
        return None;
    }

    let minutes = i64::from((s[0] - b'0') * 10 + (s[1] - b'0'));
    let seconds = i64::from((s[3] - b'0') * 10 + (s[4] - b'0'));
    let mut num = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    let rest = &s[5..];

    match rest.first() {
        None => num.checked_mul(1000),
        Some(b'.') => {
            let frac = leading_digits(&rest[1..]);
            if frac == 0 || 1 + frac != rest.len() {
                return None;
            }
            let mut den: i64 = 1;
            for &d in &rest[1..] {
                num = num.checked_mul(10)?.checked_add(i64::from(d - b'0'))?;
                den = den.checked_mul(10)?;
            }
            Some(num.checked_mul(1000)? / den)
        }
        Some(b':') => {
            let frames_len = leading_digits(&rest[1..]);
            if frames_len == 0 || 1 + frames_len != rest.len() {
                return None;
            }
            let frames = to_number(&rest[1..])?;
            num.checked_mul(1000)?
                .checked_add(frames.checked_mul(1000)? / FRAME_RATE)
        }
        Some(_) => None,
    }
}

fn leading_digits(s: &[u8]) -> usize {
    s.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn to_number(digits: &[u8]) -> Option<i64> {
    digits.iter().try_fold(0i64, |acc, &d| {
        acc.checked_mul(10)?.checked_add(i64::from(d - b'0'))
    })
}
