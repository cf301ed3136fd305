//! Raw attribute text to typed field values
//!
//! Values are taken as the player renders them; nothing is clamped or
//! validated beyond what the target type can hold.

use crate::field::{LikeStatus, LoopType};

/// Leading-integer parse: optional surrounding whitespace and sign, then
/// ASCII digits; anything after the digits is ignored.
///
/// ```rust
/// use ytm_state::decoder::parse_leading_int;
///
/// assert_eq!(parse_leading_int("55"), Some(55));
/// assert_eq!(parse_leading_int(" 12.7s"), Some(12));
/// assert_eq!(parse_leading_int("-3"), Some(-3));
/// assert_eq!(parse_leading_int("abc"), None);
/// ```
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Volume slider value
pub fn decode_volume(raw: Option<&str>) -> Option<u8> {
    raw.and_then(parse_leading_int)
        .and_then(|v| u8::try_from(v).ok())
}

/// Duration or position in whole seconds
pub fn decode_seconds(raw: Option<&str>) -> Option<u32> {
    raw.and_then(parse_leading_int)
        .and_then(|v| u32::try_from(v).ok())
}

pub fn decode_loop_type(raw: Option<&str>) -> Option<LoopType> {
    raw.map(LoopType::from)
}

pub fn decode_like_status(raw: Option<&str>) -> Option<LikeStatus> {
    raw.map(LikeStatus::from)
}

/// Media element pause flag; media elements start out paused
pub fn decode_paused(raw: Option<&str>) -> bool {
    !matches!(raw, Some("false"))
}
