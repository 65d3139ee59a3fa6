//! Relative time expressions.
//!
//! Grammar: `(now | beginning | <date-literal>) [ (+|-) <digits> <unit> ]`
//! with units s, m, h, d, w, M. Expressions bound time-series queries, e.g.
//! `now-2h` or `beginning+1w`.
//!
//! # Design Decisions
//! - Hand-parsed in one pass, no regex in the hot path
//! - Resolution is pure and total: anything outside the grammar resolves to
//!   the current instant instead of erroring, and the fallback is counted
//!   and logged so client mistakes stay visible
//! - Months are fixed 30-day periods, not calendar months

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::clock::Clock;

/// Milliseconds per unit letter. `M` approximates a month as 30 days.
fn unit_millis(unit: char) -> Option<i64> {
    match unit {
        's' => Some(1_000),
        'm' => Some(60 * 1_000),
        'h' => Some(60 * 60 * 1_000),
        'd' => Some(24 * 60 * 60 * 1_000),
        'w' => Some(7 * 24 * 60 * 60 * 1_000),
        'M' => Some(30 * 24 * 60 * 60 * 1_000),
        _ => None,
    }
}

/// Resolve `expression` to an absolute instant.
///
/// `beginning` supplies the instant the word `beginning` stands for, the
/// start of recorded history for whatever collection is being queried.
pub fn resolve<B>(expression: &str, clock: &dyn Clock, beginning: B) -> DateTime<Utc>
where
    B: Fn() -> DateTime<Utc>,
{
    match parse(expression, clock, &beginning) {
        Some(instant) => instant,
        None => {
            metrics::counter!("time_expression_fallback_total").increment(1);
            tracing::debug!(expression, "unparseable time expression, resolving to now");
            clock.now()
        }
    }
}

fn parse<B>(expression: &str, clock: &dyn Clock, beginning: &B) -> Option<DateTime<Utc>>
where
    B: Fn() -> DateTime<Utc>,
{
    let (base, delta) = split_delta(expression);
    let instant = match base {
        "now" => clock.now(),
        "beginning" => beginning(),
        literal => parse_literal(literal)?,
    };
    match delta {
        Some((sign, amount, unit)) => {
            let millis = sign * amount * unit_millis(unit)?;
            Some(instant + Duration::milliseconds(millis))
        }
        None => Some(instant),
    }
}

/// Split a trailing `[+-]<digits><unit>` delta off the expression.
///
/// The base may itself contain `-` (date literals), so the delta is
/// recognized from the end: a unit letter preceded by at least one digit
/// preceded by a sign.
fn split_delta(expression: &str) -> (&str, Option<(i64, i64, char)>) {
    let bytes = expression.as_bytes();
    let Some(&last) = bytes.last() else {
        return (expression, None);
    };
    let unit = last as char;
    if unit_millis(unit).is_none() {
        return (expression, None);
    }
    let digits_end = bytes.len() - 1;
    let digits_start = bytes[..digits_end]
        .iter()
        .rposition(|b| !b.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    if digits_start == digits_end || digits_start == 0 {
        return (expression, None);
    }
    let sign = match bytes[digits_start - 1] {
        b'+' => 1,
        b'-' => -1,
        _ => return (expression, None),
    };
    let amount: i64 = match expression[digits_start..digits_end].parse() {
        Ok(amount) => amount,
        Err(_) => return (expression, None),
    };
    (
        &expression[..digits_start - 1],
        Some((sign, amount, unit)),
    )
}

/// Parse an absolute date literal: RFC 3339, or a bare `YYYY-MM-DD`
/// resolved to midnight UTC.
fn parse_literal(literal: &str) -> Option<DateTime<Utc>> {
    if literal.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(literal) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(literal, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
