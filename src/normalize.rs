// src/normalize.rs
//! Turns the raw strings an extraction strategy found into a typed
//! [`Observation`].
//!
//! - prices: `"139.9¢"`, `"139.9Â¢"`, `" 139.9 "` → `139.9`
//! - dates: `"… on July 21, 2025 …"` → `2025-07-21`
//! - no date at all → the day after the run (the page's "tomorrow" panel)

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Month, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

use crate::config::consts::{CENT_SIGN, CENT_SIGN_MOJIBAKE};
use crate::error::ScrapeError;
use crate::extract::ExtractionResult;
use crate::store::Observation;

// Loose on purpose: anything shaped like "on <word> <n>, <yyyy>" is treated
// as a date phrase, so a bad month/day is reported instead of ignored.
static DATE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bon\s+([a-z]+)\.?\s+(\d{1,2}),\s*(\d{4})\b").expect("date phrase regex")
});

pub fn parse_price(text: &str) -> Result<Decimal, ScrapeError> {
    let t = text.trim();
    let t = t
        .strip_suffix(CENT_SIGN_MOJIBAKE)
        .or_else(|| t.strip_suffix(CENT_SIGN))
        .unwrap_or(t)
        .trim();

    let digits = t.chars().filter(char::is_ascii_digit).count();
    let dots = t.chars().filter(|&c| c == '.').count();
    if digits == 0 || dots > 1 || digits + dots != t.chars().count() {
        return Err(ScrapeError::MalformedPrice(s!(text)));
    }
    Decimal::from_str(t).map_err(|_| ScrapeError::MalformedPrice(s!(text)))
}

/// The first `on <Month> <Day>, <Year>`-shaped phrase in `text`.
pub fn find_date_phrase(text: &str) -> Option<&str> {
    DATE_PHRASE.find(text).map(|m| m.as_str())
}

/// `Ok(None)` when the text carries no date phrase at all; the caller then
/// falls back to [`tomorrow`].
pub fn parse_date(text: &str) -> Result<Option<NaiveDate>, ScrapeError> {
    let Some(caps) = DATE_PHRASE.captures(text) else {
        return Ok(None);
    };
    let malformed = || ScrapeError::MalformedDate(s!(&caps[0]));

    let month = Month::from_str(&caps[1]).map_err(|_| malformed())?;
    let day: u32 = caps[2].parse().map_err(|_| malformed())?;
    let year: i32 = caps[3].parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month.number_from_month(), day)
        .map(Some)
        .ok_or_else(malformed)
}

/// Default date for a price with no date of its own: the calendar day after
/// `now` (local time of the run).
pub fn tomorrow(now: NaiveDateTime) -> NaiveDate {
    now.date().succ_opt().unwrap_or(NaiveDate::MAX)
}

/// Validate an extraction into an observation. Nothing is guessed: a bad
/// price or a bad date fails the whole observation.
pub fn observation(result: &ExtractionResult, now: NaiveDateTime) -> Result<Observation, ScrapeError> {
    let price = parse_price(&result.raw_price_text)?;
    let date = match &result.raw_date_text {
        Some(raw) => parse_date(raw)?.ok_or_else(|| ScrapeError::MalformedDate(raw.clone()))?,
        None => tomorrow(now),
    };
    Ok(Observation { date, price })
}
