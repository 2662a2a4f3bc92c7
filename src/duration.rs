use crate::error::HubError;
use chrono::TimeDelta;
use regex::Regex;
use std::sync::LazyLock;

static DURATION_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)([wdhms])").expect("duration pattern is valid"));

/// Parses an age such as `5d`, `36h` or `2w3d`.
///
/// Blank input means "no bound" and yields `None`. Units are weeks, days,
/// hours, minutes and seconds; groups are summed.
pub fn parse_duration(input: &str) -> Result<Option<TimeDelta>, HubError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let invalid = || HubError::DurationParse(input.to_string());

    let mut total = TimeDelta::zero();
    let mut consumed = 0;
    for caps in DURATION_PART.captures_iter(input) {
        let whole = caps.get(0).ok_or_else(invalid)?;
        if whole.start() != consumed {
            return Err(invalid());
        }
        consumed = whole.end();

        let amount: i64 = caps[1].parse().map_err(|_| invalid())?;
        let part = match &caps[2] {
            "w" => TimeDelta::try_weeks(amount),
            "d" => TimeDelta::try_days(amount),
            "h" => TimeDelta::try_hours(amount),
            "m" => TimeDelta::try_minutes(amount),
            _ => TimeDelta::try_seconds(amount),
        }
        .ok_or_else(invalid)?;
        total = total.checked_add(&part).ok_or_else(invalid)?;
    }

    if consumed != input.len() {
        return Err(invalid());
    }

    Ok(Some(total))
}
