use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::schedule::WeeklySchedule;

/// Lookahead window for flagging a shop as about to open.
pub const PREWARN_MINUTES: u16 = 30;

/// Moment-in-time availability of a shop with known opening hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Open,
    OpeningSoon,
    Closed,
}

impl Availability {
    pub const fn label(self) -> &'static str {
        match self {
            Availability::Open => "OPEN",
            Availability::OpeningSoon => "OPENING_SOON",
            Availability::Closed => "CLOSED",
        }
    }
}

/// Resolve availability against today's slots.
///
/// Slots are walked in the order they were supplied, not re-sorted: the first
/// slot containing `now` wins, otherwise the first slot opening within
/// `prewarn_minutes` wins. With a split shift this reports `OpeningSoon` for
/// the afternoon slot even while the lunch gap is in effect, which is exactly
/// how the directory has always behaved.
pub fn resolve(
    schedule: &WeeklySchedule,
    now: NaiveDateTime,
    prewarn_minutes: u16,
) -> Availability {
    let today = schedule.day(now.weekday());
    if today.is_effectively_closed() {
        return Availability::Closed;
    }

    let minute = minute_of_day(now);
    for slot in &today.slots {
        if slot.contains(minute) {
            return Availability::Open;
        }
        if let Some(lead) = slot.minutes_until_open(minute) {
            if lead <= prewarn_minutes {
                return Availability::OpeningSoon;
            }
        }
    }

    Availability::Closed
}

/// Resolver entry point with the standard 30-minute prewarn window.
pub fn resolve_availability(schedule: &WeeklySchedule, now: NaiveDateTime) -> Availability {
    resolve(schedule, now, PREWARN_MINUTES)
}

fn minute_of_day(now: NaiveDateTime) -> u16 {
    (now.hour() * 60 + now.minute()) as u16
}
