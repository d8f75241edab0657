use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MINUTES_PER_DAY: u16 = 1440;

/// Most shops in the directory keep a morning and an afternoon slot at most.
pub const MAX_SLOTS_PER_DAY: usize = 2;

/// Validation errors raised while building a weekly schedule, citing the
/// offending day so operators can correct the submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidScheduleError {
    #[error("{day}: cannot parse '{value}' as HH:MM")]
    UnparsableTime { day: Weekday, value: String },
    #[error("{day}: closing time must come after opening time")]
    EmptyRange { day: Weekday },
    #[error("{day}: a day carries at most two opening slots, got {count}")]
    TooManySlots { day: Weekday, count: usize },
    #[error("{day}: slots overlap or are not in increasing order")]
    OverlappingSlots { day: Weekday },
    #[error("{day}: a closed day cannot carry opening slots")]
    SlotsOnClosedDay { day: Weekday },
}

/// Opening slot expressed in minutes of the local day, closing bound exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub opens_at: u16,
    pub closes_at: u16,
}

impl TimeRange {
    pub fn contains(&self, minute: u16) -> bool {
        minute >= self.opens_at && minute < self.closes_at
    }

    /// Minutes until the slot opens, `None` once it has started.
    pub fn minutes_until_open(&self, minute: u16) -> Option<u16> {
        if minute < self.opens_at {
            Some(self.opens_at - minute)
        } else {
            None
        }
    }
}

/// One day of opening hours: either closed, or up to two ordered slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub closed: bool,
    pub slots: Vec<TimeRange>,
}

impl DaySchedule {
    pub fn closed_all_day() -> Self {
        Self {
            closed: true,
            slots: Vec::new(),
        }
    }

    /// A day flagged open but carrying no slots is a data-entry error and
    /// resolves as closed.
    pub fn is_effectively_closed(&self) -> bool {
        self.closed || self.slots.is_empty()
    }

    fn from_raw(day: Weekday, raw: &RawDaySchedule) -> Result<Self, InvalidScheduleError> {
        if raw.closed {
            if !raw.slots.is_empty() {
                return Err(InvalidScheduleError::SlotsOnClosedDay { day });
            }
            return Ok(Self::closed_all_day());
        }

        if raw.slots.len() > MAX_SLOTS_PER_DAY {
            return Err(InvalidScheduleError::TooManySlots {
                day,
                count: raw.slots.len(),
            });
        }

        let mut slots: Vec<TimeRange> = Vec::with_capacity(raw.slots.len());
        for raw_slot in &raw.slots {
            let opens_at = parse_minute(day, &raw_slot.opens_at)?;
            let closes_at = parse_minute(day, &raw_slot.closes_at)?;
            if closes_at <= opens_at {
                return Err(InvalidScheduleError::EmptyRange { day });
            }
            if let Some(previous) = slots.last() {
                if opens_at < previous.closes_at {
                    return Err(InvalidScheduleError::OverlappingSlots { day });
                }
            }
            slots.push(TimeRange { opens_at, closes_at });
        }

        Ok(Self {
            closed: false,
            slots,
        })
    }
}

/// Wire-format slot as the backend stores it ("HH:MM" bounds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTimeRange {
    pub opens_at: String,
    pub closes_at: String,
}

/// Wire-format day. A day missing from the payload defaults to open with no
/// slots, which the engine resolves as closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDaySchedule {
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub slots: Vec<RawTimeRange>,
}

/// Wire-format weekly schedule keyed by day name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWeeklySchedule {
    #[serde(default)]
    pub monday: RawDaySchedule,
    #[serde(default)]
    pub tuesday: RawDaySchedule,
    #[serde(default)]
    pub wednesday: RawDaySchedule,
    #[serde(default)]
    pub thursday: RawDaySchedule,
    #[serde(default)]
    pub friday: RawDaySchedule,
    #[serde(default)]
    pub saturday: RawDaySchedule,
    #[serde(default)]
    pub sunday: RawDaySchedule,
}

impl RawWeeklySchedule {
    fn day(&self, day: Weekday) -> &RawDaySchedule {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Validated weekly opening hours, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: Vec<DaySchedule>,
}

impl WeeklySchedule {
    /// Validate a wire-format schedule, failing on the first malformed day.
    pub fn from_raw(raw: &RawWeeklySchedule) -> Result<Self, InvalidScheduleError> {
        let mut days = Vec::with_capacity(WEEKDAYS.len());
        for day in WEEKDAYS {
            days.push(DaySchedule::from_raw(day, raw.day(day))?);
        }
        Ok(Self { days })
    }

    /// Defensive variant for community-submitted data: malformed hours
    /// collapse to an all-closed week instead of failing the whole record.
    pub fn from_raw_or_closed(raw: &RawWeeklySchedule) -> Self {
        match Self::from_raw(raw) {
            Ok(schedule) => schedule,
            Err(error) => {
                warn!(%error, "malformed opening hours, substituting closed schedule");
                Self::all_closed()
            }
        }
    }

    pub fn all_closed() -> Self {
        Self {
            days: WEEKDAYS.iter().map(|_| DaySchedule::closed_all_day()).collect(),
        }
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        &self.days[day.num_days_from_monday() as usize]
    }

    /// Render the week the way shop popups print it, one day per line.
    pub fn format_for_display(&self) -> String {
        let mut lines = Vec::with_capacity(WEEKDAYS.len());
        for day in WEEKDAYS {
            let schedule = self.day(day);
            if schedule.is_effectively_closed() {
                lines.push(format!("{day}: Closed"));
            } else {
                let slots = schedule
                    .slots
                    .iter()
                    .map(|slot| {
                        format!(
                            "{}-{}",
                            format_minute(slot.opens_at),
                            format_minute(slot.closes_at)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" / ");
                lines.push(format!("{day}: {slots}"));
            }
        }
        lines.join("\n")
    }
}

fn parse_minute(day: Weekday, value: &str) -> Result<u16, InvalidScheduleError> {
    let unparsable = || InvalidScheduleError::UnparsableTime {
        day,
        value: value.to_string(),
    };

    let (hours, minutes) = value.trim().split_once(':').ok_or_else(unparsable)?;
    let hours: u32 = hours.parse().map_err(|_| unparsable())?;
    let minutes: u32 = minutes.parse().map_err(|_| unparsable())?;
    if minutes >= 60 {
        return Err(unparsable());
    }

    let total = hours * 60 + minutes;
    if total > u32::from(MINUTES_PER_DAY) {
        return Err(unparsable());
    }
    Ok(total as u16)
}

fn format_minute(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}
