use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeDelta, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CalendarError, CalendarResult};

pub const DAYS_PER_WEEK: u32 = 7;
pub const HOURS_PER_DAY: i64 = 24;

pub const FIRST_WORKDAY_DEFAULT: Weekday = Weekday::Mon;
pub const WORKDAYS_IN_WEEK_DEFAULT: i32 = 5;
pub const WORK_BEGINS_DEFAULT_HOURS: i64 = 9;
pub const WORK_ENDS_DEFAULT_HOURS: i64 = 17;
/// RFC 3339 profile, e.g. `2021-10-13T09:30:00+04:00`.
pub const TIME_FORMAT_DEFAULT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Unvalidated; see [`ScheduleConfig::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    pub first_workday: Weekday,
    pub workdays_in_week: i32,
    /// Offset from local midnight.
    #[serde(with = "hh_mm")]
    pub work_begins: TimeDelta,
    #[serde(with = "hh_mm")]
    pub work_ends: TimeDelta,
    pub time_format: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            first_workday: FIRST_WORKDAY_DEFAULT,
            workdays_in_week: WORKDAYS_IN_WEEK_DEFAULT,
            work_begins: TimeDelta::hours(WORK_BEGINS_DEFAULT_HOURS),
            work_ends: TimeDelta::hours(WORK_ENDS_DEFAULT_HOURS),
            time_format: TIME_FORMAT_DEFAULT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    first_workday: Weekday,
    last_workday: Weekday,
    workdays_in_week: u32,
    work_begins: TimeDelta,
    work_ends: TimeDelta,
    time_format: String,
    daily_work_duration: TimeDelta,
}

impl ScheduleConfig {
    pub fn build(config: CalendarConfig) -> CalendarResult<Self> {
        let first = i64::from(config.first_workday.num_days_from_sunday());
        let workdays = i64::from(config.workdays_in_week);
        if workdays < 1 || first + workdays > i64::from(DAYS_PER_WEEK) {
            return Err(CalendarError::InvalidWorkdays {
                first_workday: config.first_workday,
                workdays_in_week: config.workdays_in_week,
            });
        }

        let zero = TimeDelta::zero();
        let day = TimeDelta::hours(HOURS_PER_DAY);
        if config.work_begins < zero
            || config.work_begins >= day
            || config.work_ends <= zero
            || config.work_ends > day
            || config.work_begins >= config.work_ends
        {
            return Err(CalendarError::InvalidWorkTime {
                work_begins: format_offset(config.work_begins),
                work_ends: format_offset(config.work_ends),
            });
        }

        if !is_valid_time_format(&config.time_format) {
            return Err(CalendarError::InvalidTimeFormat {
                format: config.time_format,
            });
        }

        let workdays_in_week = config.workdays_in_week as u32;
        let mut last_workday = config.first_workday;
        for _ in 1..workdays_in_week {
            last_workday = last_workday.succ();
        }

        Ok(Self {
            first_workday: config.first_workday,
            last_workday,
            workdays_in_week,
            work_begins: config.work_begins,
            work_ends: config.work_ends,
            daily_work_duration: config.work_ends - config.work_begins,
            time_format: config.time_format,
        })
    }

    pub fn to_config(&self) -> CalendarConfig {
        CalendarConfig::from(self)
    }

    pub fn first_workday(&self) -> Weekday {
        self.first_workday
    }

    pub fn last_workday(&self) -> Weekday {
        self.last_workday
    }

    pub fn workdays_in_week(&self) -> u32 {
        self.workdays_in_week
    }

    pub fn work_begins(&self) -> TimeDelta {
        self.work_begins
    }

    pub fn work_ends(&self) -> TimeDelta {
        self.work_ends
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    pub fn daily_work_duration(&self) -> TimeDelta {
        self.daily_work_duration
    }

    pub fn week_work_duration(&self) -> TimeDelta {
        self.daily_work_duration * self.workdays_in_week as i32
    }

    pub fn is_workday(&self, day: Weekday) -> bool {
        let first = self.first_workday.num_days_from_sunday();
        let day = day.num_days_from_sunday();
        first <= day && day < first + self.workdays_in_week
    }

    pub fn format_time<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        at.format(&self.time_format).to_string()
    }
}

impl From<&ScheduleConfig> for CalendarConfig {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            first_workday: config.first_workday,
            workdays_in_week: config.workdays_in_week as i32,
            work_begins: config.work_begins,
            work_ends: config.work_ends,
            time_format: config.time_format.clone(),
        }
    }
}

impl fmt::Display for ScheduleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}, {} - {}",
            self.first_workday,
            self.last_workday,
            format_offset(self.work_begins),
            format_offset(self.work_ends)
        )
    }
}

fn is_valid_time_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

pub fn format_offset(offset: TimeDelta) -> String {
    let sign = if offset < TimeDelta::zero() { "-" } else { "" };
    let total = offset.num_seconds().abs();
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);
    if seconds == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

// Hours are not capped here; out-of-range values are reported by validation.
pub fn parse_offset(value: &str) -> Option<TimeDelta> {
    let trimmed = value.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut parts = rest.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = match parts.next() {
        Some(raw) => raw.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some()
        || hours < 0
        || !(0..60).contains(&minutes)
        || !(0..60).contains(&seconds)
    {
        return None;
    }

    let offset = TimeDelta::try_hours(hours)?
        .checked_add(&TimeDelta::minutes(minutes))?
        .checked_add(&TimeDelta::seconds(seconds))?;
    Some(if negative { -offset } else { offset })
}

pub mod hh_mm {
    use chrono::TimeDelta;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(offset: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_offset(*offset))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_offset(&raw).ok_or_else(|| {
            D::Error::custom(format!(
                "invalid time of day '{raw}', expected HH:MM or HH:MM:SS"
            ))
        })
    }
}
