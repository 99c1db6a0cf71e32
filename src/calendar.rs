use chrono::{DateTime, Datelike, Days, NaiveTime, TimeDelta, TimeZone};
use log::{debug, trace};
use std::fmt;

use crate::config::{CalendarConfig, DAYS_PER_WEEK, ScheduleConfig};
use crate::error::{CalendarError, CalendarResult};

const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;

/// Due-date calculator over a fixed work week.
///
/// Holds only the validated schedule, so one instance can serve any number
/// of calculations, including from several threads at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    config: ScheduleConfig,
}

impl Calendar {
    pub fn new(config: CalendarConfig) -> CalendarResult<Self> {
        let config = ScheduleConfig::build(config)?;
        debug!("work calendar ready: {config}");
        Ok(Self::from_schedule(config))
    }

    pub fn from_schedule(config: ScheduleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Adds `turnaround_hours` work hours to `submit_at`.
    ///
    /// Only time inside the work window of a workday is counted. The result
    /// stays in the time zone of `submit_at`.
    pub fn calculate_due_date<Tz>(
        &self,
        submit_at: DateTime<Tz>,
        turnaround_hours: f64,
    ) -> CalendarResult<DateTime<Tz>>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let turnaround = hours_to_duration(turnaround_hours)?;
        self.due_date_after(submit_at, turnaround)
    }

    pub fn due_date_after<Tz>(
        &self,
        submit_at: DateTime<Tz>,
        turnaround: TimeDelta,
    ) -> CalendarResult<DateTime<Tz>>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if turnaround < TimeDelta::zero() {
            return Err(CalendarError::InvalidTurnaround {
                hours: turnaround.num_milliseconds() as f64 / 3_600_000.0,
            });
        }
        self.validate_submit_time(&submit_at)?;
        if turnaround.is_zero() {
            return Ok(submit_at);
        }

        let due = WorkInstant::new(submit_at, turnaround)
            .append_weeks(&self.config)?
            .append_workdays(&self.config)?
            .append_today(&self.config)?;
        Ok(due.time)
    }

    pub fn due_date_fn<Tz>(&self) -> impl Fn(DateTime<Tz>, f64) -> CalendarResult<DateTime<Tz>> + '_
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        move |submit_at, turnaround_hours| self.calculate_due_date(submit_at, turnaround_hours)
    }

    /// Checks that `submit_at` lies on a workday and inside that day's work
    /// window, both ends included.
    pub fn validate_submit_time<Tz>(&self, submit_at: &DateTime<Tz>) -> CalendarResult<()>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let config = &self.config;
        if !config.is_workday(submit_at.weekday()) {
            return Err(CalendarError::InvalidSubmitTime {
                submitted: config.format_time(submit_at),
                valid_from: config.first_workday().to_string(),
                valid_to: config.last_workday().to_string(),
            });
        }

        let today_begins = day_time(submit_at, config.work_begins())?;
        let today_ends = day_time(submit_at, config.work_ends())?;
        if *submit_at < today_begins || *submit_at > today_ends {
            return Err(CalendarError::InvalidSubmitTime {
                submitted: config.format_time(submit_at),
                valid_from: config.format_time(&today_begins),
                valid_to: config.format_time(&today_ends),
            });
        }

        Ok(())
    }
}

pub fn hours_to_duration(hours: f64) -> CalendarResult<TimeDelta> {
    let nanos = (hours * NANOS_PER_HOUR).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos >= i64::MAX as f64 {
        return Err(CalendarError::InvalidTurnaround { hours });
    }
    Ok(TimeDelta::nanoseconds(nanos as i64))
}

/// The instant `from_midnight` after local midnight of `at`'s calendar day,
/// in `at`'s own time zone.
pub(crate) fn day_time<Tz: TimeZone>(
    at: &DateTime<Tz>,
    from_midnight: TimeDelta,
) -> CalendarResult<DateTime<Tz>> {
    let local_midnight = at.date_naive().and_time(NaiveTime::MIN);
    // Midnight may not exist locally (DST gap); step back by the elapsed wall-clock time instead.
    let midnight = at
        .timezone()
        .from_local_datetime(&local_midnight)
        .earliest()
        .or_else(|| at.clone().checked_sub_signed(at.time() - NaiveTime::MIN))
        .ok_or(CalendarError::OutOfRange)?;
    midnight
        .checked_add_signed(from_midnight)
        .ok_or(CalendarError::OutOfRange)
}

fn add_days<Tz: TimeZone>(time: DateTime<Tz>, days: u64) -> CalendarResult<DateTime<Tz>> {
    // Ambiguous or skipped local times have no calendar-day answer; use 24h days there.
    time.clone()
        .checked_add_days(Days::new(days))
        .or_else(|| {
            let days = i64::try_from(days).ok()?;
            time.checked_add_signed(TimeDelta::try_days(days)?)
        })
        .ok_or(CalendarError::OutOfRange)
}

fn total_nanos(duration: TimeDelta) -> i128 {
    i128::from(duration.num_seconds()) * 1_000_000_000 + i128::from(duration.subsec_nanos())
}

#[derive(Debug)]
struct WorkInstant<Tz: TimeZone> {
    time: DateTime<Tz>,
    remaining: TimeDelta,
}

impl<Tz: TimeZone> WorkInstant<Tz> {
    fn new(time: DateTime<Tz>, remaining: TimeDelta) -> Self {
        Self { time, remaining }
    }

    fn append_weeks(mut self, config: &ScheduleConfig) -> CalendarResult<Self> {
        if self.remaining.is_zero() {
            return Ok(self);
        }

        let week = config.week_work_duration();
        let weeks = total_nanos(self.remaining) / total_nanos(week);
        if weeks > 0 {
            let weeks = i32::try_from(weeks).map_err(|_| CalendarError::OutOfRange)?;
            let consumed = week.checked_mul(weeks).ok_or(CalendarError::OutOfRange)?;
            self.time = add_days(self.time, weeks as u64 * u64::from(DAYS_PER_WEEK))?;
            self.remaining -= consumed;
        }

        trace!(
            "after {weeks} week(s): {:?}, remaining {}",
            self.time, self.remaining
        );
        Ok(self)
    }

    /// Consumes one daily work duration per workday, crossing the
    /// non-working days after the last workday of the week.
    fn append_workdays(mut self, config: &ScheduleConfig) -> CalendarResult<Self> {
        if self.remaining.is_zero() {
            return Ok(self);
        }

        let daily = config.daily_work_duration();
        let weekend_jump = u64::from(DAYS_PER_WEEK - config.workdays_in_week() + 1);
        while self.remaining >= daily {
            let days = if self.time.weekday() == config.last_workday() {
                weekend_jump
            } else {
                1
            };
            self.time = add_days(self.time, days)?;
            self.remaining -= daily;
        }

        trace!(
            "after workdays: {:?}, remaining {}",
            self.time, self.remaining
        );
        Ok(self)
    }

    /// Adds the leftover, which is shorter than a workday.
    ///
    /// When it does not fit before today's work end (landing exactly on the
    /// end counts as not fitting), one more workday is crossed and the
    /// leftover is taken back from that day's end, i.e. counted from its start.
    fn append_today(mut self, config: &ScheduleConfig) -> CalendarResult<Self>
    where
        Tz::Offset: fmt::Display,
    {
        let today_ends = day_time(&self.time, config.work_ends())?;
        let max_today = today_ends - self.time.clone();
        if self.remaining >= max_today {
            let daily = config.daily_work_duration();
            self.remaining += daily;
            self = self.append_workdays(config)?;
            self.remaining -= daily;
        }

        let due = self
            .time
            .clone()
            .checked_add_signed(self.remaining)
            .ok_or(CalendarError::OutOfRange)?;
        // Wall-clock comparison, so a DST change on the due day does not shift the bound.
        let work_ends = due.date_naive().and_time(NaiveTime::MIN) + config.work_ends();
        if due.naive_local() > work_ends {
            return Err(CalendarError::WorkWindowOverrun {
                due: config.format_time(&due),
                work_ends: work_ends.to_string(),
            });
        }
        self.time = due;
        self.remaining = TimeDelta::zero();

        trace!("due at {:?}", self.time);
        Ok(self)
    }
}
