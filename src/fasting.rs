//! Fasting-day clock: status, countdowns and short titles.
//!
//! Every function takes the current local time as a parameter so the
//! results are deterministic. Suhoor and Iftar are naive times of day that
//! are placed on the calendar date of `now`.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::format::clean_time;
use crate::hijri::RAMADAN_MONTH;

/// Average Hijri month length used by the days-until-Ramadan estimate.
pub const AVERAGE_MONTH_DAYS: f64 = 29.5;

/// Error raised when a time-of-day string is not `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("empty time string")]
    Empty,
    #[error("invalid time {input:?}: expected HH:MM")]
    Invalid { input: String },
}

/// A naive 24-hour local time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse a raw API timing such as `"05:12 (PKT)"`.
    pub fn parse_api(raw: &str) -> Result<Self, TimeParseError> {
        clean_time(raw).parse()
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The concrete instant of this time on `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeParseError::Empty);
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| TimeParseError::Invalid {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Where `now` sits relative to today's fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastingStatus {
    /// Suhoor has not ended yet
    BeforeSuhoor,
    /// Between Suhoor and Iftar
    Fasting,
    /// Iftar has been reached
    AfterIftar,
}

impl FastingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FastingStatus::BeforeSuhoor => "before-suhoor",
            FastingStatus::Fasting => "fasting",
            FastingStatus::AfterIftar => "after-iftar",
        }
    }
}

impl fmt::Display for FastingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole minutes left until a target instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Countdown {
    pub total_minutes: i64,
}

impl Countdown {
    pub fn from_minutes(total_minutes: i64) -> Self {
        Self { total_minutes }
    }

    pub fn hours(&self) -> i64 {
        self.total_minutes / 60
    }

    pub fn minutes(&self) -> i64 {
        self.total_minutes % 60
    }

    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours() > 0 {
            write!(f, "{}h {}m", self.hours(), self.minutes())
        } else {
            write!(f, "{}m", self.minutes())
        }
    }
}

fn countdown_between(now: NaiveDateTime, target: NaiveDateTime) -> Countdown {
    // num_minutes truncates, which is a floor for the positive gaps used here
    Countdown::from_minutes((target - now).num_minutes())
}

/// Determine the fasting status at `now`.
///
/// Boundary instants belong to the later state: Suhoor itself counts as
/// fasting and Iftar itself counts as after Iftar.
pub fn fasting_status(now: NaiveDateTime, suhoor: TimeOfDay, iftar: TimeOfDay) -> FastingStatus {
    let today = now.date();
    if now < suhoor.on(today) {
        FastingStatus::BeforeSuhoor
    } else if now < iftar.on(today) {
        FastingStatus::Fasting
    } else {
        FastingStatus::AfterIftar
    }
}

/// Time left until `target` today, or `None` once it has passed.
pub fn time_remaining(now: NaiveDateTime, target: TimeOfDay) -> Option<Countdown> {
    let target = target.on(now.date());
    if target <= now {
        return None;
    }
    Some(countdown_between(now, target))
}

/// Time left until `target` on the following calendar day.
pub fn time_remaining_next_day(now: NaiveDateTime, target: TimeOfDay) -> Countdown {
    let tomorrow = now
        .date()
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX);
    countdown_between(now, target.on(tomorrow))
}

/// Fraction of the fast elapsed at `now`, clamped to `[0, 1]`.
pub fn fasting_progress(now: NaiveDateTime, suhoor: TimeOfDay, iftar: TimeOfDay) -> f64 {
    let today = now.date();
    let start = suhoor.on(today);
    let total = (iftar.on(today) - start).num_milliseconds();
    if total <= 0 {
        return 1.0;
    }
    let elapsed = (now - start).num_milliseconds();
    (elapsed as f64 / total as f64).clamp(0.0, 1.0)
}

/// Short label for a menu bar or prompt.
///
/// Outside Ramadan this is a day countdown when one is known. Returns an
/// empty string when nothing sensible can be shown.
pub fn menu_bar_title(
    now: NaiveDateTime,
    suhoor: TimeOfDay,
    iftar: TimeOfDay,
    is_ramadan: bool,
    days_until_ramadan: Option<i64>,
) -> String {
    if !is_ramadan {
        return match days_until_ramadan {
            Some(days) if days > 0 => format!("{}d to Ramadan", days),
            _ => String::new(),
        };
    }

    let target = match fasting_status(now, suhoor, iftar) {
        FastingStatus::BeforeSuhoor => suhoor,
        FastingStatus::Fasting => iftar,
        FastingStatus::AfterIftar => return String::new(),
    };
    time_remaining(now, target)
        .map(|countdown| countdown.text())
        .unwrap_or_default()
}

/// A friendly one-line description of the current fasting status.
pub fn status_message(now: NaiveDateTime, suhoor: TimeOfDay, iftar: TimeOfDay) -> String {
    match fasting_status(now, suhoor, iftar) {
        FastingStatus::BeforeSuhoor => match time_remaining(now, suhoor) {
            Some(remaining) => format!("Suhoor ends in {}", remaining),
            None => "Suhoor time has passed".to_string(),
        },
        FastingStatus::Fasting => match time_remaining(now, iftar) {
            Some(remaining) => format!("Fasting - Iftar in {}", remaining),
            None => "Iftar time reached!".to_string(),
        },
        FastingStatus::AfterIftar => "Iftar time has passed. Alhamdulillah!".to_string(),
    }
}

/// Rough number of days until the next 1 Ramadan.
///
/// Assumes the rest of the current month runs to day 30 and every month in
/// between lasts 29.5 days, so the result can be off by a day or two.
/// Returns `None` during Ramadan itself.
pub fn days_until_ramadan_estimate(hijri_month: u32, hijri_day: u32) -> Option<i64> {
    if hijri_month == RAMADAN_MONTH {
        return None;
    }

    let months_until = if hijri_month < RAMADAN_MONTH {
        RAMADAN_MONTH - hijri_month
    } else {
        12 - hijri_month + RAMADAN_MONTH
    };
    let days_left_in_month = 30.0 - f64::from(hijri_day);
    let estimate = days_left_in_month + f64::from(months_until - 1) * AVERAGE_MONTH_DAYS;
    Some(estimate.round() as i64)
}
