use anyhow::Result;
use chrono::NaiveDateTime;

use crate::api::DayData;
use crate::fasting::{
    Countdown, FastingStatus, TimeOfDay, days_until_ramadan_estimate, fasting_progress,
    fasting_status, menu_bar_title, time_remaining, time_remaining_next_day,
};
use crate::hijri::HijriDate;

// ==================== Meal Countdown ====================

/// Countdown to a single meal time (Suhoor or Iftar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealCountdown {
    pub time: TimeOfDay,
    /// Today's time has passed, the countdown targets tomorrow
    pub is_tomorrow: bool,
    pub countdown: Countdown,
}

impl MealCountdown {
    pub fn new(now: NaiveDateTime, time: TimeOfDay) -> Self {
        match time_remaining(now, time) {
            Some(countdown) => Self {
                time,
                is_tomorrow: false,
                countdown,
            },
            None => Self {
                time,
                is_tomorrow: true,
                countdown: time_remaining_next_day(now, time),
            },
        }
    }
}

// ==================== Status Summary ====================

/// Five-step indicator of how far through the fast we are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastingProgress {
    Empty,
    Quarter,
    Half,
    ThreeQuarters,
    Full,
}

impl FastingProgress {
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction < 0.125 {
            FastingProgress::Empty
        } else if fraction < 0.375 {
            FastingProgress::Quarter
        } else if fraction < 0.625 {
            FastingProgress::Half
        } else if fraction < 0.875 {
            FastingProgress::ThreeQuarters
        } else {
            FastingProgress::Full
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            FastingProgress::Empty => "○",
            FastingProgress::Quarter => "◔",
            FastingProgress::Half => "◑",
            FastingProgress::ThreeQuarters => "◕",
            FastingProgress::Full => "●",
        }
    }
}

/// Everything the status view needs for one day.
#[derive(Debug, Clone)]
pub struct StatusSummary {
    pub suhoor: TimeOfDay,
    pub iftar: TimeOfDay,
    /// Hijri date with the configured offset applied
    pub hijri: HijriDate,
    pub gregorian_readable: String,
    pub is_ramadan: bool,
    pub days_until_ramadan: Option<i64>,
}

impl StatusSummary {
    pub fn from_day(day: &DayData, offset: i32) -> Result<Self> {
        let hijri = day.date.hijri.to_hijri()?.adjusted(offset);
        let is_ramadan = hijri.is_ramadan();
        let days_until_ramadan = if is_ramadan {
            None
        } else {
            days_until_ramadan_estimate(hijri.month, hijri.day)
        };

        Ok(Self {
            suhoor: day.timings.suhoor()?,
            iftar: day.timings.iftar()?,
            hijri,
            gregorian_readable: day.date.readable.clone(),
            is_ramadan,
            days_until_ramadan,
        })
    }

    pub fn status(&self, now: NaiveDateTime) -> FastingStatus {
        fasting_status(now, self.suhoor, self.iftar)
    }

    /// Short title for a status bar.
    pub fn title(&self, now: NaiveDateTime) -> String {
        menu_bar_title(
            now,
            self.suhoor,
            self.iftar,
            self.is_ramadan,
            self.days_until_ramadan,
        )
    }

    /// Headline describing the fast, only shown during Ramadan.
    pub fn headline(&self, now: NaiveDateTime) -> Option<&'static str> {
        if !self.is_ramadan {
            return None;
        }
        Some(match self.status(now) {
            FastingStatus::BeforeSuhoor => "Suhoor time",
            FastingStatus::Fasting => "Currently fasting",
            FastingStatus::AfterIftar => "Fast complete",
        })
    }

    pub fn progress(&self, now: NaiveDateTime) -> FastingProgress {
        if !self.is_ramadan {
            return FastingProgress::Empty;
        }
        match self.status(now) {
            FastingStatus::BeforeSuhoor => FastingProgress::Empty,
            FastingStatus::AfterIftar => FastingProgress::Full,
            FastingStatus::Fasting => {
                FastingProgress::from_fraction(fasting_progress(now, self.suhoor, self.iftar))
            }
        }
    }

    pub fn hijri_label(&self) -> String {
        format!("{} AH", self.hijri)
    }
}
