//! Ramadan Times Library
//!
//! Suhoor/Iftar countdowns, fasting status and a Ramadan calendar built on
//! top of the Aladhan prayer-times API, with user-adjustable Hijri dates.

pub mod api;
pub mod calendar;
pub mod config;
pub mod fasting;
pub mod format;
pub mod hijri;
pub mod summary;
pub mod traits;

// Re-export commonly used types
pub use api::{AladhanClient, DayData, Location, PrayerTimings};
pub use calendar::{RamadanDay, build_ramadan_calendar, calendar_subtitle, ramadan_hijri_year};
pub use config::AppConfig;
pub use fasting::{
    Countdown, FastingStatus, TimeOfDay, TimeParseError, days_until_ramadan_estimate,
    fasting_status, menu_bar_title, status_message, time_remaining, time_remaining_next_day,
};
pub use format::{HourCycle, TimeFormat, format_time};
pub use hijri::{HijriDate, adjust_hijri_date, days_in_month, hijri_month_name};
pub use summary::{FastingProgress, MealCountdown, StatusSummary};
pub use traits::{Clock, MockClock, SystemClock, TimingsProvider};
