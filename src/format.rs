use std::process::Command;

use chrono::{NaiveDate, Timelike};
use serde::Deserialize;

use crate::fasting::TimeOfDay;

/// Configured preference for how times are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TimeFormat {
    /// Follow the operating system setting
    #[default]
    #[serde(rename = "system")]
    System,
    #[serde(rename = "12hr")]
    TwelveHour,
    #[serde(rename = "24hr")]
    TwentyFourHour,
}

impl TimeFormat {
    /// Resolve to a concrete hour cycle.
    pub fn hour_cycle(self, system_uses_24_hour: bool) -> HourCycle {
        match self {
            TimeFormat::TwelveHour => HourCycle::H12,
            TimeFormat::TwentyFourHour => HourCycle::H24,
            TimeFormat::System if system_uses_24_hour => HourCycle::H24,
            TimeFormat::System => HourCycle::H12,
        }
    }
}

impl std::str::FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "system" => Ok(TimeFormat::System),
            "12hr" => Ok(TimeFormat::TwelveHour),
            "24hr" => Ok(TimeFormat::TwentyFourHour),
            other => Err(format!(
                "unknown time format '{}' (expected system, 12hr or 24hr)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourCycle {
    H12,
    H24,
}

/// Strip a trailing timezone annotation such as `" (PKT)"` from an API time.
pub fn clean_time(raw: &str) -> &str {
    match (raw.find('('), raw.rfind(')')) {
        (Some(open), Some(close)) if open < close && raw[close + 1..].trim().is_empty() => {
            raw[..open].trim()
        }
        _ => raw.trim(),
    }
}

/// Render a time of day for display.
pub fn format_time(time: TimeOfDay, cycle: HourCycle) -> String {
    let t = time.time();
    let (hour, minute) = (t.hour(), t.minute());
    match cycle {
        HourCycle::H24 => format!("{:02}:{:02}", hour, minute),
        HourCycle::H12 => {
            let period = if hour >= 12 { "PM" } else { "AM" };
            let hour12 = match hour {
                0 => 12,
                h if h > 12 => h - 12,
                h => h,
            };
            format!("{}:{:02} {}", hour12, minute, period)
        }
    }
}

/// Date in the `DD-MM-YYYY` form the Aladhan API expects.
pub fn format_api_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Date for display, e.g. `"Fri, 27 Feb 2026"`.
pub fn format_gregorian(date: NaiveDate) -> String {
    date.format("%a, %d %b %Y").to_string()
}

/// Whether the operating system is set to 24-hour time.
///
/// Only macOS exposes a readable setting; anything else reports `false`.
pub fn detect_system_24_hour() -> bool {
    if !cfg!(target_os = "macos") {
        return false;
    }

    match Command::new("defaults")
        .args(["read", "NSGlobalDomain", "AppleICUForce24HourTime"])
        .output()
    {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim() == "1"
        }
        Ok(_) => false,
        Err(e) => {
            tracing::debug!("Could not read system time format: {}", e);
            false
        }
    }
}
