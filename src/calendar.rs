//! Ramadan calendar assembly.
//!
//! The API's Hijri-month endpoint reports Ramadan using its own moon
//! sighting. A configured day offset moves the start of the month; days the
//! bulk response does not cover are fetched one by one.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};

use crate::api::{DayData, PrayerTimings};
use crate::fasting::TimeOfDay;
use crate::format::format_gregorian;
use crate::hijri::{HijriDate, RAMADAN_MONTH};
use crate::traits::TimingsProvider;

/// One row of the Ramadan calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamadanDay {
    pub day_number: u32,
    pub gregorian_date: NaiveDate,
    pub hijri_label: String,
    pub suhoor: TimeOfDay,
    pub iftar: TimeOfDay,
    pub is_today: bool,
}

impl RamadanDay {
    pub fn gregorian_label(&self) -> String {
        format_gregorian(self.gregorian_date)
    }
}

/// Hijri year of the current or next Ramadan.
///
/// `current` should already carry the configured offset.
pub fn ramadan_hijri_year(current: &HijriDate) -> i32 {
    if current.month > RAMADAN_MONTH {
        current.year + 1
    } else {
        current.year
    }
}

/// First Gregorian day of Ramadan after applying the Hijri offset.
///
/// A negative offset means local sighting lags the API, so Ramadan starts
/// later; a positive offset moves it earlier.
pub fn adjusted_start(api_start: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let shift = Days::new(u64::from(offset.unsigned_abs()));
    if offset < 0 {
        api_start.checked_add_days(shift)
    } else {
        api_start.checked_sub_days(shift)
    }
}

/// Build the Ramadan calendar rows from the API's Hijri-month response.
pub async fn build_ramadan_calendar<P: TimingsProvider>(
    provider: &P,
    entries: &[DayData],
    hijri_year: i32,
    offset: i32,
    today: NaiveDate,
) -> Result<Vec<RamadanDay>> {
    let first = entries
        .first()
        .context("Prayer times API returned an empty Ramadan calendar")?;

    let mut timings_by_date: HashMap<NaiveDate, &PrayerTimings> = HashMap::new();
    for entry in entries {
        timings_by_date.insert(entry.date.gregorian.to_naive()?, &entry.timings);
    }

    let api_start = first.date.gregorian.to_naive()?;
    let start = adjusted_start(api_start, offset).context("Ramadan start is out of range")?;
    tracing::debug!(
        "Ramadan {} starts {} (API: {}, offset {})",
        hijri_year,
        start,
        api_start,
        offset
    );

    let mut days = Vec::with_capacity(entries.len());
    for i in 0..entries.len() {
        let date = start
            .checked_add_days(Days::new(i as u64))
            .context("Ramadan day is out of range")?;

        let (suhoor, iftar) = match timings_by_date.get(&date) {
            Some(timings) => (timings.suhoor()?, timings.iftar()?),
            None => {
                tracing::debug!("No bulk timings for {}, fetching individually", date);
                let timings = provider
                    .timings_on(date)
                    .await
                    .with_context(|| format!("Failed to fetch timings for {}", date))?;
                (timings.suhoor()?, timings.iftar()?)
            }
        };

        let day_number = i as u32 + 1;
        days.push(RamadanDay {
            day_number,
            gregorian_date: date,
            hijri_label: format!("{} Ramadan {}", day_number, hijri_year),
            suhoor,
            iftar,
            is_today: date == today,
        });
    }

    Ok(days)
}

/// Short caption for the calendar: today's Ramadan date when inside it.
pub fn calendar_subtitle(days: &[RamadanDay], hijri_year: i32) -> String {
    match days.iter().find(|d| d.is_today) {
        Some(today) => format!("{} AH", today.hijri_label),
        None => format!("Ramadan {} AH", hijri_year),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Datelike;

    use super::*;

    struct RecordingProvider {
        requested: Mutex<Vec<NaiveDate>>,
    }

    impl RecordingProvider {
        fn new() -> Self {
            Self {
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl TimingsProvider for RecordingProvider {
        async fn timings_on(&self, date: NaiveDate) -> Result<PrayerTimings> {
            self.requested.lock().unwrap().push(date);
            Ok(timings("04:50", "18:30"))
        }
    }

    struct FailingProvider;

    impl TimingsProvider for FailingProvider {
        async fn timings_on(&self, _date: NaiveDate) -> Result<PrayerTimings> {
            anyhow::bail!("API request failed (503 Service Unavailable)")
        }
    }

    fn timings(fajr: &str, maghrib: &str) -> PrayerTimings {
        serde_json::from_value(serde_json::json!({
            "Fajr": fajr,
            "Maghrib": maghrib,
        }))
        .unwrap()
    }

    fn entry(date: NaiveDate, fajr: &str, maghrib: &str) -> DayData {
        serde_json::from_value(serde_json::json!({
            "timings": {"Fajr": fajr, "Maghrib": maghrib},
            "date": {
                "readable": date.format("%d %b %Y").to_string(),
                "hijri": {
                    "day": "1",
                    "month": {"number": 9, "en": "Ramaḍān"},
                    "year": "1447"
                },
                "gregorian": {
                    "day": date.format("%d").to_string(),
                    "month": {"number": date.month()},
                    "year": date.format("%Y").to_string()
                }
            },
            "meta": {"method": {"id": 2}}
        }))
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn three_days() -> Vec<DayData> {
        vec![
            entry(date(2026, 2, 18), "05:20 (PKT)", "18:00 (PKT)"),
            entry(date(2026, 2, 19), "05:19 (PKT)", "18:01 (PKT)"),
            entry(date(2026, 2, 20), "05:18 (PKT)", "18:02 (PKT)"),
        ]
    }

    // ==================== Ramadan Year Tests ====================

    #[test]
    fn test_ramadan_year_before_ramadan() {
        assert_eq!(ramadan_hijri_year(&HijriDate::new(10, 8, 1447)), 1447);
    }

    #[test]
    fn test_ramadan_year_during_ramadan() {
        assert_eq!(ramadan_hijri_year(&HijriDate::new(10, 9, 1447)), 1447);
    }

    #[test]
    fn test_ramadan_year_after_ramadan() {
        assert_eq!(ramadan_hijri_year(&HijriDate::new(1, 10, 1447)), 1448);
    }

    // ==================== Start Adjustment Tests ====================

    #[test]
    fn test_adjusted_start() {
        let start = date(2026, 2, 18);
        assert_eq!(adjusted_start(start, 0), Some(start));
        assert_eq!(adjusted_start(start, -1), Some(date(2026, 2, 19)));
        assert_eq!(adjusted_start(start, 1), Some(date(2026, 2, 17)));
    }

    #[test]
    fn test_adjusted_start_crosses_month() {
        assert_eq!(adjusted_start(date(2026, 2, 28), -2), Some(date(2026, 3, 2)));
    }

    // ==================== Calendar Building Tests ====================

    #[tokio::test]
    async fn test_calendar_without_offset_uses_bulk_timings() {
        let provider = RecordingProvider::new();
        let days = build_ramadan_calendar(&provider, &three_days(), 1447, 0, date(2026, 2, 19))
            .await
            .unwrap();

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day_number, 1);
        assert_eq!(days[0].gregorian_date, date(2026, 2, 18));
        assert_eq!(days[0].hijri_label, "1 Ramadan 1447");
        assert_eq!(days[0].suhoor, TimeOfDay::from_hm(5, 20).unwrap());
        assert_eq!(days[2].iftar, TimeOfDay::from_hm(18, 2).unwrap());
        assert!(days[1].is_today);
        assert!(!days[0].is_today);
        assert!(provider.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_calendar_negative_offset_starts_later_and_fetches_tail() {
        let provider = RecordingProvider::new();
        let days = build_ramadan_calendar(&provider, &three_days(), 1447, -1, date(2026, 3, 1))
            .await
            .unwrap();

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].gregorian_date, date(2026, 2, 19));
        assert_eq!(days[0].suhoor, TimeOfDay::from_hm(5, 19).unwrap());
        assert_eq!(days[2].gregorian_date, date(2026, 2, 21));
        assert_eq!(days[2].suhoor, TimeOfDay::from_hm(4, 50).unwrap());
        assert_eq!(*provider.requested.lock().unwrap(), vec![date(2026, 2, 21)]);
    }

    #[tokio::test]
    async fn test_calendar_positive_offset_starts_earlier() {
        let provider = RecordingProvider::new();
        let days = build_ramadan_calendar(&provider, &three_days(), 1447, 1, date(2026, 3, 1))
            .await
            .unwrap();

        assert_eq!(days[0].gregorian_date, date(2026, 2, 17));
        assert_eq!(days[1].suhoor, TimeOfDay::from_hm(5, 20).unwrap());
        assert_eq!(*provider.requested.lock().unwrap(), vec![date(2026, 2, 17)]);
    }

    #[tokio::test]
    async fn test_calendar_empty_response_is_error() {
        let provider = RecordingProvider::new();
        let result = build_ramadan_calendar(&provider, &[], 1447, 0, date(2026, 3, 1)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_calendar_propagates_provider_errors() {
        let result =
            build_ramadan_calendar(&FailingProvider, &three_days(), 1447, -1, date(2026, 3, 1))
                .await;
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("2026-02-21"));
    }

    // ==================== Subtitle Tests ====================

    #[tokio::test]
    async fn test_subtitle_for_today() {
        let provider = RecordingProvider::new();
        let days = build_ramadan_calendar(&provider, &three_days(), 1447, 0, date(2026, 2, 20))
            .await
            .unwrap();
        assert_eq!(calendar_subtitle(&days, 1447), "3 Ramadan 1447 AH");
    }

    #[test]
    fn test_subtitle_outside_ramadan() {
        assert_eq!(calendar_subtitle(&[], 1448), "Ramadan 1448 AH");
    }
}
