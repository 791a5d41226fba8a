use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::NetworkConfig;
use crate::fasting::TimeOfDay;
use crate::format::format_api_date;
use crate::hijri::HijriDate;
use crate::traits::TimingsProvider;

// ==================== Response Models ====================

/// Envelope shared by every Aladhan endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub status: String,
    pub data: T,
}

/// Prayer timings for one day. Times may carry a timezone suffix.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PrayerTimings {
    #[serde(rename = "Fajr")]
    pub fajr: String,
    #[serde(rename = "Sunrise", default)]
    pub sunrise: String,
    #[serde(rename = "Dhuhr", default)]
    pub dhuhr: String,
    #[serde(rename = "Asr", default)]
    pub asr: String,
    #[serde(rename = "Sunset", default)]
    pub sunset: String,
    #[serde(rename = "Maghrib")]
    pub maghrib: String,
    #[serde(rename = "Isha", default)]
    pub isha: String,
    #[serde(rename = "Imsak", default)]
    pub imsak: String,
    #[serde(rename = "Midnight", default)]
    pub midnight: String,
}

impl PrayerTimings {
    /// Suhoor ends at Fajr.
    pub fn suhoor(&self) -> Result<TimeOfDay> {
        TimeOfDay::parse_api(&self.fajr).context("Invalid Fajr time from API")
    }

    /// Iftar is at Maghrib.
    pub fn iftar(&self) -> Result<TimeOfDay> {
        TimeOfDay::parse_api(&self.maghrib).context("Invalid Maghrib time from API")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HijriMonth {
    pub number: u32,
    pub en: String,
    #[serde(default)]
    pub ar: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHijriDate {
    #[serde(default)]
    pub date: String,
    pub day: String,
    pub month: HijriMonth,
    pub year: String,
    #[serde(default)]
    pub holidays: Vec<String>,
}

impl RawHijriDate {
    /// The unadjusted Hijri date as numbers.
    pub fn to_hijri(&self) -> Result<HijriDate> {
        let day = self
            .day
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid Hijri day '{}'", self.day))?;
        let year = self
            .year
            .trim()
            .parse::<i32>()
            .with_context(|| format!("Invalid Hijri year '{}'", self.year))?;
        Ok(HijriDate::new(day, self.month.number, year))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GregorianMonth {
    pub number: u32,
    #[serde(default)]
    pub en: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGregorianDate {
    #[serde(default)]
    pub date: String,
    pub day: String,
    pub month: GregorianMonth,
    pub year: String,
}

impl RawGregorianDate {
    pub fn to_naive(&self) -> Result<NaiveDate> {
        let day = self.day.trim().parse::<u32>().context("Invalid Gregorian day")?;
        let year = self.year.trim().parse::<i32>().context("Invalid Gregorian year")?;
        NaiveDate::from_ymd_opt(year, self.month.number, day).with_context(|| {
            format!(
                "Gregorian date {}-{}-{} does not exist",
                year, self.month.number, day
            )
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateInfo {
    pub readable: String,
    #[serde(default)]
    pub timestamp: String,
    pub hijri: RawHijriDate,
    pub gregorian: RawGregorianDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodInfo {
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub timezone: String,
    pub method: MethodInfo,
}

/// One day of prayer timings with its calendar dates.
#[derive(Debug, Clone, Deserialize)]
pub struct DayData {
    pub timings: PrayerTimings,
    pub date: DateInfo,
    pub meta: Meta,
}

#[derive(Debug, Deserialize)]
struct GregorianToHijri {
    hijri: RawHijriDate,
}

// ==================== Location ====================

/// City and country the timings are requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub country: String,
}

impl Location {
    /// Build a location from user input, normalizing both parts.
    pub fn new(city: &str, country: &str) -> Result<Self> {
        let city = normalize_location_value(city);
        let country = normalize_location_value(country);
        if city.is_empty() || country.is_empty() {
            anyhow::bail!("Please set both city and country in the configuration");
        }
        Ok(Self { city, country })
    }
}

/// Trim, keep only the part before the first comma and collapse whitespace.
pub fn normalize_location_value(value: &str) -> String {
    let head = value.split(',').next().unwrap_or_default();
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ==================== Client ====================

/// API client for the Aladhan prayer-times service.
#[derive(Clone, Debug)]
pub struct AladhanClient {
    client: reqwest::Client,
    base_url: String,
    location: Location,
    method: u32,
}

impl AladhanClient {
    /// Create a new API client with configurable timeouts.
    pub fn new(
        base_url: impl Into<String>,
        location: Location,
        method: u32,
        network_config: &NetworkConfig,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network_config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(network_config.connect_timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            location,
            method,
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn method(&self) -> u32 {
        self.method
    }

    /// Fetch prayer timings for one Gregorian date.
    pub async fn timings_by_date(&self, date: NaiveDate) -> Result<DayData> {
        let date_str = format_api_date(date);
        let url = format!("{}/timingsByCity/{}", self.base_url, date_str);
        let data: DayData = self.get_json(&url, &self.city_query()).await?;

        let returned = data.meta.method.id;
        if returned != self.method {
            anyhow::bail!(
                "Calculation method mismatch for {}: selected {}, API returned {}",
                date_str,
                self.method,
                returned
            );
        }

        Ok(data)
    }

    /// Fetch every day of a Hijri month (month 9 is Ramadan).
    pub async fn hijri_calendar(&self, month: u32, year: i32) -> Result<Vec<DayData>> {
        let url = format!("{}/hijriCalendarByCity/{}/{}", self.base_url, year, month);
        self.get_json(&url, &self.city_query()).await
    }

    /// Convert a Gregorian date to the API's (unadjusted) Hijri date.
    pub async fn gregorian_to_hijri(&self, date: NaiveDate) -> Result<HijriDate> {
        let url = format!("{}/gToH/{}", self.base_url, format_api_date(date));
        let data: GregorianToHijri = self.get_json(&url, &[]).await?;
        data.hijri.to_hijri()
    }

    fn city_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("city", self.location.city.clone()),
            ("country", self.location.country.clone()),
            ("method", self.method.to_string()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("_", chrono::Utc::now().timestamp_millis())])
            .send()
            .await
            .context("Failed to send request to prayer times API")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("API request failed ({})", status);
        }

        let envelope = response
            .json::<ApiResponse<T>>()
            .await
            .context("Failed to parse prayer times API response")?;

        Ok(envelope.data)
    }
}

impl TimingsProvider for AladhanClient {
    async fn timings_on(&self, date: NaiveDate) -> Result<PrayerTimings> {
        Ok(self.timings_by_date(date).await?.timings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_JSON: &str = r#"{
        "timings": {
            "Fajr": "05:12 (PKT)",
            "Sunrise": "06:35 (PKT)",
            "Dhuhr": "12:20 (PKT)",
            "Asr": "15:40 (PKT)",
            "Sunset": "18:02 (PKT)",
            "Maghrib": "18:05 (PKT)",
            "Isha": "19:25 (PKT)",
            "Imsak": "05:02 (PKT)",
            "Midnight": "00:20 (PKT)"
        },
        "date": {
            "readable": "01 Mar 2026",
            "timestamp": "1772323200",
            "hijri": {
                "date": "12-09-1447",
                "day": "12",
                "month": {"number": 9, "en": "Ramaḍān", "ar": "رَمَضان"},
                "year": "1447",
                "holidays": []
            },
            "gregorian": {
                "date": "01-03-2026",
                "day": "01",
                "month": {"number": 3, "en": "March"},
                "year": "2026"
            }
        },
        "meta": {
            "latitude": 31.5,
            "longitude": 74.3,
            "timezone": "Asia/Karachi",
            "method": {"id": 2, "name": "ISNA"}
        }
    }"#;

    // ==================== Response Parsing Tests ====================

    #[test]
    fn test_day_data_parses() {
        let day: DayData = serde_json::from_str(DAY_JSON).unwrap();
        assert_eq!(day.meta.method.id, 2);
        assert_eq!(day.date.readable, "01 Mar 2026");
        assert_eq!(day.timings.suhoor().unwrap(), TimeOfDay::from_hm(5, 12).unwrap());
        assert_eq!(day.timings.iftar().unwrap(), TimeOfDay::from_hm(18, 5).unwrap());
    }

    #[test]
    fn test_raw_hijri_to_hijri() {
        let day: DayData = serde_json::from_str(DAY_JSON).unwrap();
        assert_eq!(day.date.hijri.to_hijri().unwrap(), HijriDate::new(12, 9, 1447));
    }

    #[test]
    fn test_raw_gregorian_to_naive() {
        let day: DayData = serde_json::from_str(DAY_JSON).unwrap();
        assert_eq!(
            day.date.gregorian.to_naive().unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_invalid_hijri_day_is_error() {
        let raw = RawHijriDate {
            date: String::new(),
            day: "first".to_string(),
            month: HijriMonth {
                number: 9,
                en: "Ramadan".to_string(),
                ar: String::new(),
            },
            year: "1447".to_string(),
            holidays: vec![],
        };
        assert!(raw.to_hijri().is_err());
    }

    #[test]
    fn test_impossible_gregorian_date_is_error() {
        let raw = RawGregorianDate {
            date: String::new(),
            day: "30".to_string(),
            month: GregorianMonth {
                number: 2,
                en: "February".to_string(),
            },
            year: "2026".to_string(),
        };
        assert!(raw.to_naive().is_err());
    }

    #[test]
    fn test_malformed_timing_is_error() {
        let timings = PrayerTimings {
            fajr: "soon".to_string(),
            sunrise: String::new(),
            dhuhr: String::new(),
            asr: String::new(),
            sunset: String::new(),
            maghrib: "18:05".to_string(),
            isha: String::new(),
            imsak: String::new(),
            midnight: String::new(),
        };
        assert!(timings.suhoor().is_err());
        assert!(timings.iftar().is_ok());
    }

    // ==================== Location Tests ====================

    #[test]
    fn test_normalize_location_trims_and_collapses() {
        assert_eq!(normalize_location_value("  New   York  "), "New York");
    }

    #[test]
    fn test_normalize_location_drops_comma_tail() {
        assert_eq!(normalize_location_value("Lahore, Punjab"), "Lahore");
    }

    #[test]
    fn test_location_requires_city_and_country() {
        assert!(Location::new("", "Pakistan").is_err());
        assert!(Location::new("Lahore", "  ").is_err());
        let location = Location::new(" Lahore ", "Pakistan").unwrap();
        assert_eq!(location.city, "Lahore");
    }

    // ==================== Client Construction Tests ====================

    #[test]
    fn test_api_client_creation_trims_trailing_slash() {
        let location = Location::new("Lahore", "Pakistan").unwrap();
        let client = AladhanClient::new(
            "https://api.example.com/v1/",
            location,
            2,
            &NetworkConfig::default(),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.method(), 2);
    }
}
