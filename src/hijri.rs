use std::borrow::Cow;
use std::fmt;

/// Month number of Ramadan in the Hijri calendar.
pub const RAMADAN_MONTH: u32 = 9;

/// Transliterated Hijri month names, index 0 = month 1.
const HIJRI_MONTH_NAMES: [&str; 12] = [
    "Muḥarram",
    "Ṣafar",
    "Rabīʿ al-Awwal",
    "Rabīʿ al-Thānī",
    "Jumādá al-Ūlá",
    "Jumādá al-Ākhirah",
    "Rajab",
    "Shaʿbān",
    "Ramadan",
    "Shawwāl",
    "Dhū al-Qaʿdah",
    "Dhū al-Ḥijjah",
];

/// A Hijri calendar date as reported by the prayer-times API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HijriDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl HijriDate {
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    /// Shift this date by `offset` days using the 30/29 month model.
    pub fn adjusted(self, offset: i32) -> Self {
        adjust_hijri_date(self.day, self.month, self.year, offset)
    }

    /// Display name of this date's month.
    pub fn month_name(&self) -> Cow<'static, str> {
        hijri_month_name(self.month)
    }

    pub fn is_ramadan(&self) -> bool {
        is_ramadan(self.month)
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month_name(), self.year)
    }
}

/// Nominal month length: odd months have 30 days, even months 29.
///
/// This is the simplified tabular model, not the observed lunar calendar.
pub fn days_in_month(month: u32) -> u32 {
    if month % 2 == 1 { 30 } else { 29 }
}

/// Resolve a month number to its transliterated name.
///
/// Numbers outside 1-12 fall back to a generic `"Month N"` label.
pub fn hijri_month_name(month: u32) -> Cow<'static, str> {
    match month {
        1..=12 => Cow::Borrowed(HIJRI_MONTH_NAMES[(month - 1) as usize]),
        _ => Cow::Owned(format!("Month {}", month)),
    }
}

pub fn is_ramadan(month: u32) -> bool {
    month == RAMADAN_MONTH
}

/// Apply a day offset to a raw Hijri date, rolling across month and year
/// boundaries.
///
/// A zero offset returns the input untouched.
pub fn adjust_hijri_date(day: u32, month: u32, year: i32, offset: i32) -> HijriDate {
    if offset == 0 {
        return HijriDate::new(day, month, year);
    }

    let mut d = i64::from(day) + i64::from(offset);
    let mut m = month;
    let mut y = year;

    while d > i64::from(days_in_month(m)) {
        d -= i64::from(days_in_month(m));
        m += 1;
        if m > 12 {
            m = 1;
            y += 1;
        }
    }

    while d < 1 {
        m = if m <= 1 {
            y -= 1;
            12
        } else {
            m - 1
        };
        d += i64::from(days_in_month(m));
    }

    HijriDate::new(d as u32, m, y)
}
