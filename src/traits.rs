//! Abstractions for time and data sources to enable testing.
//!
//! This module provides traits for:
//! - `Clock`: Abstracting wall-clock access for deterministic testing
//! - `TimingsProvider`: Abstracting per-date prayer timing lookups

use std::future::Future;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::api::PrayerTimings;

// ==================== Clock Trait ====================

/// Trait for abstracting time access.
///
/// All fasting computations work on naive local civil time, so the clock
/// hands out the local wall time rather than an absolute instant.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Mock clock for testing with controllable time.
#[derive(Debug, Clone)]
pub struct MockClock {
    time: Arc<Mutex<NaiveDateTime>>,
}

impl MockClock {
    /// Create a new mock clock set to the given local time.
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Set the mock clock to a new time.
    pub fn set_time(&self, time: NaiveDateTime) {
        *self.time.lock().unwrap() = time;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut time = self.time.lock().unwrap();
        *time += duration;
    }
}

impl Clock for MockClock {
    fn now(&self) -> NaiveDateTime {
        *self.time.lock().unwrap()
    }
}

// ==================== Timings Provider Trait ====================

/// Source of prayer timings for an arbitrary Gregorian date.
///
/// Used to fill calendar days the bulk Hijri-month response does not cover.
pub trait TimingsProvider {
    fn timings_on(&self, date: NaiveDate) -> impl Future<Output = Result<PrayerTimings>> + Send;
}
