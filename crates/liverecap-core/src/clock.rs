//! Clock capability
//!
//! Intake stamps records with the current date and the dashboard resolves
//! presets relative to it. Both take a `Clock` instead of reading the system
//! time directly.

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync {
    /// Current calendar date
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date of the server
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
