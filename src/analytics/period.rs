use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::DateWindow;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Reporting period ending at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Period {
    Day,
    Month,
    Quarter,
    Year,
}

impl Period {
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let first_day = match self {
            Period::Day => today - Duration::days(1),
            Period::Month => month_start(today),
            Period::Quarter => {
                let month_start = month_start(today);
                month_start
                    .checked_sub_months(Months::new(today.month0() % 3))
                    .unwrap_or(month_start)
            }
            Period::Year => today - Duration::days(i64::from(today.ordinal0())),
        };
        Utc.from_utc_datetime(&first_day.and_time(NaiveTime::MIN))
    }

    pub fn window(&self, now: DateTime<Utc>) -> DateWindow {
        DateWindow::new(self.start(now), now)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "DAY",
            Period::Month => "MONTH",
            Period::Quarter => "QUARTER",
            Period::Year => "YEAR",
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAY" => Ok(Period::Day),
            "MONTH" => Ok(Period::Month),
            "QUARTER" => Ok(Period::Quarter),
            "YEAR" => Ok(Period::Year),
            _ => Err(anyhow::anyhow!("Invalid period: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_period_starts() {
        let now = at(2024, 8, 15, 13, 45);

        assert_eq!(Period::Day.start(now), at(2024, 8, 14, 0, 0));
        assert_eq!(Period::Month.start(now), at(2024, 8, 1, 0, 0));
        assert_eq!(Period::Quarter.start(now), at(2024, 7, 1, 0, 0));
        assert_eq!(Period::Year.start(now), at(2024, 1, 1, 0, 0));
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(Period::Quarter.start(at(2024, 3, 31, 23, 59)), at(2024, 1, 1, 0, 0));
        assert_eq!(Period::Quarter.start(at(2024, 4, 1, 0, 0)), at(2024, 4, 1, 0, 0));
        assert_eq!(Period::Quarter.start(at(2024, 12, 31, 8, 0)), at(2024, 10, 1, 0, 0));
    }

    #[test]
    fn test_day_crosses_year_boundary() {
        assert_eq!(Period::Day.start(at(2025, 1, 1, 6, 0)), at(2024, 12, 31, 0, 0));
    }

    #[test]
    fn test_window_ends_now() {
        let now = at(2024, 2, 29, 10, 0);
        let window = Period::Month.window(now);

        assert_eq!(window.from, at(2024, 2, 1, 0, 0));
        assert_eq!(window.to, now);
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("QUARTER".parse::<Period>().unwrap(), Period::Quarter);
        assert_eq!(Period::Year.to_string(), "YEAR");
        assert!("week".parse::<Period>().is_err());
    }

    #[test]
    fn test_fixed_clock() {
        let now = at(2024, 5, 5, 5, 5);
        assert_eq!(FixedClock(now).now(), now);
    }
}
