use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::TrackerError;

/// How "now" is interpreted, selected once at startup. The geolocated policy
/// keeps the local clock and additionally records where a clock-in happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSourcePolicy {
    LocalNaive,
    Utc,
    Civil(Tz),
    Geolocated,
}

impl TimeSourcePolicy {
    /// Accepts `local`, `utc`, `geolocated`, or an IANA zone name.
    pub fn parse(value: &str) -> Result<Self, TrackerError> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::LocalNaive),
            "utc" => Ok(Self::Utc),
            "geolocated" => Ok(Self::Geolocated),
            _ => value
                .parse::<Tz>()
                .map(Self::Civil)
                .map_err(|_| TrackerError::InvalidTimezone(value.to_string())),
        }
    }

    pub fn frame(&self) -> ReferenceFrame {
        match self {
            Self::LocalNaive | Self::Geolocated => ReferenceFrame::Local,
            Self::Utc => ReferenceFrame::Utc,
            Self::Civil(tz) => ReferenceFrame::Civil(*tz),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Timezone used to interpret an employee's schedule and to compute "today"
/// for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFrame {
    Local,
    Utc,
    Civil(Tz),
}

impl ReferenceFrame {
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => now.with_timezone(&Local).date_naive(),
            Self::Utc => now.date_naive(),
            Self::Civil(tz) => now.with_timezone(tz).date_naive(),
        }
    }

    /// Lift a civil date and time-of-day in this frame to UTC. A DST gap
    /// resolves to the later candidate offset, falling back to UTC.
    pub fn instant(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let naive = date.and_time(time);
        match self {
            Self::Local => Local
                .from_local_datetime(&naive)
                .latest()
                .map(|dt| dt.to_utc())
                .unwrap_or_else(|| naive.and_utc()),
            Self::Utc => naive.and_utc(),
            Self::Civil(tz) => naive
                .and_local_timezone(*tz)
                .latest()
                .map(|dt| dt.to_utc())
                .unwrap_or_else(|| naive.and_utc()),
        }
    }

    pub fn format_instant(&self, instant: DateTime<Utc>) -> String {
        match self {
            Self::Local => instant
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            Self::Utc => instant.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            Self::Civil(tz) => instant
                .with_timezone(tz)
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string(),
        }
    }
}

pub fn parse_time_string(time_str: &str) -> Result<NaiveTime, TrackerError> {
    let time_str = time_str.trim();

    if let Ok(time) = NaiveTime::parse_from_str(time_str, "%H:%M") {
        return Ok(time);
    }

    if let Ok(time) = NaiveTime::parse_from_str(time_str, "%H:%M:%S") {
        return Ok(time);
    }

    Err(TrackerError::Validation(format!(
        "Invalid time '{}'. Use HH:MM or HH:MM:SS",
        time_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_keywords_and_zone_names() {
        assert_eq!(
            TimeSourcePolicy::parse("local").unwrap(),
            TimeSourcePolicy::LocalNaive
        );
        assert_eq!(TimeSourcePolicy::parse("UTC").unwrap(), TimeSourcePolicy::Utc);
        assert_eq!(
            TimeSourcePolicy::parse("geolocated").unwrap(),
            TimeSourcePolicy::Geolocated
        );
        assert_eq!(
            TimeSourcePolicy::parse("Asia/Tokyo").unwrap(),
            TimeSourcePolicy::Civil(chrono_tz::Asia::Tokyo)
        );
        assert!(matches!(
            TimeSourcePolicy::parse("Atlantis/Nowhere"),
            Err(TrackerError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn civil_frame_shifts_the_calendar_date() {
        let frame = ReferenceFrame::Civil(chrono_tz::Asia::Tokyo);
        // 22:00 UTC is already the next morning in Tokyo.
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 22, 0, 0).unwrap();
        assert_eq!(frame.today(now), NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert_eq!(ReferenceFrame::Utc.today(now), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }

    #[test]
    fn civil_instant_round_trips_through_utc() {
        let frame = ReferenceFrame::Civil(chrono_tz::Asia::Tokyo);
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let instant = frame.instant(date, time);
        // 09:00 JST is midnight UTC.
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn accepts_both_time_formats() {
        assert_eq!(
            parse_time_string("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time_string(" 09:30:15 ").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 15).unwrap()
        );
        assert!(parse_time_string("9 o'clock").is_err());
    }
}
