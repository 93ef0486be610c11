use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::ports::{Clock, TimeZoneResolver};
use crate::utils::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// IANA zone picked once from configuration, e.g. `Europe/Brussels`.
#[derive(Debug, Clone, Copy)]
pub struct NamedTimeZone {
    zone: Tz,
}

impl NamedTimeZone {
    pub fn parse(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(|zone| Self { zone })
            .map_err(|_| DashboardError::UnknownTimeZone {
                name: name.to_string(),
            })
    }

    pub fn utc() -> Self {
        Self {
            zone: chrono_tz::UTC,
        }
    }
}

impl TimeZoneResolver for NamedTimeZone {
    fn time_zone(&self) -> Tz {
        self.zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_named_zone() {
        let zone = NamedTimeZone::parse("Europe/Brussels").unwrap();
        assert_eq!(zone.time_zone(), chrono_tz::Europe::Brussels);
        assert_eq!(NamedTimeZone::utc().time_zone(), chrono_tz::UTC);
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        let err = NamedTimeZone::parse("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, DashboardError::UnknownTimeZone { .. }));
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
        assert_eq!(FixedClock::new(instant).now(), instant);
        assert!(SystemClock.now() > instant - chrono::Duration::days(36500));
    }
}
