//! UTC offset value object
//!
//! Offsets are derived from the hour a host reports versus the current UTC
//! hour, so they only carry whole hours. Half-hour zones and DST switches
//! during a run are not representable.
//!
//! Hosts are assumed to sit within 12 hours of UTC. An hour reading
//! cannot tell UTC+13 from UTC-11 (or UTC+14 from UTC-10), so hosts on
//! UTC+13/+14 get an offset 24h off and are not supported.

use serde::Serialize;
use std::fmt;

const SECONDS_PER_HOUR: i64 = 3600;

/// Signed seconds between the current UTC hour and a host's reported hour.
///
/// Every timestamp taken from a host is shifted by that host's offset before
/// comparison, so local and remote values share one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct UtcOffset {
    seconds: i64,
}

impl UtcOffset {
    /// Zero offset (host clock already in UTC)
    pub const ZERO: UtcOffset = UtcOffset { seconds: 0 };

    /// Build an offset from raw seconds
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    /// Offset from the UTC hour and the hour reported by a host.
    ///
    /// The hour difference is wrapped into `[-12, 12]`, so a query made
    /// across midnight (UTC 23h, host 01h) yields -2h rather than +22h.
    /// A UTC+13 host therefore reads as UTC-11.
    pub fn from_hours(utc_hour: u32, host_hour: u32) -> Self {
        let mut diff = i64::from(utc_hour) - i64::from(host_hour);
        if diff > 12 {
            diff -= 24;
        } else if diff < -12 {
            diff += 24;
        }
        Self {
            seconds: diff * SECONDS_PER_HOUR,
        }
    }

    /// Offset in seconds
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Offset in milliseconds
    pub fn millis(&self) -> i64 {
        self.seconds * 1000
    }

    /// Shift a raw epoch value (seconds) taken on this host: `raw - offset`
    pub fn normalize(&self, raw_seconds: i64) -> i64 {
        raw_seconds - self.seconds
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_from_same_hour_is_zero() {
        assert_eq!(UtcOffset::from_hours(9, 9), UtcOffset::ZERO);
    }

    #[test]
    fn offset_for_host_ahead_of_utc_is_negative() {
        // UTC 10h, host 12h (UTC+2)
        assert_eq!(UtcOffset::from_hours(10, 12).seconds(), -7200);
    }

    #[test]
    fn offset_wraps_across_midnight() {
        assert_eq!(UtcOffset::from_hours(23, 1).seconds(), -7200);
        assert_eq!(UtcOffset::from_hours(1, 23).seconds(), 7200);
    }

    #[test]
    fn utc_plus_thirteen_reads_as_utc_minus_eleven() {
        // UTC 2h: Auckland (NZDT) shows 15h, Pago Pago shows 15h the day before
        assert_eq!(UtcOffset::from_hours(2, 15).seconds(), 11 * 3600);
        assert_eq!(UtcOffset::from_hours(2, 14).seconds(), -12 * 3600);
    }

    #[test]
    fn normalize_subtracts_offset() {
        let offset = UtcOffset::from_seconds(-3600);
        assert_eq!(offset.normalize(1000), 4600);
        assert_eq!(offset.millis(), -3_600_000);
    }
}
