//! Property tests for clock offset resolution.

use proptest::prelude::*;

use ftpdeploy::domain::value_objects::UtcOffset;

proptest! {
    /// PROPERTY: offsets are whole hours within twelve hours of UTC.
    #[test]
    fn property_offset_is_bounded(utc in 0u32..24, host in 0u32..24) {
        let offset = UtcOffset::from_hours(utc, host).seconds();
        prop_assert_eq!(offset % 3600, 0);
        prop_assert!((-12 * 3600..=12 * 3600).contains(&offset));
    }

    /// PROPERTY: swapping the two clocks negates the offset.
    #[test]
    fn property_offset_is_antisymmetric(utc in 0u32..24, host in 0u32..24) {
        prop_assert_eq!(
            UtcOffset::from_hours(utc, host).seconds(),
            -UtcOffset::from_hours(host, utc).seconds()
        );
    }

    /// PROPERTY: a host in sync with UTC needs no correction.
    #[test]
    fn property_same_hour_is_identity(hour in 0u32..24, raw in any::<i32>()) {
        let offset = UtcOffset::from_hours(hour, hour);
        prop_assert_eq!(offset.normalize(i64::from(raw)), i64::from(raw));
    }
}
