use proptest::prelude::*;
use tz_shift::{resolve_offset, DateFields, ZonedInstant};

const ZONES: &[&str] = &[
    "America/New_York",
    "America/St_Johns",
    "Asia/Kathmandu",
    "Asia/Pyongyang",
    "Asia/Singapore",
    "Australia/Adelaide",
    "Europe/London",
    "Pacific/Apia",
    "UTC",
    "+05:30",
    "-02:30",
];

fn zone() -> impl Strategy<Value = &'static str> {
    prop::sample::select(ZONES)
}

/// 1900-01-01 through 2100-01-01.
fn instant() -> impl Strategy<Value = f64> {
    (-2_208_988_800_000i64..4_102_444_800_000i64).prop_map(|ms| ms as f64)
}

proptest! {
    #[test]
    fn prop_zone_changes_keep_the_instant(t in instant(), z1 in zone(), z2 in zone()) {
        let date = ZonedInstant::from_timestamp(t, z1);
        let back = date.with_time_zone(z2).with_time_zone(z1);
        prop_assert_eq!(back.time(), date.time());
        prop_assert_eq!(back.to_iso_string(), date.to_iso_string());
    }

    #[test]
    fn prop_offset_sign_duality(t in instant(), z in zone()) {
        let date = ZonedInstant::from_timestamp(t, z);
        prop_assert_eq!(resolve_offset(Some(z), &t), -date.timezone_offset());
    }

    #[test]
    fn prop_reads_are_idempotent(t in instant(), z in zone()) {
        let date = ZonedInstant::from_timestamp(t, z);
        prop_assert_eq!(date.hours(), date.hours());
        prop_assert_eq!(date.full_year(), date.full_year());
        prop_assert_eq!(date.to_string(), date.to_string());
    }

    #[test]
    fn prop_shadow_matches_offset(t in instant(), z in zone()) {
        let date = ZonedInstant::from_timestamp(t, z);
        let wall = t + resolve_offset(Some(z), &t) * 60_000.0;
        let utc = ZonedInstant::from_timestamp(wall, "UTC");
        prop_assert_eq!(date.full_year(), utc.utc_full_year());
        prop_assert_eq!(date.month(), utc.utc_month());
        prop_assert_eq!(date.date(), utc.utc_date());
        prop_assert_eq!(date.hours(), utc.utc_hours());
        prop_assert_eq!(date.minutes(), utc.utc_minutes());
    }

    #[test]
    fn prop_iso_string_parses_back(t in instant(), z in zone()) {
        let date = ZonedInstant::from_timestamp(t, z);
        prop_assert_eq!(ZonedInstant::parse(&date.to_iso_string()), t);
    }

    #[test]
    fn prop_setting_current_fields_is_a_no_op_outside_overlaps(t in instant(), z in zone()) {
        let date = ZonedInstant::from_timestamp(t, z);
        let mut copy = date.clone();
        copy.set_hours(date.hours(), Some(date.minutes()), Some(date.seconds()), Some(date.milliseconds()));
        // Inside a repeated hour the earlier instant wins, so the wall clock
        // reading is all that is guaranteed.
        let (copied, original) = (copy.to_iso_string(), date.to_iso_string());
        prop_assert_eq!(copied.get(..23), original.get(..23));
    }

    #[test]
    fn prop_invalid_zone_poisons_everything(t in instant(), m in 0.0f64..12.0) {
        let date = ZonedInstant::from_timestamp(t, "Etc/Invalid");
        prop_assert!(date.full_year().is_nan());
        prop_assert!(date.timezone_offset().is_nan());
        prop_assert_eq!(date.to_iso_string(), "Invalid Date");

        let built = ZonedInstant::from_fields(DateFields::new(2020.0, m.floor()), "Etc/Invalid");
        prop_assert!(!built.is_valid());
    }

    #[test]
    fn prop_nan_timestamp_is_invalid(z in zone()) {
        let date = ZonedInstant::from_timestamp(f64::NAN, z);
        prop_assert!(date.minutes().is_nan());
        prop_assert!(date.utc_minutes().is_nan());
        prop_assert_eq!(date.to_utc_string(), "Invalid Date");
    }
}
