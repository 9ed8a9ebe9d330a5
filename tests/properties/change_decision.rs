//! Property tests for the upload decision table.

use proptest::prelude::*;

use ftpdeploy::domain::entities::RemoteFileRecord;
use ftpdeploy::domain::services::{
    classify, normalize_local_mtime, DiffSettings, FileVerdict, LocalFileStat,
};
use ftpdeploy::domain::value_objects::UtcOffset;

fn settings(fresh: bool, has_seconds: bool) -> DiffSettings {
    DiffSettings {
        fresh,
        local_offset: UtcOffset::ZERO,
        remote_has_seconds: has_seconds,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a size mismatch always uploads.
    #[test]
    fn property_size_mismatch_uploads(
        size in 0u64..1_000_000,
        delta in 1u64..1000,
        local in 0i64..2_000_000_000,
        remote in 0i64..2_000_000_000,
        has_seconds in any::<bool>(),
    ) {
        let record = RemoteFileRecord::new("f", remote, remote, size + delta);
        let stat = LocalFileStat { size, mtime_ms: local * 1000 };
        prop_assert_eq!(
            classify(stat, Some(&record), &settings(false, has_seconds)),
            FileVerdict::Changed
        );
    }

    /// PROPERTY: a remote copy newer than the local file (same size) is kept.
    #[test]
    fn property_newer_remote_is_unchanged(
        size in 0u64..1_000_000,
        local in 0i64..2_000_000_000,
        lead in 60i64..100_000,
    ) {
        let record = RemoteFileRecord::new("f", local + lead, local + lead, size);
        let stat = LocalFileStat { size, mtime_ms: local * 1000 };
        prop_assert_eq!(
            classify(stat, Some(&record), &settings(false, true)),
            FileVerdict::Unchanged
        );
        prop_assert_eq!(
            classify(stat, Some(&record), &settings(false, false)),
            FileVerdict::Unchanged
        );
    }

    /// PROPERTY: a local file strictly newer than the remote mtime uploads.
    #[test]
    fn property_newer_local_uploads(
        size in 0u64..1_000_000,
        remote in 0i64..2_000_000_000,
        lag in 1i64..100_000,
    ) {
        let record = RemoteFileRecord::new("f", remote, 0, size);
        let stat = LocalFileStat { size, mtime_ms: (remote + lag) * 1000 };
        prop_assert_eq!(
            classify(stat, Some(&record), &settings(false, true)),
            FileVerdict::Changed
        );
    }

    /// PROPERTY: `--fresh` uploads every file whatever the remote says.
    #[test]
    fn property_fresh_uploads_everything(
        size in 0u64..1_000_000,
        local in 0i64..2_000_000_000,
        remote in proptest::option::of(0i64..2_000_000_000),
    ) {
        let record = remote.map(|t| RemoteFileRecord::new("f", t, t, size));
        let stat = LocalFileStat { size, mtime_ms: local * 1000 };
        let verdict = classify(stat, record.as_ref(), &settings(true, true));
        prop_assert_eq!(verdict, FileVerdict::Fresh);
        prop_assert!(verdict.needs_upload());
    }

    /// PROPERTY: minute precision rounds to a multiple of 60 within 30s.
    #[test]
    fn property_minute_rounding_stays_close(ms in -4_000_000_000_000i64..4_000_000_000_000) {
        let secs = normalize_local_mtime(ms, UtcOffset::ZERO, true);
        let minutes = normalize_local_mtime(ms, UtcOffset::ZERO, false);
        prop_assert_eq!(minutes.rem_euclid(60), 0);
        prop_assert!((minutes - secs).abs() <= 30);
    }
}
