//! Snapshot archive naming.
//!
//! Archives are named `backup_<name>_<YYYY-MM-DD>_<HHMMSS>_<type>.<extension>`.
//! The logical name may itself contain underscores, so the fixed fields are
//! taken from the end of the underscore separated base name.

use crate::backup::file_ext::FileExtProvider;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use chrono::NaiveDateTime;
use getset::Getters;
use itertools::Itertools;
use std::fs::read_dir;
use std::path::Path;

pub const SNAPSHOT_PREFIX: &str = "backup";
pub const FIELD_SEPARATOR: char = '_';
pub const EXTENSION_SEPARATOR: char = '.';
pub const SNAPSHOT_TIME_FORMAT: &str = "%Y-%m-%d_%H%M%S";
/// prefix, name, date, time, type
pub const MIN_FIELD_COUNT: usize = 5;
pub const FULL_SNAPSHOT: &str = "full";
pub const TAR_FILE_EXT: &str = "tar";

/// A file found in the target directory.
///
/// `details` is only set when the file name starts with [`SNAPSHOT_PREFIX`];
/// anything else in the directory is kept as an unparsed snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Snapshot {
    file_name: String,
    extension: Option<String>,
    details: Option<SnapshotDetails>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Getters)]
#[getset(get = "pub")]
pub struct SnapshotDetails {
    name: String,
    date_time: NaiveDateTime,
    kind: String,
}

impl Snapshot {
    pub fn parse<S: Into<String>>(file_name: S) -> Result<Self> {
        let file_name = file_name.into();
        let (base, extension) = match file_name.split_once(EXTENSION_SEPARATOR) {
            Some((base, ext)) => (base, Some(ext.to_string())),
            None => (file_name.as_str(), None),
        };

        let details = parse_base_name(base).map_err(|reason| {
            Error::malformed_snapshot_name(file_name.as_str(), reason)
        })?;

        Ok(Self {
            file_name,
            extension,
            details,
        })
    }

    pub fn is_parsed(&self) -> bool {
        self.details.is_some()
    }

    /// File name for a new archive; parsing it yields the same name, time and kind.
    pub fn file_name_for<E: FileExtProvider>(
        name: &str,
        date_time: &NaiveDateTime,
        kind: &str,
        compression: &E,
    ) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}{}{}",
            SNAPSHOT_PREFIX,
            name,
            date_time.format(SNAPSHOT_TIME_FORMAT),
            kind,
            EXTENSION_SEPARATOR,
            archive_file_ext(compression),
            sep = FIELD_SEPARATOR,
        )
    }
}

/// `tar` followed by the compression extension, if any.
pub fn archive_file_ext<E: FileExtProvider>(compression: &E) -> String {
    std::iter::once(TAR_FILE_EXT.into())
        .chain(compression.file_ext())
        .join(".")
}

fn parse_base_name(base: &str) -> std::result::Result<Option<SnapshotDetails>, String> {
    let parts = base.split(FIELD_SEPARATOR).collect_vec();
    // a bare `backup` (e.g. the incremental state file) carries no fields
    if parts.len() < 2 || parts[0] != SNAPSHOT_PREFIX {
        return Ok(None);
    }

    let count = parts.len();
    if count < MIN_FIELD_COUNT {
        return Err(format!(
            "expected at least {} '{}' separated fields, found {}",
            MIN_FIELD_COUNT, FIELD_SEPARATOR, count
        ));
    }

    let name = parts[1..count - 3].iter().join(&FIELD_SEPARATOR.to_string());
    let kind = parts[count - 1];
    if name.is_empty() || kind.is_empty() {
        return Err("empty name or type field".to_string());
    }

    let stamp = format!("{}{}{}", parts[count - 3], FIELD_SEPARATOR, parts[count - 2]);
    let date_time = NaiveDateTime::parse_from_str(&stamp, SNAPSHOT_TIME_FORMAT)
        .map_err(|e| format!("bad timestamp {:?}: {}", stamp, e))?;

    Ok(Some(SnapshotDetails {
        name,
        date_time,
        kind: kind.to_string(),
    }))
}

/// Snapshots in `dir`, oldest first. Files without the snapshot prefix and
/// directories are skipped; a prefixed but malformed name aborts the listing.
pub fn list_snapshots<P: AsRef<Path>>(dir: P) -> Result<Vec<Snapshot>> {
    let dir = dir.as_ref();
    let mut snapshots = vec![];
    for entry in read_dir(dir)
        .map_err(Error::from)
        .with_msg(format!("List snapshot directory failed: {:?}", dir))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::trace!("Skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };

        let snapshot = Snapshot::parse(file_name)?;
        if snapshot.is_parsed() {
            snapshots.push(snapshot);
        } else {
            tracing::trace!("Skipping {:?}, not a snapshot", snapshot.file_name);
        }
    }

    Ok(snapshots
        .into_iter()
        .sorted_by_key(|s| s.details.as_ref().map(|d| d.date_time))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::compress::CompressionFormat;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_full_name() {
        let snapshot = Snapshot::parse("backup_snapshot_2024-03-05_141516_full.tar.xz").unwrap();
        assert_eq!(snapshot.file_name(), "backup_snapshot_2024-03-05_141516_full.tar.xz");
        assert_eq!(snapshot.extension().as_deref(), Some("tar.xz"));

        let details = snapshot.details().as_ref().unwrap();
        assert_eq!(details.name(), "snapshot");
        assert_eq!(details.date_time(), &dt(2024, 3, 5, 14, 15, 16));
        assert_eq!(details.kind(), "full");
    }

    #[test]
    fn test_fields_recovered_from_name() {
        let cases = [
            ("home", "2023-12-31", "235959", "full", "tar"),
            ("my_home_dir", "2024-01-01", "000000", "incr", "tar.gz"),
            ("a_b", "2020-02-29", "120000", "full", "tar.zst"),
        ];
        for (name, date, time, kind, ext) in cases {
            let file_name = format!("backup_{name}_{date}_{time}_{kind}.{ext}");
            let snapshot = Snapshot::parse(file_name.as_str()).unwrap();
            let details = snapshot.details().as_ref().unwrap();
            assert_eq!(details.name(), name, "{file_name}");
            assert_eq!(details.date_time().format("%Y-%m-%d").to_string(), date);
            assert_eq!(details.date_time().format("%H%M%S").to_string(), time);
            assert_eq!(details.kind(), kind);
            assert_eq!(snapshot.extension().as_deref(), Some(ext));
        }
    }

    #[test]
    fn test_foreign_names_are_unparsed() {
        for name in [
            "backup.snar",
            "notes.txt",
            "snapshot_home_2024-01-01_000000_full.tar",
            "Backup_home_2024-01-01_000000_full.tar",
            "README",
        ] {
            let snapshot = Snapshot::parse(name).unwrap();
            assert!(!snapshot.is_parsed(), "{name}");
            assert!(snapshot.details().is_none());
        }
    }

    #[test]
    fn test_malformed_prefixed_names_are_errors() {
        for name in [
            "backup_2024-01-01_000000_full.tar",
            "backup_home_2024-13-01_000000_full.tar",
            "backup_home_today_now_full.tar",
            "backup_home_2024-01-01_000000_.tar",
        ] {
            let err = Snapshot::parse(name).unwrap_err();
            assert!(
                matches!(err, Error::MalformedSnapshotName { .. }),
                "{name}: {err:?}"
            );
        }
    }

    #[test]
    fn test_file_name_for() {
        let time = dt(2024, 6, 1, 8, 9, 10);
        let file_name = Snapshot::file_name_for("snapshot", &time, FULL_SNAPSHOT, &CompressionFormat::Xz);
        assert_eq!(file_name, "backup_snapshot_2024-06-01_080910_full.tar.xz");

        let file_name = Snapshot::file_name_for("my_docs", &time, FULL_SNAPSHOT, &CompressionFormat::None);
        assert_eq!(file_name, "backup_my_docs_2024-06-01_080910_full.tar");

        let parsed = Snapshot::parse(file_name).unwrap();
        let details = parsed.details().as_ref().unwrap();
        assert_eq!(details.name(), "my_docs");
        assert_eq!(details.date_time(), &time);
        assert_eq!(details.kind(), FULL_SNAPSHOT);
    }

    #[test]
    fn test_archive_file_ext() {
        assert_eq!(archive_file_ext(&CompressionFormat::None), "tar");
        assert_eq!(archive_file_ext(&CompressionFormat::Bzip2), "tar.bz2");
        assert_eq!(archive_file_ext(&CompressionFormat::Lzop), "tar.lzo");
    }

    #[test]
    fn test_list_snapshots_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        std::fs::write(dir.join("backup_home_2024-02-01_000000_full.tar"), "").unwrap();
        std::fs::write(dir.join("backup_home_2023-02-01_000000_full.tar.gz"), "").unwrap();
        std::fs::write(dir.join("backup.snar"), "").unwrap();
        std::fs::write(dir.join("unrelated.txt"), "").unwrap();
        std::fs::create_dir(dir.join("backup_dir_2024-02-01_000000_full")).unwrap();

        let snapshots = list_snapshots(dir).unwrap();
        let names = snapshots.iter().map(|s| s.file_name().as_str()).collect_vec();
        assert_eq!(
            names,
            vec![
                "backup_home_2023-02-01_000000_full.tar.gz",
                "backup_home_2024-02-01_000000_full.tar",
            ]
        );
    }

    #[test]
    fn test_list_snapshots_malformed_aborts() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("backup_home_yesterday_full.tar"), "").unwrap();
        assert!(list_snapshots(temp.path()).is_err());
    }

    #[test]
    fn test_list_snapshots_missing_dir() {
        let temp = TempDir::new().unwrap();
        let err = list_snapshots(temp.path().join("absent")).unwrap_err();
        assert!(matches!(err.root_cause(), Error::Io(_)));
    }
}
