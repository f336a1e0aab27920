//! Validation functions for backup settings.

use crate::backup::snapshot::EXTENSION_SEPARATOR;
use sanitize_filename::{is_sanitized, sanitize};
use validator::ValidationError;

use std::path::Path;

pub fn validate_valid_archive_base_name<S: AsRef<str>>(name: S) -> Result<(), ValidationError> {
    let name = name.as_ref();
    if name.is_empty() {
        return Err(ValidationError::new("InvalidArchiveBaseName")
            .with_message("Archive name must not be empty".into()));
    }

    // a `.` in the name would end the base name early when the snapshot is listed again
    if name.contains(EXTENSION_SEPARATOR) {
        return Err(ValidationError::new("InvalidArchiveBaseName").with_message(
            format!(
                "Archive name {:?} must not contain {:?}",
                name, EXTENSION_SEPARATOR
            )
            .into(),
        ));
    }

    if !is_sanitized(name) {
        return Err(ValidationError::new("InvalidArchiveBaseName").with_message(
            format!(
                "Invalid file name, try sanitizing like {:?}",
                sanitize(name)
            )
            .into(),
        ));
    }

    Ok(())
}

pub fn validate_dir_exist_or_created<P: AsRef<Path>>(dir: P) -> Result<(), ValidationError> {
    let dir = dir.as_ref();
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ValidationError::new("InvalidDirectory")
                .with_message(format!("{:?} is not a directory", dir).into()));
        }
    } else {
        return std::fs::create_dir_all(dir).map_err(|e| {
            ValidationError::new("InvalidDirectory").with_message(
                format!("cannot create or access target path {:?}: {}", dir, e).into(),
            )
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_archive_base_name() {
        assert!(validate_valid_archive_base_name("snapshot").is_ok());
        assert!(validate_valid_archive_base_name("my_home_dir").is_ok());
        assert!(validate_valid_archive_base_name("a/b").is_err());
        assert!(validate_valid_archive_base_name("").is_err());
    }

    #[test]
    fn test_archive_base_name_rejects_extension_separator() {
        for name in ["v1.0", ".hidden", "name."] {
            let err = validate_valid_archive_base_name(name).unwrap_err();
            assert_eq!(err.code, "InvalidArchiveBaseName");
            assert!(err.message.unwrap().contains("must not contain"), "{name}");
        }
    }

    #[test]
    fn test_dir_created_when_missing() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        assert!(validate_dir_exist_or_created(&nested).is_ok());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_file_is_not_a_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(validate_dir_exist_or_created(&file).is_err());
    }
}
