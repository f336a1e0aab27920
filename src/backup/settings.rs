//! Typed view of the `general` and `dirconfig` sections.

use crate::backup::compress::CompressionFormat;
use crate::backup::config::{parse_bool, Configuration};
use crate::backup::function_path;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithDebugObjectAndFnName;
use crate::backup::validate::{validate_dir_exist_or_created, validate_valid_archive_base_name};
use bon::Builder;
use function_name::named;
use getset::{CopyGetters, Getters};
use std::path::PathBuf;
use validator::Validate;

pub const GENERAL_SECTION: &str = "general";
pub const DIRCONFIG_SECTION: &str = "dirconfig";

pub const DEFAULT_TARGET: &str = ".";
pub const DEFAULT_NAME: &str = "snapshot";
pub const DEFAULT_ARCHIVER: &str = "tar";
/// Kept by the archiver inside the target directory between runs.
pub const INCREMENTAL_STATE_FILE: &str = "backup.snar";

/// One `dirconfig` line: a path and whether it goes into the archive.
#[derive(Clone, Debug, PartialEq, Eq, Builder, Getters, CopyGetters)]
pub struct DirEntry {
    #[builder(into)]
    #[getset(get = "pub")]
    path: PathBuf,
    #[builder(default = true)]
    #[getset(get_copy = "pub")]
    include: bool,
}

impl DirEntry {
    /// Only an explicit false value (`0`, `no`, `false`, `off`) excludes a path.
    pub fn from_config_value(path: &str, value: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            include: parse_bool(value) != Some(false),
        }
    }
}

#[derive(Clone, Debug, Validate, Builder, Getters, CopyGetters)]
pub struct BackupSettings {
    #[validate(custom(function = validate_dir_exist_or_created))]
    #[builder(into)]
    #[getset(get = "pub")]
    target: PathBuf,
    #[builder(default = true)]
    #[getset(get_copy = "pub")]
    follow_links: bool,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    format: CompressionFormat,
    #[validate(custom(function = validate_valid_archive_base_name))]
    #[builder(default = DEFAULT_NAME.to_string())]
    #[getset(get = "pub")]
    name: String,
    #[builder(default = DEFAULT_ARCHIVER.to_string())]
    #[getset(get = "pub")]
    archiver: String,
    #[builder(default)]
    #[getset(get = "pub")]
    dirs: Vec<DirEntry>,
}

impl BackupSettings {
    /// Reads settings without touching the filesystem; call `validate` before use.
    #[named]
    pub fn from_configuration(config: &Configuration) -> Result<Self> {
        let read = || -> Result<Self> {
            let target: String =
                config.get(GENERAL_SECTION, "target", DEFAULT_TARGET.to_string())?;
            if !config.contains(GENERAL_SECTION, "target") {
                tracing::warn!("No [{}] target set, using {:?}", GENERAL_SECTION, DEFAULT_TARGET);
            }

            let format = config
                .get_raw(GENERAL_SECTION, "format")
                .map(CompressionFormat::from_config_value)
                .unwrap_or_default();

            let dirs = config
                .options(DIRCONFIG_SECTION)
                .into_iter()
                .map(|(path, value)| DirEntry::from_config_value(path, value))
                .collect();

            Ok(Self::builder()
                .target(target)
                .follow_links(config.get(GENERAL_SECTION, "followlinks", true)?)
                .format(format)
                .name(config.get(GENERAL_SECTION, "name", DEFAULT_NAME.to_string())?)
                .archiver(config.get(GENERAL_SECTION, "archiver", DEFAULT_ARCHIVER.to_string())?)
                .dirs(dirs)
                .build())
        };

        read().with_debug_object_and_fn_name(format!("{:?}", config), function_path!())
    }

    pub fn incremental_state_file(&self) -> PathBuf {
        self.target.join(INCREMENTAL_STATE_FILE)
    }
}
