use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use crate::backup::settings::BackupSettings;
use crate::backup::snapshot::{
    Snapshot, EXTENSION_SEPARATOR, FIELD_SEPARATOR, FULL_SNAPSHOT, SNAPSHOT_PREFIX, TAR_FILE_EXT,
};
use chrono::NaiveDateTime;
use getset::Getters;
use itertools::Itertools;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output};
use tracing::{debug, info, warn};

/// Flags every run starts with.
pub const BASELINE_FLAGS: [&str; 5] = [
    "--create",
    "--preserve-permissions",
    "--recursion",
    "--one-file-system",
    "--totals",
];

/// An archiver invocation assembled from [`BackupSettings`].
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct TarCommand {
    program: OsString,
    args: Vec<OsString>,
    archive_path: PathBuf,
}

fn flag_with_value<V: AsRef<OsStr>>(flag: &str, value: V) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push("=");
    arg.push(value);
    arg
}

/// Keeps earlier snapshots from ending up inside a new one when the
/// target directory is below an included path.
fn nested_archive_exclusion() -> OsString {
    flag_with_value(
        "--exclude",
        format!(
            "{}{}*{}{}*",
            SNAPSHOT_PREFIX, FIELD_SEPARATOR, EXTENSION_SEPARATOR, TAR_FILE_EXT
        ),
    )
}

impl TarCommand {
    /// Builds a full snapshot command stamped with `now`.
    ///
    /// Excluded paths are emitted before any included path so the archiver
    /// sees every `--exclude` ahead of the member operands, which follow `--`.
    pub fn build(settings: &BackupSettings, now: &NaiveDateTime) -> Self {
        let archive_path = settings.target().join(Snapshot::file_name_for(
            settings.name(),
            now,
            FULL_SNAPSHOT,
            &settings.format(),
        ));

        let mut args = BASELINE_FLAGS.into_iter().map(OsString::from).collect_vec();
        args.push(nested_archive_exclusion());
        args.push(flag_with_value(
            "--listed-incremental",
            settings.incremental_state_file(),
        ));
        if settings.follow_links() {
            args.push("--dereference".into());
        }
        if let Some(flag) = settings.format().tar_flag() {
            args.push(flag.into());
        }
        args.push(flag_with_value("--file", &archive_path));

        let (included, excluded): (Vec<_>, Vec<_>) =
            settings.dirs().iter().partition(|d| d.include());
        args.extend(
            excluded
                .into_iter()
                .map(|d| flag_with_value("--exclude", d.path())),
        );
        if !included.is_empty() {
            // paths starting with `-` must not be read as options
            args.push("--".into());
            args.extend(included.into_iter().map(|d| d.path().as_os_str().to_owned()));
        }

        Self {
            program: settings.archiver().into(),
            args,
            archive_path,
        }
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|a| a.to_string_lossy())
            .join(" ")
    }

    /// Runs the archiver to completion and captures its output.
    pub fn run(&self) -> Result<Output> {
        debug!("Running {}", self.command_line());
        self.to_command()
            .output()
            .map_err(Error::from)
            .with_msg(format!("Launching archiver {:?} failed", self.program))
    }

    /// Runs the archiver and passes its stdout and stderr through unchanged.
    pub fn execute(&self) -> Result<ExitStatus> {
        info!("Writing {:?}", self.archive_path);
        let output = self.run()?;

        std::io::stdout().write_all(&output.stdout)?;
        std::io::stderr().write_all(&output.stderr)?;

        if output.status.success() {
            info!("Archiver finished: {:?}", self.archive_path);
        } else {
            warn!("Archiver exited with {}", output.status);
        }
        Ok(output.status)
    }

    pub fn archive_file_name(&self) -> Option<&str> {
        self.archive_path.file_name().and_then(OsStr::to_str)
    }
}
