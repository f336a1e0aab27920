//! One backup run: read configuration, report prior snapshots, build the
//! archiver command and hand it off.

use crate::backup::config::Configuration;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use crate::backup::settings::BackupSettings;
use crate::backup::snapshot::{list_snapshots, Snapshot};
use crate::backup::tar::TarCommand;
use bon::Builder;
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use std::process::ExitStatus;
use tracing::info;
use validator::Validate;

#[derive(Clone, Copy, Debug, Default, Builder)]
pub struct RunOptions {
    /// Print the command instead of running it.
    #[builder(default)]
    pub dry_run: bool,
    /// Stop after reporting existing snapshots.
    #[builder(default)]
    pub list_only: bool,
}

#[derive(Debug)]
pub enum RunOutcome {
    Listed(Vec<Snapshot>),
    DryRun(TarCommand),
    Executed(ExitStatus),
}

impl RunOutcome {
    /// Process exit code for this outcome, the archiver's own code when it ran.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Listed(_) | RunOutcome::DryRun(_) => 0,
            RunOutcome::Executed(status) => status.code().unwrap_or(1),
        }
    }
}

pub fn run<P: AsRef<Path>>(config_path: P, options: RunOptions) -> Result<RunOutcome> {
    let config_path = config_path.as_ref();
    let config = Configuration::load(config_path)?;
    config.log_contents();

    let settings = BackupSettings::from_configuration(&config)?;
    settings
        .validate()
        .map_err(Error::from)
        .with_msg(format!("Config validation failed: {:?}", config_path))?;

    run_with_settings(&settings, options, Local::now().naive_local())
}

pub fn run_with_settings(
    settings: &BackupSettings,
    options: RunOptions,
    now: NaiveDateTime,
) -> Result<RunOutcome> {
    let snapshots = list_snapshots(settings.target())?;
    if snapshots.is_empty() {
        info!("No previous snapshots in {:?}", settings.target());
    }
    for snapshot in &snapshots {
        if let Some(details) = snapshot.details() {
            info!(
                "Found {} snapshot {:?} from {}",
                details.kind(),
                details.name(),
                details.date_time()
            );
        }
    }

    if options.list_only {
        return Ok(RunOutcome::Listed(snapshots));
    }

    let command = TarCommand::build(settings, &now);
    if options.dry_run {
        info!("Dry run, not starting archiver");
        println!("{}", command.command_line());
        return Ok(RunOutcome::DryRun(command));
    }

    command.execute().map(RunOutcome::Executed)
}
