//! # tarback
//!
//! Configuration driven snapshots with GNU tar.
//!
//! ## Features
//!
//! - **INI Configuration**: a `general` section for the target directory, compression
//!   and archive name, and a `dirconfig` section listing paths to include or exclude
//! - **Incremental State**: tar's `--listed-incremental` file kept next to the archives
//! - **Compression**: gzip, bzip2, xz, lzip, lzop, lzma or zstd, selected by keyword
//! - **Snapshot Listing**: earlier archives are recognised by their timestamped names
//!
//! ## Quick Start
//!
//! ```no_run
//! use tarback::backup::job::{run, RunOptions};
//!
//! let outcome = run("backup.conf", RunOptions::builder().dry_run(true).build())?;
//! std::process::exit(outcome.exit_code());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
