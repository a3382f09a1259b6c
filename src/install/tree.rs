// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Recursive directory tree copying.
//!
//! Duplicate a directory and everything beneath it at a new path, leaving the
//! original untouched. The copy is verbatim: hidden files and files that some
//! ignore file would exclude are copied like anything else.
//!
//! # Copy Semantics
//!
//! - The destination directory must not exist yet, and its parent must.
//! - The source directory is opened before the destination is created. Thus, a
//!   missing source never leaves an empty destination behind.
//! - Symbolic links are followed, and the content they point to is copied.
//!   Dangling links are an error.
//! - File contents and permission bits are copied. Directory permission bits
//!   are applied once the directory has been filled, so read-only directories
//!   can be copied too.
//! - Special files, e.g., FIFOs, sockets, or devices, are refused.
//! - The first error stops the copy. Whatever was copied up to that point is
//!   left where it is.

use ignore::{DirEntry, WalkBuilder};
use indicatif::ProgressBar;
use std::{
    fs::{self, Permissions},
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, trace};

/// Totals for a finished tree copy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of directories created, including the destination itself.
    pub dirs: u64,

    /// Number of files copied.
    pub files: u64,

    /// Number of bytes copied.
    pub bytes: u64,
}

/// Copy directory tree at `source` to `dest`.
///
/// Every copied file ticks the progress bar once, and sets its message to the
/// path of that file relative to `source`.
///
/// # Errors
///
/// - Return [`TreeError`] naming the offending path if reading the source
///   tree, or writing the destination tree fails.
#[instrument(skip(source, dest, bar), level = "debug")]
pub fn copy_tree(source: &Path, dest: &Path, bar: &ProgressBar) -> Result<TreeStats> {
    debug!("copy tree {:?} to {:?}", source.display(), dest.display());

    // INVARIANT: Source must be a readable directory before anything is created.
    fs::read_dir(source).map_err(|err| TreeError::new(source, err))?;

    let walker = WalkBuilder::new(source)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut stats = TreeStats::default();
    let mut dir_permissions: Vec<(PathBuf, Permissions)> = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| TreeError::from_walk(source, err))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| TreeError::new(entry.path(), io::Error::other(err)))?;
        let target = match relative.as_os_str().is_empty() {
            true => dest.to_path_buf(),
            false => dest.join(relative),
        };

        match EntryKind::of(&entry) {
            EntryKind::Dir => {
                trace!("create directory {:?}", target.display());
                fs::create_dir(&target).map_err(|err| TreeError::new(&target, err))?;
                let permissions = fs::metadata(entry.path())
                    .map_err(|err| TreeError::new(entry.path(), err))?
                    .permissions();
                dir_permissions.push((target, permissions));
                stats.dirs += 1;
            }
            EntryKind::File => {
                trace!("copy file {:?}", relative.display());

                // INVARIANT: Unreadable source is blamed on source, not destination.
                fs::File::open(entry.path()).map_err(|err| TreeError::new(entry.path(), err))?;
                let bytes =
                    fs::copy(entry.path(), &target).map_err(|err| TreeError::new(&target, err))?;
                stats.files += 1;
                stats.bytes += bytes;
                bar.set_message(relative.display().to_string());
                bar.inc(1);
            }
            EntryKind::Special => {
                return Err(TreeError::new(
                    entry.path(),
                    io::Error::new(io::ErrorKind::InvalidInput, "cannot copy special file"),
                ));
            }
        }
    }

    // INVARIANT: Apply directory permissions deepest first, after all writes.
    for (path, permissions) in dir_permissions.into_iter().rev() {
        fs::set_permissions(&path, permissions).map_err(|err| TreeError::new(&path, err))?;
    }

    debug!(
        "copied {} files ({} bytes) across {} directories",
        stats.files, stats.bytes, stats.dirs
    );

    Ok(stats)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    Special,
}

impl EntryKind {
    fn of(entry: &DirEntry) -> Self {
        match entry.file_type() {
            Some(kind) if kind.is_dir() => Self::Dir,
            Some(kind) if kind.is_file() => Self::File,
            _ => Self::Special,
        }
    }
}

/// Failed to copy part of a directory tree.
#[derive(Debug, thiserror::Error)]
#[error("failed to copy tree at {:?}", path.display())]
pub struct TreeError {
    pub path: PathBuf,

    #[source]
    pub source: io::Error,
}

impl TreeError {
    fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    fn from_walk(root: &Path, err: ignore::Error) -> Self {
        let path = walk_error_path(&err).unwrap_or(root).to_path_buf();
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(message));

        Self { path, source }
    }
}

fn walk_error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}

/// Friendly result alias :3
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
