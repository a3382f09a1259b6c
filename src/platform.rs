// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Host platform identification.
//!
//! The installer only cares about one thing regarding the host operating
//! system: whether or not executables carry an ".exe" suffix. Thus, platforms
//! are sorted into two broad families, Windows and everything else.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Broad operating system category of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    /// Windows family, executables need ".exe" suffix.
    Windows,

    /// Any other family, executables are left bare.
    Other,
}

impl PlatformFamily {
    /// Identify platform family of the running host.
    pub fn current() -> Self {
        Self::from_family(std::env::consts::FAMILY)
    }

    /// Identify platform family from a family name.
    ///
    /// Expects the same vocabulary as [`std::env::consts::FAMILY`]. Any name
    /// that is not "windows" is treated as [`PlatformFamily::Other`].
    pub fn from_family(family: impl AsRef<str>) -> Self {
        match family.as_ref() {
            "windows" => Self::Windows,
            _ => Self::Other,
        }
    }

    /// Name of executable with given stem on this platform family.
    pub fn executable_name(&self, stem: impl AsRef<str>) -> String {
        match self {
            Self::Windows => format!("{}.exe", stem.as_ref()),
            Self::Other => stem.as_ref().to_string(),
        }
    }
}

impl Display for PlatformFamily {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Windows => fmt.write_str("windows"),
            Self::Other => fmt.write_str("other"),
        }
    }
}
