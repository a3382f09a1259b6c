// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Installation layout.
//!
//! Specify where the installer expects to find the build artifact and asset
//! tree, and where it should place them. The default layout is the one the
//! `mcinstall` command always uses, with every path resolved relative to the
//! current working directory:
//!
//! | Path                        | Role                     |
//! |-----------------------------|--------------------------|
//! | `minecraft/`                | target installation root |
//! | `build/minecraft[.exe]`     | source executable        |
//! | `minecraft/minecraft[.exe]` | installed executable     |
//! | `assets/`                   | source asset tree        |
//! | `minecraft/assets/`         | installed asset tree     |
//!
//! Layouts can be serialized to and from TOML so library users can install
//! into some other root. File I/O is left to the caller to figure out.

use crate::platform::PlatformFamily;

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Layout of an installation.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InstallLayout {
    /// Directory every other path is resolved against.
    pub root: PathBuf,

    /// Target installation directory.
    pub target: PathBuf,

    /// Directory holding the build artifact.
    pub build: PathBuf,

    /// Stem of executable name, platform suffix is added on top.
    pub executable: String,

    /// Asset tree to copy into target installation directory.
    pub assets: PathBuf,
}

impl InstallLayout {
    /// Construct default layout rooted at target directory.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Path to target installation directory.
    pub fn target_dir(&self) -> PathBuf {
        self.root.join(&self.target)
    }

    /// Path to build artifact for given platform.
    pub fn executable_source(&self, platform: PlatformFamily) -> PathBuf {
        self.root
            .join(&self.build)
            .join(platform.executable_name(&self.executable))
    }

    /// Path the build artifact is moved to for given platform.
    pub fn executable_dest(&self, platform: PlatformFamily) -> PathBuf {
        self.target_dir()
            .join(platform.executable_name(&self.executable))
    }

    /// Path to source asset tree.
    pub fn assets_source(&self) -> PathBuf {
        self.root.join(&self.assets)
    }

    /// Path asset tree is copied to.
    ///
    /// Keeps the final component of the source asset tree, so `assets` lands
    /// at `minecraft/assets`.
    pub fn assets_dest(&self) -> PathBuf {
        let name = self
            .assets
            .file_name()
            .map(Path::new)
            .unwrap_or(self.assets.as_path());
        self.target_dir().join(name)
    }
}

impl Default for InstallLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            target: PathBuf::from("minecraft"),
            build: PathBuf::from("build"),
            executable: "minecraft".into(),
            assets: PathBuf::from("assets"),
        }
    }
}

impl FromStr for InstallLayout {
    type Err = LayoutError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut layout: InstallLayout = toml::de::from_str(data)?;

        // INVARIANT: Perform shell expansion on root field.
        layout.root = PathBuf::from(
            shellexpand::full(layout.root.to_string_lossy().as_ref())?.into_owned(),
        );

        // INVARIANT: Asset tree needs a final component to name its copy.
        if layout.assets.file_name().is_none() {
            return Err(LayoutError::UnnamedAssets {
                assets: layout.assets,
            });
        }

        Ok(layout)
    }
}

impl Display for InstallLayout {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(LayoutError::Serialize)?
                .as_str(),
        )
    }
}

/// Layout error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LayoutError {
    /// Failed to deserialize layout.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize layout.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on layout root.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// Asset tree path does not end in a name, e.g., "." or "..".
    #[error("asset tree {:?} has no final component to install under", assets.display())]
    UnnamedAssets { assets: PathBuf },
}

impl From<LayoutError> for FmtError {
    fn from(_: LayoutError) -> Self {
        FmtError
    }
}
