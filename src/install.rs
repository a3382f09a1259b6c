// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Program installation.
//!
//! An __installation__ places a previously built executable and its asset
//! tree into a fresh target directory. It is performed in three steps, always
//! in the same order:
//!
//! 1. Create the target directory. It must not exist yet.
//! 2. Move the build artifact into the target directory. The executable name
//!    depends on the host platform family, see [`PlatformFamily`].
//! 3. Copy the asset tree into the target directory, see [`tree`].
//!
//! # Failure
//!
//! Installation is not transactional. The first step that fails stops the
//! whole sequence, and nothing done by earlier steps is undone. Thus, a failed
//! installation may leave a target directory behind that holds the executable,
//! a partial asset tree, or nothing at all. Running the installer again will
//! then fail on the first step, because the target directory already exists.
//!
//! No verification is performed on the result. The installed executable is
//! not checked for being executable, and the copied asset tree is not checked
//! for completeness.

pub mod tree;

use crate::{layout::InstallLayout, platform::PlatformFamily};

use indicatif::ProgressBar;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Install with default layout on current platform.
///
/// Everything is resolved relative to the current working directory.
///
/// # Errors
///
/// - Return [`InstallError`] for the first step that fails.
pub fn install() -> Result<Installation> {
    Installer::new(InstallLayout::default(), PlatformFamily::current()).install()
}

/// Performs installation steps for a given layout and platform.
#[derive(Debug, Clone)]
pub struct Installer {
    layout: InstallLayout,
    platform: PlatformFamily,
    bar: ProgressBar,
}

impl Installer {
    /// Construct new installer.
    ///
    /// Progress is not reported unless a progress bar is supplied through
    /// [`Installer::with_progress`].
    pub fn new(layout: InstallLayout, platform: PlatformFamily) -> Self {
        Self {
            layout,
            platform,
            bar: ProgressBar::hidden(),
        }
    }

    /// Report asset copy progress through given progress bar.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.bar = bar;
        self
    }

    /// Layout used by installer.
    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Platform family used by installer.
    pub fn platform(&self) -> PlatformFamily {
        self.platform
    }

    /// Perform full installation.
    ///
    /// # Errors
    ///
    /// - Return [`InstallError::DirectoryAlreadyExists`] if target directory
    ///   is already present.
    /// - Return [`InstallError::SourceNotFound`] if build artifact or asset
    ///   tree is missing.
    /// - Return [`InstallError::PermissionDenied`], [`InstallError::DiskFull`],
    ///   or [`InstallError::IoFailure`] for any other file system failure.
    #[instrument(skip(self), level = "debug")]
    pub fn install(&self) -> Result<Installation> {
        info!(
            "install {:?} for {} platform",
            self.layout.target_dir().display(),
            self.platform
        );

        let target_dir = self.create_target_dir()?;
        let executable = self.relocate_executable()?;
        let (assets, files) = self.copy_assets()?;

        Ok(Installation {
            target_dir,
            executable,
            assets,
            files,
        })
    }

    #[instrument(skip(self), level = "debug")]
    fn create_target_dir(&self) -> Result<PathBuf> {
        let step = InstallStep::CreateTargetDir;
        let target_dir = self.layout.target_dir();
        debug!("{step}: {:?}", target_dir.display());

        // INVARIANT: Never create missing parents, and never reuse existing target.
        fs::create_dir(&target_dir).map_err(|err| InstallError::classify(step, &target_dir, err))?;

        Ok(target_dir)
    }

    #[instrument(skip(self), level = "debug")]
    fn relocate_executable(&self) -> Result<PathBuf> {
        let step = InstallStep::RelocateExecutable;
        let source = self.layout.executable_source(self.platform);
        let dest = self.layout.executable_dest(self.platform);
        debug!("{step}: {:?} to {:?}", source.display(), dest.display());

        // INVARIANT: Move, never copy. Source must be gone afterwards.
        fs::rename(&source, &dest).map_err(|err| {
            // A rename reports the same error for a missing source and a
            // missing destination parent, so blame whichever is absent.
            let path = match err.kind() == io::ErrorKind::NotFound && source.exists() {
                true => dest.as_path(),
                false => source.as_path(),
            };
            InstallError::classify(step, path, err)
        })?;

        Ok(dest)
    }

    #[instrument(skip(self), level = "debug")]
    fn copy_assets(&self) -> Result<(PathBuf, u64)> {
        let step = InstallStep::CopyAssets;
        let source = self.layout.assets_source();
        let dest = self.layout.assets_dest();
        debug!("{step}: {:?} to {:?}", source.display(), dest.display());

        let stats = tree::copy_tree(&source, &dest, &self.bar)
            .map_err(|err| InstallError::classify(step, err.path, err.source))?;

        Ok((dest, stats.files))
    }
}

/// Summary of a finished installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// Target installation directory.
    pub target_dir: PathBuf,

    /// Installed executable.
    pub executable: PathBuf,

    /// Installed asset tree.
    pub assets: PathBuf,

    /// Number of asset files copied.
    pub files: u64,
}

/// Individual installation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStep {
    /// Create target installation directory.
    CreateTargetDir,

    /// Move build artifact into target installation directory.
    RelocateExecutable,

    /// Copy asset tree into target installation directory.
    CopyAssets,
}

impl Display for InstallStep {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::CreateTargetDir => fmt.write_str("create target directory"),
            Self::RelocateExecutable => fmt.write_str("relocate executable"),
            Self::CopyAssets => fmt.write_str("copy assets"),
        }
    }
}

/// Installation error types.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Target path already exists.
    #[error("{step}: {:?} already exists", path.display())]
    DirectoryAlreadyExists {
        step: InstallStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Build artifact or asset tree is missing.
    #[error("{step}: {:?} not found", path.display())]
    SourceNotFound {
        step: InstallStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Not allowed to access path.
    #[error("{step}: permission denied for {:?}", path.display())]
    PermissionDenied {
        step: InstallStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No space left while writing path.
    #[error("{step}: disk full while writing {:?}", path.display())]
    DiskFull {
        step: InstallStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other file system failure.
    #[error("{step}: failed on {:?}", path.display())]
    IoFailure {
        step: InstallStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    /// Sort I/O error into installation error by its kind.
    pub fn classify(step: InstallStep, path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::AlreadyExists => Self::DirectoryAlreadyExists { step, path, source },
            io::ErrorKind::NotFound => Self::SourceNotFound { step, path, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { step, path, source },
            io::ErrorKind::StorageFull => Self::DiskFull { step, path, source },
            _ => Self::IoFailure { step, path, source },
        }
    }

    /// Step that failed.
    pub fn step(&self) -> InstallStep {
        match self {
            Self::DirectoryAlreadyExists { step, .. }
            | Self::SourceNotFound { step, .. }
            | Self::PermissionDenied { step, .. }
            | Self::DiskFull { step, .. }
            | Self::IoFailure { step, .. } => *step,
        }
    }

    /// Path that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryAlreadyExists { path, .. }
            | Self::SourceNotFound { path, .. }
            | Self::PermissionDenied { path, .. }
            | Self::DiskFull { path, .. }
            | Self::IoFailure { path, .. } => path.as_path(),
        }
    }
}

/// Friendly result alias :3
pub type Result<T, E = InstallError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use sealed_test::prelude::*;
    use simple_test_case::test_case;

    fn write_fixture(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let path = path.as_ref();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn installer(platform: PlatformFamily) -> Installer {
        Installer::new(InstallLayout::default(), platform)
    }

    #[test_case(io::ErrorKind::AlreadyExists, "DirectoryAlreadyExists"; "already exists")]
    #[test_case(io::ErrorKind::NotFound, "SourceNotFound"; "not found")]
    #[test_case(io::ErrorKind::PermissionDenied, "PermissionDenied"; "permission denied")]
    #[test_case(io::ErrorKind::StorageFull, "DiskFull"; "storage full")]
    #[test_case(io::ErrorKind::Interrupted, "IoFailure"; "interrupted")]
    #[test_case(io::ErrorKind::InvalidInput, "IoFailure"; "invalid input")]
    #[test]
    fn install_error_classify(kind: io::ErrorKind, expect: &str) {
        let error = InstallError::classify(
            InstallStep::CopyAssets,
            "minecraft/assets",
            io::Error::from(kind),
        );
        let variant = format!("{error:?}");
        assert!(variant.starts_with(expect), "{variant}");
        pretty_assertions::assert_eq!(error.step(), InstallStep::CopyAssets);
        pretty_assertions::assert_eq!(error.path(), Path::new("minecraft/assets"));
    }

    #[test]
    fn install_error_names_step_and_path() {
        let error = InstallError::classify(
            InstallStep::CreateTargetDir,
            "minecraft",
            io::Error::from(io::ErrorKind::AlreadyExists),
        );
        pretty_assertions::assert_eq!(
            error.to_string(),
            r#"create target directory: "minecraft" already exists"#
        );
    }

    #[sealed_test]
    fn install_scenario() -> anyhow::Result<()> {
        write_fixture("build/minecraft", "deadbeef01");
        write_fixture("assets/texture.png", [0xDE, 0xAD, 0xBE, 0xEF]);

        let installation = installer(PlatformFamily::Other).install()?;

        pretty_assertions::assert_eq!(
            installation,
            Installation {
                target_dir: PathBuf::from("./minecraft"),
                executable: PathBuf::from("./minecraft/minecraft"),
                assets: PathBuf::from("./minecraft/assets"),
                files: 1,
            }
        );
        assert!(Path::new("minecraft").is_dir());
        assert!(!Path::new("build/minecraft").exists());
        pretty_assertions::assert_eq!(fs::read_to_string("minecraft/minecraft")?, "deadbeef01");
        pretty_assertions::assert_eq!(fs::read("assets/texture.png")?, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        pretty_assertions::assert_eq!(
            fs::read("minecraft/assets/texture.png")?,
            vec![0xDE, 0xAD, 0xBE, 0xEF]
        );

        Ok(())
    }

    #[sealed_test]
    fn install_selects_windows_executable() -> anyhow::Result<()> {
        write_fixture("build/minecraft.exe", "MZ");
        write_fixture("build/minecraft", "ELF");
        write_fixture("assets/a", "a");

        installer(PlatformFamily::Windows).install()?;

        pretty_assertions::assert_eq!(fs::read_to_string("minecraft/minecraft.exe")?, "MZ");
        assert!(!Path::new("build/minecraft.exe").exists());
        assert!(!Path::new("minecraft/minecraft").exists());
        pretty_assertions::assert_eq!(fs::read_to_string("build/minecraft")?, "ELF");

        Ok(())
    }

    #[sealed_test]
    fn install_selects_bare_executable() -> anyhow::Result<()> {
        write_fixture("build/minecraft.exe", "MZ");
        write_fixture("build/minecraft", "ELF");
        write_fixture("assets/a", "a");

        installer(PlatformFamily::Other).install()?;

        pretty_assertions::assert_eq!(fs::read_to_string("minecraft/minecraft")?, "ELF");
        assert!(!Path::new("build/minecraft").exists());
        assert!(!Path::new("minecraft/minecraft.exe").exists());
        pretty_assertions::assert_eq!(fs::read_to_string("build/minecraft.exe")?, "MZ");

        Ok(())
    }

    #[sealed_test]
    fn install_twice_fails_on_existing_target() -> anyhow::Result<()> {
        write_fixture("build/minecraft", "deadbeef01");
        write_fixture("assets/texture.png", "png");
        installer(PlatformFamily::Other).install()?;

        write_fixture("build/minecraft", "cafebabe02");
        let error = installer(PlatformFamily::Other).install().unwrap_err();

        assert!(matches!(error, InstallError::DirectoryAlreadyExists { .. }));
        pretty_assertions::assert_eq!(error.step(), InstallStep::CreateTargetDir);
        pretty_assertions::assert_eq!(fs::read_to_string("minecraft/minecraft")?, "deadbeef01");
        pretty_assertions::assert_eq!(fs::read_to_string("build/minecraft")?, "cafebabe02");

        Ok(())
    }

    #[sealed_test]
    fn install_refuses_file_in_target_place() {
        write_fixture("minecraft", "not a directory");
        write_fixture("build/minecraft", "deadbeef01");

        let error = installer(PlatformFamily::Other).install().unwrap_err();

        assert!(matches!(error, InstallError::DirectoryAlreadyExists { .. }));
        assert!(Path::new("build/minecraft").exists());
    }

    #[sealed_test]
    fn install_stops_on_missing_executable() {
        write_fixture("assets/texture.png", "png");

        let error = installer(PlatformFamily::Other).install().unwrap_err();

        assert!(matches!(error, InstallError::SourceNotFound { .. }));
        pretty_assertions::assert_eq!(error.step(), InstallStep::RelocateExecutable);
        pretty_assertions::assert_eq!(error.path(), Path::new("./build/minecraft"));
        assert!(Path::new("minecraft").is_dir());
        assert!(!Path::new("minecraft/assets").exists());
    }

    #[sealed_test]
    fn install_stops_on_missing_assets() {
        write_fixture("build/minecraft", "deadbeef01");

        let error = installer(PlatformFamily::Other).install().unwrap_err();

        assert!(matches!(error, InstallError::SourceNotFound { .. }));
        pretty_assertions::assert_eq!(error.step(), InstallStep::CopyAssets);
        assert!(Path::new("minecraft/minecraft").exists());
        assert!(!Path::new("minecraft/assets").exists());
    }

    #[sealed_test]
    fn install_free_function_uses_working_directory() -> anyhow::Result<()> {
        let executable = PlatformFamily::current().executable_name("minecraft");
        write_fixture(Path::new("build").join(&executable), "deadbeef01");
        write_fixture("assets/texture.png", "png");

        let installation = install()?;

        pretty_assertions::assert_eq!(installation.files, 1);
        assert!(Path::new("minecraft").join(&executable).exists());
        assert!(Path::new("minecraft/assets/texture.png").exists());

        Ok(())
    }
}
