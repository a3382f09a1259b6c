// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Install a built minecraft executable alongside its assets.
//!
//! The installer expects to be run from a directory holding the output of a
//! build, i.e., a `build/` directory with the executable in it, and an
//! `assets/` directory with everything the executable needs at runtime. A
//! fresh `minecraft/` directory is created, the executable is moved into it,
//! and the asset tree is copied next to it.
//!
//! # See Also
//!
//! 1. [`install`](crate::install::install)
//! 2. [`InstallLayout`](crate::layout::InstallLayout)

pub mod install;
pub mod layout;
pub mod platform;

pub use install::{install, InstallError, InstallStep, Installation, Installer};
pub use layout::InstallLayout;
pub use platform::PlatformFamily;
