// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use mcinstall::{InstallLayout, Installer, PlatformFamily};

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::{process::exit, time::Duration};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install build/minecraft and assets/ into a fresh minecraft/ directory.
#[derive(Debug, Clone, Parser)]
#[command(about, long_about = None, version)]
struct Cli {}

impl Cli {
    fn run(self) -> Result<()> {
        let layout = InstallLayout::default();
        let platform = PlatformFamily::current();
        debug!("install layout:\n{layout}");

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} copy assets [{pos} files] {wide_msg}")?
                .tick_chars("-Cco. "),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        let result = Installer::new(layout, platform)
            .with_progress(bar.clone())
            .install();
        bar.finish_and_clear();

        let installation = result?;
        info!(
            "installed {:?} with {} asset files into {:?}",
            installation.executable.display(),
            installation.files,
            installation.target_dir.display()
        );

        Ok(())
    }
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}
