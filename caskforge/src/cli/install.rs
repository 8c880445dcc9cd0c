// caskforge/src/cli/install.rs
use std::fs;
use std::path::PathBuf;

use caskforge_common::config::Config;
use caskforge_common::error::Result;
use caskforge_common::model::cask::Cask;
use caskforge_common::requirement;
use caskforge_core::build::{devtools, preflight};
use caskforge_core::fetch::git;
use caskforge_core::install::{self, postflight};
use clap::Args;
use colored::Colorize;
use tracing::{debug, warn};

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Path to the cask definition JSON file.
    pub definition: PathBuf,

    /// Keep the staging directory around after a successful install.
    #[arg(long)]
    pub keep_stage: bool,
}

impl InstallArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let cask = Cask::load_from_file(&self.definition)?;
        println!(
            "{}{}",
            "==> ".bold().blue(),
            format!("Installing {} {}", cask.display_name(), cask.version_str()).bold()
        );

        // Platform gate first: no point building on unsupported hardware.
        if let Some(depends_on) = &cask.depends_on {
            let host_version = devtools::get_macos_version()?;
            requirement::check_platform(depends_on, &host_version, devtools::get_host_arch())?;
            debug!("Platform requirements satisfied");
        }

        // The stage is acquired whole and abandoned whole on failure; a
        // leftover from a previous attempt is discarded up front.
        let stage_path = config.cask_stage_path(&cask.token);
        if stage_path.exists() {
            debug!("Discarding stale stage {}", stage_path.display());
            fs::remove_dir_all(&stage_path)?;
        }
        fs::create_dir_all(&stage_path)?;

        git::ensure_checkout(&cask.source, &stage_path)?;

        let xcodebuild = devtools::find_xcodebuild()?;
        let staged_app_path = preflight::build_from_source(&cask, &stage_path, &xcodebuild)?;

        install::install_cask(&cask, &staged_app_path, config)?;

        if cask.postflight.launch_services_refresh {
            if let Some(app_name) = &cask.artifacts.app {
                postflight::refresh_launch_services(&config.applications_dir().join(app_name));
            }
        }

        if self.keep_stage {
            debug!("Keeping stage at {}", stage_path.display());
        } else if let Err(e) = fs::remove_dir_all(&stage_path) {
            warn!("Failed to clean up stage {}: {}", stage_path.display(), e);
        }

        println!(
            "{}{}",
            "==> ".bold().blue(),
            format!("{} {} installed", cask.display_name(), cask.version_str()).bold()
        );
        Ok(())
    }
}
