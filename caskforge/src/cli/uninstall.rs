// caskforge/src/cli/uninstall.rs
use std::path::PathBuf;

use caskforge_common::config::Config;
use caskforge_common::error::Result;
use caskforge_common::model::cask::Cask;
use caskforge_core::uninstall;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Path to the cask definition JSON file.
    pub definition: PathBuf,

    /// Also trash the cask's declared user data (preferences, saved state).
    #[arg(long)]
    pub zap: bool,
}

impl UninstallArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let cask = Cask::load_from_file(&self.definition)?;
        println!(
            "{}{}",
            "==> ".bold().blue(),
            format!("Uninstalling {}", cask.display_name()).bold()
        );

        uninstall::uninstall_cask(&cask, config)?;

        if self.zap {
            uninstall::zap(&cask, &config.home_dir());
        }

        println!(
            "{}{}",
            "==> ".bold().blue(),
            format!("{} uninstalled", cask.display_name()).bold()
        );
        Ok(())
    }
}
