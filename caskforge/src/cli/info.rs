// caskforge/src/cli/info.rs
use std::path::PathBuf;

use caskforge_common::config::Config;
use caskforge_common::error::Result;
use caskforge_common::model::cask::Cask;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct Info {
    /// Path to the cask definition JSON file.
    pub definition: PathBuf,
}

impl Info {
    pub fn run(&self, _config: &Config) -> Result<()> {
        let cask = Cask::load_from_file(&self.definition)?;

        println!(
            "{} {}",
            cask.display_name().bold(),
            cask.version_str().green()
        );
        if let Some(desc) = &cask.desc {
            println!("{desc}");
        }
        if let Some(homepage) = &cask.homepage {
            println!("{}", homepage.blue().underline());
        }
        println!("Source: {} (built from source)", cask.source.url);
        if let Some(depends_on) = &cask.depends_on {
            if let Some(macos) = &depends_on.macos {
                println!("Requires: macOS {macos}");
            }
            if let Some(arch) = &depends_on.arch {
                println!("Requires: {arch} architecture");
            }
        }
        if !cask.zap.trash.is_empty() {
            println!("Zap paths:");
            for path in &cask.zap.trash {
                println!("  {path}");
            }
        }
        Ok(())
    }
}
