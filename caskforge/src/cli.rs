// caskforge/src/cli.rs
//! Defines the command-line argument structure using clap.
use caskforge_common::config::Config;
use caskforge_common::error::Result;
use clap::{ArgAction, Parser, Subcommand};

pub mod info;
pub mod install;
pub mod uninstall;

use crate::cli::info::Info;
use crate::cli::install::InstallArgs;
use crate::cli::uninstall::UninstallArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "caskforge", bin_name = "caskforge")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Install(InstallArgs),
    Uninstall(UninstallArgs),
    Info(Info),
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Install(command) => command.run(config),
            Self::Uninstall(command) => command.run(config),
            Self::Info(command) => command.run(config),
        }
    }
}
