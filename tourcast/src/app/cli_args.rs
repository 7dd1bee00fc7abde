use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tourcast")]
#[command(about = "trip linking and tour extraction for household travel diary surveys")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// link raw trip segments into trips and extract tours
    Run {
        /// path to a TOML run configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}
