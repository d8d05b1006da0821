use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "stellar-checker",
    about = "Checks that submitted sites run the Stellar theme and labels their issues",
    version,
    author,
    long_about = None
)]
pub struct CheckerCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.yml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape submissions, verify every site, update issues and write the error report
    Check {
        /// GitHub token used for labels and comments
        #[arg(env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Verify and report without touching any issue
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },

    /// Only collect submissions from the issue list
    Scrape {
        /// Also write the submissions to <version>/data.json
        #[arg(short, long, default_value = "false")]
        output: bool,
    },

    /// Verify a single site URL
    Verify {
        /// Site to check
        url: String,
    },
}
