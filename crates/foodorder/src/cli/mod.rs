//! Command-line interface for foodorder.
//!
//! The binary takes a handful of global options and then runs the
//! interactive [`Session`] on stdin/stdout.

mod shell;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

pub use shell::{MenuChoice, Session, MENU_TEXT};

/// foodorder - order food from a menu kept in plain JSON files
///
/// Starts an interactive session: browse the menu, fill a cart, check out,
/// and manage the menu and order history.
#[derive(Debug, Parser)]
#[command(name = "foodorder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the menu and orders documents
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }

    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir.clone_from(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            data_dir: None,
            verbose,
            quiet,
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "foodorder");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_no_args() {
        let cli = Cli::try_parse_from(["foodorder"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.data_dir.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["foodorder", "-c", "/custom/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["foodorder", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_rejects_positional() {
        assert!(Cli::try_parse_from(["foodorder", "checkout"]).is_err());
    }

    #[test]
    fn test_apply_data_dir_override() {
        let cli = Cli::try_parse_from(["foodorder", "--data-dir", "/srv/food"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/food"));
    }

    #[test]
    fn test_apply_without_override() {
        let mut config = Config::default();
        cli(0, false).apply(&mut config);
        assert_eq!(config, Config::default());
    }
}
