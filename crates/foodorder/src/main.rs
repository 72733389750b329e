//! `foodorder` - interactive food ordering
//!
//! Loads configuration, opens the data directory and runs one interactive
//! session on the terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;

use foodorder::cli::{Cli, Session};
use foodorder::{init_logging, Config, JsonStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    cli.apply(&mut config);

    let store = JsonStore::from_config(&config).with_context(|| {
        format!(
            "opening data directory {}",
            config.storage.data_dir.display()
        )
    })?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(&store, &config, stdin.lock(), stdout.lock());
    session.run().context("terminal I/O failed")?;

    Ok(())
}
