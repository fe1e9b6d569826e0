#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{error, process, time::Duration};

mod app;
mod commands;
mod interact;

use commands::Commands;

use isbn_search::Config;

use clap::{Args, Parser};
use log::{error, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> Result<(), Box<dyn error::Error>> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                interact,
                verbosity,
                quiet,
                retries,
                timeout,
                delay_ms,
                no_cache,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    // `quiet` and `interact` cannot be used together as there is no prompt to answer
    let interact = interact && !quiet;

    if interact {
        trace!("Interact mode enabled");
    }

    let defaults = Config::default();
    let config = Config {
        retries,
        timeout: Duration::from_secs(timeout),
        delay: Duration::from_millis(delay_ms),
        cache_capacity: if no_cache { 0 } else { defaults.cache_capacity },
        ..defaults
    };
    trace!("Using {config:?}");

    let message = command.execute(&config, interact)?;
    if !quiet {
        println!("{message}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<(), Box<dyn error::Error>> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "isbn-search")]
#[clap(about = "Validate, repair and look up ISBNs in the Library of Congress catalog and Google Books")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Enables interactive mode, which asks which correction to search when an invalid ISBN has
    /// more than one.
    #[clap(short, long, global = true)]
    interact: bool,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,

    /// Extra attempts for a request that fails to connect or times out
    #[clap(long, default_value = "3", global = true)]
    retries: u32,

    /// Timeout of a single request in seconds
    #[clap(long, default_value = "30", global = true)]
    timeout: u64,

    /// Wait after every request in milliseconds, the catalog asks for a low request rate
    #[clap(long, default_value = "1000", global = true)]
    delay_ms: u64,

    /// Do not reuse responses for repeated requests
    #[clap(long, global = true)]
    no_cache: bool,
}
