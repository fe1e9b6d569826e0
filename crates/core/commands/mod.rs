use std::str::FromStr;

use crate::app;

use isbn_search::{isbn, record::Source, Config};

use clap::{Args, Subcommand};
use log::trace;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Check an ISBN without searching for it
    ///
    /// Prints whether the ISBN is a valid ISBN-13 or ISBN-10, the ISBN-13 form of an ISBN-10
    /// and the possible corrections of an invalid ISBN-13.
    #[clap(arg_required_else_help = true)]
    Check {
        /// The ISBN to check
        isbn: String,
    },

    /// Search the Library of Congress catalog by ISBN
    #[clap(arg_required_else_help = true)]
    Loc {
        /// The ISBN to search for
        isbn: String,

        /// Also fetch the MARC record to list the ISBNs of other formats
        #[clap(short, long)]
        marc: bool,

        #[clap(flatten)]
        output: OutputOpts,
    },

    /// Search Google Books by ISBN
    #[clap(arg_required_else_help = true)]
    Google {
        /// The ISBN to search for
        isbn: String,

        #[clap(flatten)]
        output: OutputOpts,
    },

    /// Search every service by ISBN
    #[clap(arg_required_else_help = true)]
    Search {
        /// The ISBN to search for
        isbn: String,

        /// Also fetch the MARC record to list the ISBNs of other formats
        #[clap(short, long)]
        marc: bool,

        #[clap(flatten)]
        output: OutputOpts,
    },
}

#[derive(Debug, Args)]
pub struct OutputOpts {
    /// How records are printed, either `text` or `bibtex`
    #[clap(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Print the raw JSON response after each record
    #[clap(long)]
    pub raw: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    BibTex,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "bibtex" => Ok(Self::BibTex),
            other => Err(format!(
                "'{other}' is not a known format, expected `text` or `bibtex`"
            )),
        }
    }
}

impl Commands {
    pub fn execute(self, config: &Config, interact: bool) -> eyre::Result<String> {
        match self {
            Commands::Check { isbn } => {
                trace!("check subcommand called with the value of '{isbn}'");
                let canonical = isbn::canonicalize(&isbn::normalize(&isbn));
                Ok(app::describe(&canonical))
            }
            Commands::Loc { isbn, marc, output } => app::search(
                &isbn,
                &[Source::LibraryOfCongress],
                &app::SearchOpts {
                    output,
                    marc,
                    interact,
                },
                config,
            ),
            Commands::Google { isbn, output } => app::search(
                &isbn,
                &[Source::GoogleBooks],
                &app::SearchOpts {
                    output,
                    marc: false,
                    interact,
                },
                config,
            ),
            Commands::Search { isbn, marc, output } => app::search(
                &isbn,
                &[Source::LibraryOfCongress, Source::GoogleBooks],
                &app::SearchOpts {
                    output,
                    marc,
                    interact,
                },
                config,
            ),
        }
    }
}
