#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # isbn_search
//!
//! isbn_search validates and repairs ISBNs and looks up bibliographic records for them from the
//! Library of Congress catalog and Google Books.
//!
//! The [`isbn`] module is a pure library: [`isbn::validate`] classifies a string,
//! [`isbn::to_isbn13`] converts an ISBN-10 and [`isbn::repair`] proposes valid ISBN-13s for a
//! mistyped one. Network lookups go through a [`Lookup`] session.
//!
//! ```no_run
//! use isbn_search::{isbn, Config, Lookup};
//!
//! let canonical = isbn::canonicalize("0735619670");
//! let lookup = Lookup::new(&Config::default())?;
//! for isbn in canonical.lookup_isbns() {
//!     for result in lookup.search_all(isbn) {
//!         println!("{}: {:?}", result.source, result.record);
//!     }
//! }
//! # Ok::<(), isbn_search::Error>(())
//! ```

pub mod api;
pub mod cache;
mod config;
mod error;
pub mod format;
pub mod isbn;
mod lookup;
pub mod record;
pub mod text;

pub use config::Config;
pub use error::{Error, ErrorKind};
pub use lookup::{DefaultClient, Lookup, LookupResult};
