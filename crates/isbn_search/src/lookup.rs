use log::{info, warn};
use serde_json::Value;

use crate::{
    api::{
        self,
        marc::{self, IsbnField},
        Client, Retry, Throttle,
    },
    cache::Cached,
    isbn::{self, Verdict},
    record::{field, Record, Source},
    Config, Error, ErrorKind,
};

/// The client stack used outside of tests: cache, then throttle, then retry around `reqwest`.
pub type DefaultClient = Cached<Throttle<Retry<reqwest::blocking::Client>>>;

/// What a single service returned for a single ISBN.
#[derive(Debug)]
pub struct LookupResult {
    /// The service that was asked.
    pub source: Source,
    /// The ISBN that was looked up.
    pub isbn: String,
    /// The record built from the first match, if there was one.
    pub record: Option<Record>,
    /// The raw JSON response, `null` when the service had no response for the ISBN.
    pub raw: Value,
}

impl LookupResult {
    pub(crate) fn empty(source: Source, isbn: &str) -> Self {
        Self {
            source,
            isbn: isbn.to_owned(),
            record: None,
            raw: Value::Null,
        }
    }
}

/// Looks up ISBNs against the catalog services through one client.
///
/// Lookups for different ISBNs are independent of each other and can be made in any order.
#[derive(Debug)]
pub struct Lookup<C = DefaultClient> {
    client: C,
}

impl Lookup<DefaultClient> {
    /// Creates a lookup session using a `reqwest` client set up from `config`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        let client = Cached::new(
            Throttle::new(
                Retry::new(http, config.retries, config.backoff),
                config.delay,
            ),
            config.cache_capacity,
        );

        Ok(Self::with_client(client))
    }
}

impl<C: Client> Lookup<C> {
    /// Creates a lookup session around any [`Client`].
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }

    /// Search the Library of Congress catalog for `isbn`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request fails or the response cannot be deserialized.
    /// A service that has nothing for the ISBN is not an error, the result has no record.
    pub fn library_of_congress(&self, isbn: &str) -> Result<LookupResult, Error> {
        api::loc::get_record_by_isbn(&self.client, isbn)
    }

    /// Search Google Books for `isbn`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request fails or the response cannot be deserialized.
    /// A service that has nothing for the ISBN is not an error, the result has no record.
    pub fn google_books(&self, isbn: &str) -> Result<LookupResult, Error> {
        api::google_books::get_record_by_isbn(&self.client, isbn)
    }

    /// Search the given `source` for `isbn`.
    ///
    /// # Errors
    ///
    /// See [`Lookup::library_of_congress`] and [`Lookup::google_books`].
    pub fn search(&self, source: Source, isbn: &str) -> Result<LookupResult, Error> {
        match source {
            Source::LibraryOfCongress => self.library_of_congress(isbn),
            Source::GoogleBooks => self.google_books(isbn),
        }
    }

    /// Search every service for `isbn`, a failing service is logged and left out.
    pub fn search_all(&self, isbn: &str) -> Vec<LookupResult> {
        self.search_sources(isbn, &[Source::LibraryOfCongress, Source::GoogleBooks])
    }

    /// Search each of `sources` in order for `isbn`, a failing service is logged and left out.
    pub fn search_sources(&self, isbn: &str, sources: &[Source]) -> Vec<LookupResult> {
        sources
            .iter()
            .filter_map(|&source| match self.search(source, isbn) {
                Ok(result) => Some(result),
                Err(err) => {
                    warn!("{source} lookup for '{isbn}' failed: {err}");
                    None
                }
            })
            .collect()
    }

    /// Fetch the `020` fields of the MARC record behind a catalog `record`.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::NoValue`] is returned when the record has no catalog
    /// item link, otherwise see [`marc::parse_isbn_fields`].
    pub fn isbn_fields(&self, record: &Record) -> Result<Vec<IsbnField>, Error> {
        let lccn = record
            .get(field::MARC_RECORD)
            .and_then(marc::lccn_from_item_url)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NoValue,
                    "Record has no catalog item link to find its MARC record",
                )
            })?;
        marc::get_isbn_fields(&self.client, lccn)
    }

    /// Add the ISBNs of the other formats listed in the MARC record to `record`.
    ///
    /// ISBNs naming the same book as the record's own ISBN, in either form, are left out.
    ///
    /// # Errors
    ///
    /// See [`Lookup::isbn_fields`].
    pub fn add_alternate_isbns(&self, record: &mut Record) -> Result<Vec<IsbnField>, Error> {
        let fields = self.isbn_fields(record)?;

        let own = record.get(field::ISBN).map(as_isbn13);
        let mut alternates: Vec<&str> = Vec::new();
        for alternate in fields.iter().filter_map(IsbnField::isbn) {
            let same = own.as_deref() == Some(as_isbn13(alternate).as_str());
            if !same && !alternates.contains(&alternate) {
                alternates.push(alternate);
            }
        }

        info!("{} alternate ISBN(s) found", alternates.len());
        record.set(field::ALTERNATE_ISBN, alternates.join(", "));
        Ok(fields)
    }
}

fn as_isbn13(s: &str) -> String {
    let s = isbn::normalize(s);
    match isbn::validate(&s) {
        Verdict::Isbn10Valid => isbn::to_isbn13(&s).unwrap_or(s),
        _ => s,
    }
}
