use log::{info, trace};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    lookup::LookupResult,
    record::{field, Record, Source},
    text, Error, ErrorKind,
};

use super::{null_as_default, Client};

const LOC_SEARCH_URL: &str = "https://www.loc.gov/search/";

pub(crate) fn search_url(isbn: &str) -> String {
    format!("{LOC_SEARCH_URL}?q={isbn}&fo=json")
}

pub(crate) fn get_record_by_isbn<C: Client>(client: &C, isbn: &str) -> Result<LookupResult, Error> {
    info!("Searching for ISBN '{isbn}' using the Library of Congress catalog");

    let raw: Value = match client.get_json(&search_url(isbn)) {
        Ok(raw) => raw,
        Err(err) if err.is_not_found() => {
            info!("No response from the catalog for '{isbn}': {err}");
            return Ok(LookupResult::empty(Source::LibraryOfCongress, isbn));
        }
        Err(err) => return Err(err),
    };

    trace!("Request was successful");

    let SearchModel { results } = serde_json::from_value(raw.clone())
        .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

    // only the first result is used so the others are never deserialized, they may describe
    // things other than books with differently shaped fields.
    let record = results
        .into_iter()
        .next()
        .map(serde_json::from_value::<SearchResult>)
        .transpose()
        .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?
        .map(|result| Record::from(result.build(isbn.to_owned())));

    Ok(LookupResult {
        source: Source::LibraryOfCongress,
        isbn: isbn.to_owned(),
        record,
        raw,
    })
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct SearchModel {
    #[serde(default, deserialize_with = "null_as_default")]
    results: Vec<Value>,
}

/// A single catalog search result, which does not include the ISBN searched for.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct SearchResult {
    id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    aka: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    item: CatalogItem,
}

#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
struct CatalogItem {
    title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    contributors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    created_published: Vec<String>,
}

#[cfg_attr(test, derive(Debug))]
struct CatalogBook {
    isbn: String,
    result: SearchResult,
}

impl SearchResult {
    #[allow(clippy::missing_const_for_fn)] // can't be const
    fn build(self, isbn: String) -> CatalogBook {
        CatalogBook {
            isbn,
            result: self,
        }
    }
}

/// With several contributors only those tagged as author or editor are named, unless none are.
fn contributor_names(contributors: &[String]) -> Option<String> {
    let mut selected: Vec<&String> = if contributors.len() > 1 {
        contributors.iter().filter(|c| text::has_role(c)).collect()
    } else {
        Vec::new()
    };
    if selected.is_empty() {
        selected = contributors.iter().collect();
    }

    let names: Vec<String> = selected
        .into_iter()
        .map(|c| text::title_case(&text::invert_name(&text::strip_roles(c))))
        .collect();

    let joined = text::join_authors(&names);
    (!joined.is_empty()).then_some(joined)
}

impl From<CatalogBook> for Record {
    fn from(book: CatalogBook) -> Self {
        // Deconstruct book to take ownership of fields (avoids cloning).
        let CatalogBook {
            isbn,
            result:
                SearchResult {
                    id,
                    mut aka,
                    item:
                        CatalogItem {
                            title,
                            contributors,
                            created_published,
                        },
                },
        } = book;

        let (publisher, year) = created_published
            .first()
            .map_or((None, None), |s| text::split_publication(s));

        let mut record = Record::new(Source::LibraryOfCongress);
        record.set(field::ISBN, isbn);
        record.set_opt(field::TITLE, title.as_deref().map(text::title_case));
        record.set_opt(field::AUTHOR, contributor_names(&contributors));
        record.set_opt(
            field::PUBLISHER,
            publisher.as_deref().map(text::title_case),
        );
        record.set_opt(field::COPYRIGHT_DATE, year);
        record.set_opt(field::MARC_RECORD, id);
        // the first alias is the item's own id, the second the catalog page
        if aka.len() > 1 {
            record.set(field::CATALOG_LINK, aka.swap_remove(1));
        }
        record
    }
}
