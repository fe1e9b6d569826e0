use crate::record::{field, Record};

use super::Format;

/// A type wrapper around [`String`] to represent a `BibTex` format string.
#[derive(Debug)]
pub struct BibTex(String);

impl Format for BibTex {
    fn compose(record: &Record) -> Self {
        Self(format!(
            "@book{{{},\n{}}}\n",
            cite_key(record),
            compose_fields(&bibtex_fields(record))
        ))
    }

    fn raw(self) -> String {
        self.0
    }

    fn name() -> &'static str {
        "BibTex"
    }
}

/// First author with whitespace removed followed by the year, else the ISBN.
fn cite_key(record: &Record) -> String {
    let author = record
        .get(field::AUTHOR)
        .and_then(|a| a.split(';').next())
        .map(|a| a.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|a| !a.is_empty());

    match (author, record.get(field::COPYRIGHT_DATE)) {
        (Some(mut cite), year) => {
            cite.push_str(year.unwrap_or_default());
            cite
        }
        (None, _) => format!("isbn{}", record.get(field::ISBN).unwrap_or_default()),
    }
}

fn bibtex_fields(record: &Record) -> Vec<(&'static str, String)> {
    let url = record
        .get(field::CATALOG_LINK)
        .or_else(|| record.get(field::CANONICAL_LINK));

    [
        ("isbn", record.get(field::ISBN).map(str::to_owned)),
        ("title", record.get(field::TITLE).map(str::to_owned)),
        (
            "author",
            record.get(field::AUTHOR).map(|a| a.replace("; ", " and ")),
        ),
        ("publisher", record.get(field::PUBLISHER).map(str::to_owned)),
        ("year", record.get(field::COPYRIGHT_DATE).map(str::to_owned)),
        ("url", url.map(str::to_owned)),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name, v)))
    .collect()
}

fn bibtex_esc(s: &str) -> String {
    format!("{{{s}}}")
}

fn compose_fields(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("    {} = {},\n", name, bibtex_esc(value)))
        .collect()
}
