//! The bibliographic record produced by a lookup.

use std::fmt;

/// Well known field names used by the lookups.
pub mod field {
    /// The ISBN the record was looked up with.
    pub const ISBN: &str = "isbn";
    /// Title of the book.
    pub const TITLE: &str = "title";
    /// Authors and editors, `; ` separated.
    pub const AUTHOR: &str = "author";
    /// Publisher name.
    pub const PUBLISHER: &str = "publisher";
    /// Four digit copyright year.
    pub const COPYRIGHT_DATE: &str = "copyright date";
    /// Catalog page of the record.
    pub const CATALOG_LINK: &str = "catalog link";
    /// Link to the MARC record.
    pub const MARC_RECORD: &str = "marc record";
    /// Canonical volume page.
    pub const CANONICAL_LINK: &str = "canonical link";
    /// Cover image.
    pub const THUMBNAIL: &str = "thumbnail";
    /// ISBNs of other formats of the same book.
    pub const ALTERNATE_ISBN: &str = "alternate isbn";
}

/// The service a [`Record`] was built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// The Library of Congress catalog search.
    LibraryOfCongress,
    /// The Google Books volumes API.
    GoogleBooks,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::LibraryOfCongress => f.write_str("Library of Congress"),
            Source::GoogleBooks => f.write_str("Google Books"),
        }
    }
}

/// A single named value of a [`Record`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Name of the field, unique within a record.
    pub name: String,
    /// Value of the field, never empty.
    pub value: String,
}

/// An ordered set of fields describing one book.
///
/// Field names are unique and keep the order they were first set in. Absent values are never
/// stored, setting `None` or an empty string is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    source: Source,
    fields: Vec<Field>,
}

impl Record {
    /// Creates an empty record for the `source`.
    #[must_use]
    pub const fn new(source: Source) -> Self {
        Self {
            source,
            fields: Vec::new(),
        }
    }

    /// The service this record was built from.
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Sets the field `name` to `value`, replacing an existing value in place.
    pub fn set<S: Into<String>>(&mut self, name: &str, value: S) {
        let value = value.into();
        if value.is_empty() {
            return;
        }

        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value;
        } else {
            self.fields.push(Field {
                name: name.to_owned(),
                value,
            });
        }
    }

    /// Sets the field `name` only when there is a value.
    pub fn set_opt<S: Into<String>>(&mut self, name: &str, value: Option<S>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    /// Gets the value of the field `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// The fields in the order they were set.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
