use log::{info, trace};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    lookup::LookupResult,
    record::{field, Record, Source},
    text, Error, ErrorKind,
};

use super::{null_as_default, Client};

const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes?q=isbn:";

pub(crate) fn get_record_by_isbn<C: Client>(client: &C, isbn: &str) -> Result<LookupResult, Error> {
    info!("Searching for ISBN '{isbn}' using Google Books API");
    let mut url = GOOGLE_BOOKS_URL.to_owned();
    url.push_str(isbn);

    let raw: Value = match client.get_json(&url) {
        Ok(raw) => raw,
        Err(err) if err.is_not_found() => {
            info!("No response from Google Books for '{isbn}': {err}");
            return Ok(LookupResult::empty(Source::GoogleBooks, isbn));
        }
        Err(err) => return Err(err),
    };

    trace!("Request was successful");

    let GoogleModel { items } = serde_json::from_value(raw.clone())
        .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

    let record = items
        .into_iter()
        .next()
        .map(|item| Record::from(item.build(isbn.to_owned())));

    Ok(LookupResult {
        source: Source::GoogleBooks,
        isbn: isbn.to_owned(),
        record,
        raw,
    })
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct GoogleModel {
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<Item>,
}

/// The API does not include the ISBN.. so this struct also acts as
/// a builder for the [`Book`] type, see [`Item::build`].
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    #[serde(rename = "volumeInfo", default, deserialize_with = "null_as_default")]
    volume_info: VolumeInfo,
}

#[cfg_attr(test, derive(Debug))]
struct Book {
    isbn: String,
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API, any of it may be missing.
#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    authors: Vec<String>,
    publisher: Option<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    #[serde(rename = "canonicalVolumeLink")]
    canonical_volume_link: Option<String>,
    #[serde(rename = "imageLinks")]
    image_links: Option<ImageLinks>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl Item {
    #[allow(clippy::missing_const_for_fn)] // can't be const
    fn build(self, isbn: String) -> Book {
        Book {
            isbn,
            volume_info: self.volume_info,
        }
    }
}

impl From<Book> for Record {
    fn from(book: Book) -> Self {
        // Deconstruct book to take ownership of fields (avoids cloning).
        let Book {
            isbn,
            volume_info:
                VolumeInfo {
                    title,
                    authors,
                    publisher,
                    published_date,
                    canonical_volume_link,
                    image_links,
                },
        } = book;

        let authors: Vec<String> = authors
            .iter()
            .map(|a| text::title_case(&text::strip_roles(a)))
            .collect();

        let mut record = Record::new(Source::GoogleBooks);
        record.set(field::ISBN, isbn);
        record.set_opt(field::TITLE, title);
        record.set(field::AUTHOR, text::join_authors(&authors));
        record.set_opt(field::PUBLISHER, publisher);
        record.set_opt(
            field::COPYRIGHT_DATE,
            published_date.as_deref().and_then(text::year_prefix),
        );
        record.set_opt(field::CANONICAL_LINK, canonical_volume_link);
        record.set_opt(field::THUMBNAIL, image_links.and_then(|l| l.thumbnail));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::{GoogleModel, Item, VolumeInfo};
    use crate::{
        api::{assert_url, impl_text_producer, MockClient, NotFoundProducer},
        record::{field, Record, Source},
    };

    const GOOGLE_BOOK_JSON: &str = include_str!("../../tests/data/google_book.json");

    impl_text_producer! {
        ValidJsonProducer => Ok(GOOGLE_BOOK_JSON.to_owned()),
        EmptyBookProducer => Ok(
            r#"{
                "items": []
            }"#.to_owned()
        ),
        NoItemsProducer => Ok(r#"{"kind": "books#volumes", "totalItems": 0}"#.to_owned()),
        NullFieldsProducer => Ok(
            r#"{"items": [{"volumeInfo": {"title": "Code Complete", "authors": null}}]}"#.to_owned()
        ),
        NullVolumeInfoProducer => Ok(r#"{"items": [{"volumeInfo": null}]}"#.to_owned()),
    }

    #[test]
    fn isbn_url_format_is_correct() {
        let client = MockClient::<ValidJsonProducer>::default();
        assert!(super::get_record_by_isbn(&client, "9780735619678").is_ok());
        assert_url!("https://www.googleapis.com/books/v1/volumes?q=isbn:9780735619678");
    }

    #[test]
    fn no_items_produce_no_record() {
        let client = MockClient::<EmptyBookProducer>::default();
        assert!(super::get_record_by_isbn(&client, "test")
            .unwrap()
            .record
            .is_none());

        let client = MockClient::<NoItemsProducer>::default();
        let res = super::get_record_by_isbn(&client, "test").unwrap();
        assert!(res.record.is_none());
        assert_eq!(Some(0), res.raw["totalItems"].as_u64());
    }

    #[test]
    fn null_fields_are_left_out_of_record() {
        let client = MockClient::<NullFieldsProducer>::default();
        let record = super::get_record_by_isbn(&client, "9780735619678")
            .expect("null authors are treated as missing")
            .record
            .expect("first item becomes a record");

        assert_eq!(Some("Code Complete"), record.get(field::TITLE));
        assert_eq!(None, record.get(field::AUTHOR));
        assert_eq!(2, record.len());

        let client = MockClient::<NullVolumeInfoProducer>::default();
        let record = super::get_record_by_isbn(&client, "9780735619678")
            .expect("null volume info is treated as missing")
            .record
            .expect("first item becomes a record");
        assert_eq!(1, record.len());
    }

    #[test]
    fn not_found_status_produces_no_record() {
        let client = MockClient::<NotFoundProducer>::default();
        assert!(super::get_record_by_isbn(&client, "test")
            .unwrap()
            .record
            .is_none());
    }

    #[test]
    fn valid_json_produces_record() {
        let client = MockClient::<ValidJsonProducer>::default();
        let res = super::get_record_by_isbn(&client, "9780735619678")
            .expect("ValidJsonProducer always produces a valid json String to be deserialized");

        let record = res.record.expect("Should produce a record");
        assert_eq!(Source::GoogleBooks, record.source());
        assert_eq!(Some("9780735619678"), record.get(field::ISBN));
        assert_eq!(Some("Code Complete"), record.get(field::TITLE));
        assert_eq!(Some("Steve Mcconnell"), record.get(field::AUTHOR));
        assert_eq!(Some("DV-Professional"), record.get(field::PUBLISHER));
        assert_eq!(Some("2004"), record.get(field::COPYRIGHT_DATE));
        assert_eq!(
            Some("https://books.google.com/books/about/Code_Complete.html?hl=&id=LpVCAwAAQBAJ"),
            record.get(field::CANONICAL_LINK)
        );
        assert!(record
            .get(field::THUMBNAIL)
            .unwrap()
            .starts_with("http://books.google.com/books/content"));
    }

    #[test]
    fn missing_volume_fields_are_omitted() {
        let item = Item {
            volume_info: VolumeInfo {
                title: Some("Ignore".to_owned()),
                published_date: Some("sometime".to_owned()),
                ..VolumeInfo::default()
            },
        };

        let record = Record::from(item.build("Ignore".to_owned()));

        let names: Vec<_> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(vec![field::ISBN, field::TITLE], names);
    }

    #[test]
    fn several_authors_are_joined() {
        let item = Item {
            volume_info: VolumeInfo {
                authors: vec!["brian w. kernighan".to_owned(), "Dennis Ritchie, editor".to_owned()],
                ..VolumeInfo::default()
            },
        };

        let record = Record::from(item.build("Ignore".to_owned()));
        assert_eq!(
            Some("Brian W. Kernighan; Dennis Ritchie"),
            record.get(field::AUTHOR)
        );
    }

    #[test]
    fn book_can_be_derived_from_json() {
        let isbn = "0735619670";
        let mut model: GoogleModel = serde_json::from_str(GOOGLE_BOOK_JSON).unwrap();
        let book = &model.items.remove(0).build(isbn.to_owned());

        // ISBN is not in the response so will be the value it was built with.
        assert_eq!(isbn, book.isbn);
        assert_eq!("Steve McConnell", book.volume_info.authors[0]);
        assert_eq!(Some("Code Complete"), book.volume_info.title.as_deref());
        assert_eq!(Some("DV-Professional"), book.volume_info.publisher.as_deref());
        assert_eq!(Some("2004"), book.volume_info.published_date.as_deref());
    }
}
