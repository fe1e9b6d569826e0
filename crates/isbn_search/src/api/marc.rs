//! Alternate format ISBNs from the MARC record of a catalog item.
//!
//! MARC field `020` holds the ISBNs of a bibliographic record, subfield `a` the ISBN itself
//! (often followed by a qualifier such as `(pbk.)`) and subfield `q` a separate qualifier.

use std::borrow::Cow;

use log::{info, trace};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::{Error, ErrorKind};

use super::Client;

const LCCN_URL: &str = "https://lccn.loc.gov/";
const ISBN_TAG: &str = "020";

/// One `020` data field of a MARC record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IsbnField {
    /// `(code, value)` pairs in document order.
    pub subfields: Vec<(char, String)>,
}

impl IsbnField {
    /// The ISBN of subfield `a` without any qualifier.
    #[must_use]
    pub fn isbn(&self) -> Option<&str> {
        self.subfield('a').and_then(|a| a.split_whitespace().next())
    }

    /// The first value of subfield `code`.
    #[must_use]
    pub fn subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, value)| value.as_str())
    }
}

/// The LCCN is the last path segment of a catalog item URL.
///
/// ```
/// use isbn_search::api::marc::lccn_from_item_url;
///
/// assert_eq!(Some("2004049981"), lccn_from_item_url("http://www.loc.gov/item/2004049981/"));
/// ```
#[must_use]
pub fn lccn_from_item_url(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
}

pub(crate) fn marcxml_url(lccn: &str) -> String {
    format!("{LCCN_URL}{lccn}/marcxml")
}

pub(crate) fn get_isbn_fields<C: Client>(client: &C, lccn: &str) -> Result<Vec<IsbnField>, Error> {
    info!("Fetching the MARC record for LCCN '{lccn}'");
    let xml = client.get_text(&marcxml_url(lccn))?;
    parse_isbn_fields(&xml)
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, Error> {
    e.try_get_attribute(name)
        .map_err(|err| Error::wrap(ErrorKind::Deserialize, err))?
        .map(|attr| {
            attr.unescape_value()
                .map(Cow::into_owned)
                .map_err(|err| Error::wrap(ErrorKind::Deserialize, err))
        })
        .transpose()
}

/// Collect every `020` data field of a MARCXML document.
///
/// Namespace prefixes on element names are ignored.
///
/// # Errors
///
/// An [`Err`] of kind [`ErrorKind::Deserialize`] is returned when the document is not well
/// formed XML.
pub fn parse_isbn_fields(xml: &str) -> Result<Vec<IsbnField>, Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut fields = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<IsbnField> = None;
    let mut code: Option<char> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"datafield" => {
                    if attribute(e, "tag")?.as_deref() == Some(ISBN_TAG) {
                        current = Some(IsbnField::default());
                    }
                }
                b"subfield" if current.is_some() => {
                    code = attribute(e, "code")?.and_then(|c| c.chars().next());
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let (Some(field), Some(code)) = (current.as_mut(), code) {
                    let value = e
                        .unescape()
                        .map_err(|err| Error::wrap(ErrorKind::Deserialize, err))?;
                    field.subfields.push((code, value.into_owned()));
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"datafield" => {
                    if let Some(field) = current.take() {
                        fields.push(field);
                    }
                }
                b"subfield" => code = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(Error::wrap(ErrorKind::Deserialize, err)),
            _ => {}
        }
        buf.clear();
    }

    trace!("{} ISBN field(s) found in MARC record", fields.len());
    Ok(fields)
}
