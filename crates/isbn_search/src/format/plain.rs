use crate::{
    record::{field, Record},
    text,
};

use super::Format;

/// One `Label: value` line per field, in record order.
#[derive(Debug)]
pub struct Plain(String);

fn label(name: &str) -> String {
    match name {
        field::ISBN => "ISBN".to_owned(),
        field::MARC_RECORD => "MARC record".to_owned(),
        field::CATALOG_LINK => "Library of Congress catalog".to_owned(),
        field::ALTERNATE_ISBN => "Alternate ISBNs".to_owned(),
        other => text::title_case(other),
    }
}

impl Format for Plain {
    fn compose(record: &Record) -> Self {
        let s = record
            .fields()
            .iter()
            .map(|f| format!("{}: {}\n", label(&f.name), f.value))
            .collect();
        Self(s)
    }

    fn raw(self) -> String {
        self.0
    }

    fn name() -> &'static str {
        "Plain text"
    }
}
