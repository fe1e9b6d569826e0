//! Clean up of the raw strings the catalog services return.

const ROLE_WORDS: [&str; 2] = ["author", "editor"];
const PUNCT: [char; 3] = [' ', ',', '.'];

/// Uppercase the first letter of every run of letters and lowercase the rest of the run.
///
/// ```
/// use isbn_search::text::title_case;
///
/// assert_eq!("Code Complete", title_case("code COMPLETE"));
/// assert_eq!("Twenty-First Century", title_case("twenty-first century"));
/// ```
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Does the contributor string carry an author or editor role?
#[must_use]
pub fn has_role(s: &str) -> bool {
    ROLE_WORDS.iter().any(|role| s.contains(role))
}

/// Remove role words and the punctuation left around them.
#[must_use]
pub fn strip_roles(s: &str) -> String {
    let stripped = ROLE_WORDS
        .iter()
        .fold(s.to_owned(), |acc, role| acc.replace(role, ""));
    stripped.trim_matches(&PUNCT[..]).to_owned()
}

/// Turn `"Last, First"` into `"First Last"`.
///
/// Strings without a comma are only trimmed. Anything after a second comma (dates, titles) is
/// dropped.
#[must_use]
pub fn invert_name(s: &str) -> String {
    let mut parts = s.split(',').map(str::trim);
    match (parts.next(), parts.next()) {
        (Some(last), Some(first)) if !first.is_empty() => format!("{first} {last}"),
        (Some(last), _) => last.to_owned(),
        _ => String::new(),
    }
}

/// Join author names for display.
#[must_use]
pub fn join_authors<S: AsRef<str>>(authors: &[S]) -> String {
    authors
        .iter()
        .map(AsRef::as_ref)
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The first four characters of a date when they are all digits.
#[must_use]
pub fn year_prefix(date: &str) -> Option<String> {
    let year: String = date.chars().take(4).collect();
    (year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())).then_some(year)
}

/// Split a catalog publication statement into publisher and year.
///
/// The statement looks like `"Redmond, Wash. : Microsoft Press, c2004."`. The publisher is the
/// text after the first colon, the year is the trailing four digits.
///
/// ```
/// use isbn_search::text::split_publication;
///
/// assert_eq!(
///     (Some("Microsoft Press".to_owned()), Some("2004".to_owned())),
///     split_publication("Redmond, Wash. : Microsoft Press, c2004.")
/// );
/// ```
#[must_use]
pub fn split_publication(statement: &str) -> (Option<String>, Option<String>) {
    let publishing = statement
        .split_once(':')
        .map_or(statement, |(_, rest)| rest)
        .trim_matches(&PUNCT[..]);

    let tail_start = publishing
        .char_indices()
        .rev()
        .nth(3)
        .map_or(0, |(i, _)| i);
    let (head, tail) = publishing.split_at(tail_start);

    let (publisher, year) = if tail.len() == 4 && tail.chars().all(|c| c.is_ascii_digit()) {
        // copyright marker in front of the year, "c2004"
        let head = head
            .strip_suffix('c')
            .filter(|h| h.ends_with(' ') || h.ends_with(','))
            .unwrap_or(head);
        (head, Some(tail.to_owned()))
    } else {
        (publishing, None)
    };

    let publisher = publisher.trim_matches(&PUNCT[..]);
    let publisher = (!publisher.is_empty()).then_some(publisher.to_owned());
    (publisher, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_lowercases_inside_words() {
        assert_eq!("Microsoft Press", title_case("MICROSOFT PRESS"));
        assert_eq!("O'Reilly", title_case("o'reilly"));
        assert_eq!("", title_case(""));
    }

    #[test]
    fn roles_are_stripped() {
        assert!(has_role("McConnell, Steve, author"));
        assert!(!has_role("McConnell, Steve"));
        assert_eq!("McConnell, Steve", strip_roles("McConnell, Steve, author."));
        assert_eq!("Knuth, Donald", strip_roles("Knuth, Donald, editor"));
    }

    #[test]
    fn names_are_inverted() {
        assert_eq!("Steve McConnell", invert_name("McConnell, Steve"));
        assert_eq!("Steve McConnell", invert_name("McConnell, Steve, 1962-"));
        assert_eq!("Plato", invert_name(" Plato "));
        assert_eq!("Plato", invert_name("Plato,"));
    }

    #[test]
    fn authors_are_joined() {
        assert_eq!("A; B", join_authors(&["A", "", "B"]));
        assert_eq!("", join_authors::<&str>(&[]));
    }

    #[test]
    fn year_prefix_requires_digits() {
        assert_eq!(Some("2004".to_owned()), year_prefix("2004-06-09"));
        assert_eq!(Some("1999".to_owned()), year_prefix("1999"));
        assert_eq!(None, year_prefix("19"));
        assert_eq!(None, year_prefix("circa 2000"));
    }

    #[test]
    fn publication_without_year() {
        assert_eq!(
            (Some("Penguin".to_owned()), None),
            split_publication("London : Penguin.")
        );
    }

    #[test]
    fn publication_without_place() {
        assert_eq!(
            (Some("Penguin Books".to_owned()), Some("1999".to_owned())),
            split_publication("Penguin Books, 1999.")
        );
    }

    #[test]
    fn publication_publisher_ending_in_c_is_kept() {
        assert_eq!(
            (Some("Atlantic".to_owned()), Some("2010".to_owned())),
            split_publication("New York : Atlantic2010")
        );
    }

    #[test]
    fn empty_publication() {
        assert_eq!((None, None), split_publication(""));
    }
}
