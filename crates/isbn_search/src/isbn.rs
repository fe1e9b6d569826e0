//! Validation, ISBN-10 to ISBN-13 conversion and candidate repair of ISBN strings.
//!
//! Every function here is pure: no I/O, no shared state, so they can be called from anywhere
//! and as often as needed. Invalid input is a normal outcome ([`Verdict::Invalid`]) and not an
//! [`Error`], only [`to_isbn13`] can fail and only when its caller breaks its contract.

use std::{collections::BTreeSet, fmt};

use log::trace;

use crate::{Error, ErrorKind};

const ISBN10_LEN: usize = 10;
const ISBN13_LEN: usize = 13;
const BOOKLAND_PREFIX: &str = "978";
const TRANSPOSED_PREFIX: &str = "987";
// number of trailing characters the repair heuristic reorders
const SUFFIX_LEN: usize = 4;

/// The classification of a raw ISBN string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// 13 digits with a valid check digit.
    Isbn13Valid,
    /// 10 characters with a valid check character (`X` stands for 10).
    Isbn10Valid,
    /// Anything else.
    Invalid,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Isbn13Valid => f.write_str("valid ISBN-13"),
            Verdict::Isbn10Valid => f.write_str("valid ISBN-10"),
            Verdict::Invalid => f.write_str("invalid ISBN"),
        }
    }
}

/// Classify `input` as a valid ISBN-13, a valid ISBN-10 or invalid.
///
/// No normalization is done, hyphens or whitespace make the input invalid. See [`normalize`].
///
/// # Examples
///
/// ```
/// use isbn_search::isbn::{validate, Verdict};
///
/// assert_eq!(Verdict::Isbn10Valid, validate("0306406152"));
/// assert_eq!(Verdict::Isbn13Valid, validate("9780306406157"));
/// assert_eq!(Verdict::Invalid, validate("978-0306406157"));
/// ```
#[must_use]
pub fn validate(input: &str) -> Verdict {
    if is_valid_isbn13(input) {
        Verdict::Isbn13Valid
    } else if is_valid_isbn10(input) {
        Verdict::Isbn10Valid
    } else {
        Verdict::Invalid
    }
}

/// Convert a valid ISBN-10 into its ISBN-13 form.
///
/// The ISBN-13 is the `978` prefix followed by the first nine digits of the ISBN-10 and a
/// recomputed check digit.
///
/// # Errors
///
/// An [`Err`] of kind [`ErrorKind::InvalidInput`] is returned when `input` is not a valid
/// ISBN-10.
pub fn to_isbn13(input: &str) -> Result<String, Error> {
    if validate(input) == Verdict::Isbn10Valid {
        Ok(isbn10_to_isbn13(input))
    } else {
        Err(Error::new(
            ErrorKind::InvalidInput,
            format!("'{input}' is not a valid ISBN-10"),
        ))
    }
}

/// Propose valid ISBN-13 strings for a 13 character `input` that fails its checksum.
///
/// Two narrow fixes are tried, never both:
/// - an input starting with `987` is tried with `978` instead,
/// - otherwise every ordering of the last four characters is tried.
///
/// Only orderings that pass the ISBN-13 checksum are returned. The set is empty when `input`
/// is already valid, is not 13 characters long or when nothing passes.
#[must_use]
pub fn repair(input: &str) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();

    let chars: Vec<char> = input.chars().collect();
    if chars.len() != ISBN13_LEN || validate(input) != Verdict::Invalid {
        return candidates;
    }

    if let Some(rest) = input.strip_prefix(TRANSPOSED_PREFIX) {
        trace!("'{input}' starts with '{TRANSPOSED_PREFIX}' - trying '{BOOKLAND_PREFIX}'");
        let swapped = format!("{BOOKLAND_PREFIX}{rest}");
        if is_valid_isbn13(&swapped) {
            candidates.insert(swapped);
        }
        return candidates;
    }

    let (prefix, suffix) = chars.split_at(ISBN13_LEN - SUFFIX_LEN);
    let mut suffix = suffix.to_vec();
    permute(&mut suffix, 0, &mut |ordering: &[char]| {
        let candidate: String = prefix.iter().chain(ordering).collect();
        if is_valid_isbn13(&candidate) {
            candidates.insert(candidate);
        }
    });

    trace!("{} candidate(s) found for '{input}'", candidates.len());
    candidates
}

/// Strip surrounding whitespace, inner spaces and hyphens from user input.
///
/// ```
/// assert_eq!("9780306406157", isbn_search::isbn::normalize(" 978-0-306-40615-7\n"));
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// The outcome of running an input through [`validate`] and then [`to_isbn13`] or [`repair`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Canonical {
    /// The input was already a valid ISBN-13.
    Isbn13(String),
    /// The input was a valid ISBN-10, `isbn13` is its converted form.
    Isbn10 {
        /// The input as given.
        isbn10: String,
        /// The derived ISBN-13.
        isbn13: String,
    },
    /// The input was invalid, `candidates` might be empty.
    Invalid {
        /// The input as given.
        input: String,
        /// Valid ISBN-13s proposed by [`repair`].
        candidates: BTreeSet<String>,
    },
}

impl Canonical {
    /// The [`Verdict`] that produced this outcome.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        match self {
            Canonical::Isbn13(_) => Verdict::Isbn13Valid,
            Canonical::Isbn10 { .. } => Verdict::Isbn10Valid,
            Canonical::Invalid { .. } => Verdict::Invalid,
        }
    }

    /// The ISBN-13s worth looking up for this outcome.
    #[must_use]
    pub fn lookup_isbns(&self) -> Vec<&str> {
        match self {
            Canonical::Isbn13(isbn) | Canonical::Isbn10 { isbn13: isbn, .. } => {
                vec![isbn.as_str()]
            }
            Canonical::Invalid { candidates, .. } => candidates.iter().map(String::as_str).collect(),
        }
    }
}

/// Validate `input` and either convert or repair it in one go.
#[must_use]
pub fn canonicalize(input: &str) -> Canonical {
    match validate(input) {
        Verdict::Isbn13Valid => Canonical::Isbn13(input.to_owned()),
        Verdict::Isbn10Valid => Canonical::Isbn10 {
            isbn10: input.to_owned(),
            isbn13: isbn10_to_isbn13(input),
        },
        Verdict::Invalid => Canonical::Invalid {
            input: input.to_owned(),
            candidates: repair(input),
        },
    }
}

fn digits(s: &str) -> Option<Vec<u32>> {
    s.chars().map(|c| c.to_digit(10)).collect()
}

fn isbn13_weighted_sum(digits: &[u32]) -> u32 {
    digits
        .iter()
        .zip([1, 3].iter().cycle())
        .map(|(d, w)| d * w)
        .sum()
}

fn is_valid_isbn13(input: &str) -> bool {
    match digits(input) {
        Some(d) if d.len() == ISBN13_LEN => isbn13_weighted_sum(&d) % 10 == 0,
        _ => false,
    }
}

fn is_valid_isbn10(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() != ISBN10_LEN {
        return false;
    }

    let mut sum = 0;
    for (i, (c, weight)) in chars.iter().zip((1..=10_u32).rev()).enumerate() {
        let value = match c.to_digit(10) {
            Some(d) => d,
            None if *c == 'X' && i == ISBN10_LEN - 1 => 10,
            None => return false,
        };
        sum += value * weight;
    }

    sum % 11 == 0
}

// caller guarantees `isbn10` is a valid ISBN-10
fn isbn10_to_isbn13(isbn10: &str) -> String {
    let mut isbn13 = String::with_capacity(ISBN13_LEN);
    isbn13.push_str(BOOKLAND_PREFIX);
    isbn13.extend(isbn10.chars().take(ISBN10_LEN - 1));

    let sum = digits(&isbn13).map_or(0, |d| isbn13_weighted_sum(&d));
    let check = (10 - sum % 10) % 10;
    isbn13.push_str(&check.to_string());
    isbn13
}

fn permute<F: FnMut(&[char])>(items: &mut [char], k: usize, visit: &mut F) {
    if k == items.len() {
        visit(items);
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permute(items, k + 1, visit);
        items.swap(k, i);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::{canonicalize, normalize, repair, to_isbn13, validate, Canonical, Verdict};
    use crate::ErrorKind;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn isbn10_check(first9: &[u32]) -> char {
        let sum: u32 = first9.iter().zip((2..=10_u32).rev()).map(|(d, w)| d * w).sum();
        match (11 - sum % 11) % 11 {
            10 => 'X',
            d => char::from_digit(d, 10).unwrap(),
        }
    }

    fn isbn13_check(first12: &[u32]) -> u32 {
        let sum: u32 = first12
            .iter()
            .zip([1, 3].iter().cycle())
            .map(|(d, w)| d * w)
            .sum();
        (10 - sum % 10) % 10
    }

    fn join(digits: &[u32]) -> String {
        digits.iter().map(u32::to_string).collect()
    }

    #[test]
    fn isbn_10_is_converted_to_isbn_13() {
        assert_eq!(Verdict::Isbn10Valid, validate("0306406152"));
        assert_eq!("9780306406157", to_isbn13("0306406152").unwrap());
    }

    #[test]
    fn isbn_10_with_x_check_character() {
        assert_eq!(Verdict::Isbn10Valid, validate("080442957X"));
        assert_eq!("9780804429573", to_isbn13("080442957X").unwrap());
        // lowercase x is not a check character
        assert_eq!(Verdict::Invalid, validate("080442957x"));
        // X is only allowed in the last position
        assert_eq!(Verdict::Invalid, validate("X804429570"));
    }

    #[test]
    fn valid_isbn_13() {
        assert_eq!(Verdict::Isbn13Valid, validate("9780306406157"));
        assert_eq!(Verdict::Isbn13Valid, validate("9780735619678"));
        assert_eq!(Verdict::Invalid, validate("9780306406158"));
    }

    #[test]
    fn to_isbn13_rejects_anything_but_isbn_10() {
        for input in ["9780306406157", "0306406153", "", "abc"] {
            let err = to_isbn13(input).expect_err("input is not a valid ISBN-10");
            assert_eq!(ErrorKind::InvalidInput, err.kind(), "{input}");
        }
    }

    #[test]
    fn transposed_prefix_is_repaired() {
        assert_eq!(Verdict::Invalid, validate("9870306406157"));
        assert_eq!(set(&["9780306406157"]), repair("9870306406157"));
    }

    #[test]
    fn transposed_prefix_rule_excludes_suffix_rule() {
        // swapping the prefix does not help and the suffix rule is not tried
        assert!(repair("9870306406158").is_empty());
    }

    #[test]
    fn scrambled_suffix_is_repaired() {
        let candidates = repair("9780306401576");

        assert!(candidates.contains("9780306406157"));
        assert_eq!(
            set(&[
                "9780306401657",
                "9780306401756",
                "9780306405167",
                "9780306405617",
                "9780306405716",
                "9780306405761",
                "9780306406157",
                "9780306406751",
            ]),
            candidates
        );
    }

    #[test]
    fn repeated_suffix_characters_give_each_candidate_once() {
        // 24 orderings of `1112` but only 4 distinct ones
        assert_eq!(
            set(&["9780306401121", "9780306402111"]),
            repair("9780306401112")
        );
        assert_eq!(
            set(&[
                "9780131102255",
                "9780131102552",
                "9780131105225",
                "9780131105522",
            ]),
            repair("9780131102525")
        );
    }

    #[test]
    fn unrepairable_input_gives_no_candidates() {
        assert_eq!(Verdict::Invalid, validate("1234567890123"));
        assert!(repair("1234567890123").is_empty());
    }

    #[test]
    fn repair_ignores_wrong_length_and_valid_input() {
        assert_eq!(Verdict::Invalid, validate(""));
        assert!(repair("").is_empty());
        assert!(repair("030640615").is_empty());
        assert!(repair("9780306406157").is_empty());
        assert!(repair("0306406152").is_empty());
    }

    #[test]
    fn non_digit_input_is_invalid() {
        assert_eq!(Verdict::Invalid, validate("97803064061a7"));
        assert_eq!(Verdict::Invalid, validate("978-0306406157"));
        assert!(repair("97803064061a7").is_empty());
        // multi byte characters are counted as characters, not bytes
        assert!(repair("978030640６157").is_empty());
    }

    #[test]
    fn normalize_strips_hyphens_and_whitespace() {
        assert_eq!("9780306406157", normalize("978-0-306-40615-7"));
        assert_eq!("080442957X", normalize("  0 8044 2957X \t"));
    }

    #[test]
    fn canonicalize_covers_each_verdict() {
        assert_eq!(
            Canonical::Isbn13("9780306406157".to_owned()),
            canonicalize("9780306406157")
        );

        let isbn10 = canonicalize("0306406152");
        assert_eq!(Verdict::Isbn10Valid, isbn10.verdict());
        assert_eq!(vec!["9780306406157"], isbn10.lookup_isbns());

        let invalid = canonicalize("9870306406157");
        assert_eq!(Verdict::Invalid, invalid.verdict());
        assert_eq!(vec!["9780306406157"], invalid.lookup_isbns());

        assert!(canonicalize("nonsense").lookup_isbns().is_empty());
    }

    proptest! {
        #[test]
        fn isbn_13_with_computed_check_digit_is_valid(first12 in prop::collection::vec(0_u32..10, 12)) {
            let check = isbn13_check(&first12);
            let valid = format!("{}{check}", join(&first12));
            prop_assert_eq!(Verdict::Isbn13Valid, validate(&valid));

            let wrong = format!("{}{}", join(&first12), (check + 1) % 10);
            prop_assert_eq!(Verdict::Invalid, validate(&wrong));
        }

        #[test]
        fn converted_isbn_10_is_valid_isbn_13(first9 in prop::collection::vec(0_u32..10, 9)) {
            let isbn10 = format!("{}{}", join(&first9), isbn10_check(&first9));
            prop_assert_eq!(Verdict::Isbn10Valid, validate(&isbn10));

            let isbn13 = to_isbn13(&isbn10).unwrap();
            prop_assert_eq!(Verdict::Isbn13Valid, validate(&isbn13));
            prop_assert!(isbn13.starts_with("978"));
            prop_assert_eq!(&isbn10[..9], &isbn13[3..12]);
        }

        #[test]
        fn repair_only_proposes_valid_isbn_13(input in "[0-9]{13}") {
            let candidates = repair(&input);
            for candidate in &candidates {
                prop_assert_eq!(13, candidate.len());
                prop_assert_eq!(Verdict::Isbn13Valid, validate(candidate));
            }
            prop_assert_eq!(candidates, repair(&input));
        }

        #[test]
        fn repair_of_valid_isbn_13_is_empty(first12 in prop::collection::vec(0_u32..10, 12)) {
            let valid = format!("{}{}", join(&first12), isbn13_check(&first12));
            prop_assert!(repair(&valid).is_empty());
        }
    }
}
