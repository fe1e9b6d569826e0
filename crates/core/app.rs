use std::fmt::Write;

use eyre::{eyre, Context};
use log::{info, trace, warn};

use isbn_search::{
    api::Client,
    format::{BibTex, Format, Plain},
    isbn::{self, Canonical, Verdict},
    record::{Record, Source},
    Config, Lookup, LookupResult,
};

use crate::{
    commands::{OutputFormat, OutputOpts},
    interact::user_select,
};

pub struct SearchOpts {
    pub output: OutputOpts,
    pub marc: bool,
    pub interact: bool,
}

/// Human readable verdict of `canonical`, listing the conversion or corrections.
pub fn describe(canonical: &Canonical) -> String {
    match canonical {
        Canonical::Isbn13(isbn) => format!("'{isbn}' is a valid ISBN-13"),
        Canonical::Isbn10 { isbn10, isbn13 } => {
            format!("'{isbn10}' is a valid ISBN-10\nISBN-13: {isbn13}")
        }
        Canonical::Invalid { input, candidates } if candidates.is_empty() => {
            format!("'{input}' is not a valid ISBN and no corrections were found")
        }
        Canonical::Invalid { input, candidates } => {
            let mut s = format!("'{input}' is not a valid ISBN, did you mean:");
            for candidate in candidates {
                s.push_str("\n    ");
                s.push_str(candidate);
            }
            s
        }
    }
}

/// The ISBNs to search for, asking the user to pick a correction when interactive.
pub fn select_isbns(canonical: &Canonical, interact: bool) -> eyre::Result<Vec<String>> {
    match canonical {
        Canonical::Invalid { input, candidates } if candidates.is_empty() => Err(eyre!(
            "'{input}' is not a valid ISBN and no corrections were found"
        )),
        Canonical::Invalid { candidates, .. } if interact && candidates.len() > 1 => {
            let items: Vec<&String> = candidates.iter().collect();
            let index = user_select("Which ISBN did you mean", &items)?;
            Ok(vec![items[index].clone()])
        }
        other => Ok(other.lookup_isbns().into_iter().map(str::to_owned).collect()),
    }
}

pub fn search(
    input: &str,
    sources: &[Source],
    opts: &SearchOpts,
    config: &Config,
) -> eyre::Result<String> {
    let canonical = isbn::canonicalize(&isbn::normalize(input));
    info!("'{input}' is a {}", canonical.verdict());

    let isbns = select_isbns(&canonical, opts.interact)?;
    let lookup = Lookup::new(config).wrap_err("Cannot create the HTTP client")?;

    search_with(&lookup, &canonical, &isbns, sources, opts)
}

/// Look up each of `isbns` in every one of `sources` and render what came back.
///
/// Failing services are skipped, it is only an error when none of them answered.
pub fn search_with<C: Client>(
    lookup: &Lookup<C>,
    canonical: &Canonical,
    isbns: &[String],
    sources: &[Source],
    opts: &SearchOpts,
) -> eyre::Result<String> {
    let mut out = String::new();
    if canonical.verdict() != Verdict::Isbn13Valid {
        out.push_str(&describe(canonical));
        out.push('\n');
    }

    let mut answered = 0;
    for isbn in isbns {
        for result in lookup.search_sources(isbn, sources) {
            answered += 1;
            render_result(&mut out, lookup, result, opts)?;
        }
    }

    if answered == 0 {
        return Err(eyre!(
            "No service could be reached to look up '{}'",
            isbns.join("', '")
        ));
    }

    Ok(out.trim().to_owned())
}

fn render_result<C: Client>(
    out: &mut String,
    lookup: &Lookup<C>,
    result: LookupResult,
    opts: &SearchOpts,
) -> eyre::Result<()> {
    let LookupResult {
        source,
        isbn,
        record,
        raw,
    } = result;

    writeln!(out, "\n== {source}: {isbn} ==")?;

    match record {
        Some(mut record) => {
            if opts.marc && source == Source::LibraryOfCongress {
                if let Err(err) = lookup.add_alternate_isbns(&mut record) {
                    warn!("Cannot list the ISBNs of other formats for '{isbn}': {err}");
                }
            }
            out.push_str(&match opts.output.format {
                OutputFormat::Text => compose::<Plain>(&record),
                OutputFormat::BibTex => compose::<BibTex>(&record),
            });
        }
        None => writeln!(out, "No results found for {isbn}")?,
    }

    if opts.output.raw {
        let json = serde_json::to_string_pretty(&raw).wrap_err("Cannot print the raw response")?;
        writeln!(out, "{json}")?;
    }

    Ok(())
}

fn compose<F: Format>(record: &Record) -> String {
    trace!("Composing the {} record as {}", record.source(), F::name());
    F::compose(record).raw()
}
