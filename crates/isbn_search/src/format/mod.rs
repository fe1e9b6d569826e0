//! Contains the [`Format`] trait and its implementations for rendering a [`Record`].

mod bibtex;
mod plain;

use crate::record::Record;
pub use bibtex::BibTex;
pub use plain::Plain;

/// A textual representation composed from a [`Record`].
///
/// Formats are promises at the type level about what a [`String`] (or similar) represents.
pub trait Format {
    /// Composes a [`Record`] to this [`Format`].
    ///
    /// This function should not fail as every [`Format`] must be able to represent every
    /// [`Record`], missing fields are left out.
    fn compose(record: &Record) -> Self;

    /// The current [`Format`] in a raw [`String`].
    fn raw(self) -> String;

    /// The display name of the format.
    fn name() -> &'static str;
}
