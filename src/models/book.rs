//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Storage field limits for book records.
///
/// These mirror the column lengths in the `books` table; the OPAC
/// normalizer truncates to them before insertion.
pub mod limits {
    pub const TITLE: usize = 100;
    pub const AUTHOR: usize = 255;
    pub const TRANSLATOR: usize = 255;
    pub const GENRE: usize = 30;
    pub const COUNTRY: usize = 30;
    pub const ERA: usize = 20;
    pub const OPAC_NLC_CLASS: usize = 20;
    pub const PUBLISHER: usize = 100;
    pub const COVER_URL: usize = 255;
    pub const DESCRIPTION: usize = 1000;
}

/// A catalog book record, keyed by canonical ISBN.
///
/// `isbn` and `title` are always non-empty for a persisted record; every
/// other field degrades to an empty string (or zero) when the source had
/// nothing usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Canonical ISBN, 10 or 13 characters, immutable after creation
    pub isbn: String,
    pub title: String,
    /// Author names joined with a full-width semicolon "；"
    pub author: String,
    pub translator: String,
    /// Classification facets derived from OPAC subject tags
    pub genre: String,
    pub country: String,
    pub era: String,
    /// Chinese Library Classification code (中图分类号)
    pub opac_nlc_class: String,
    pub publisher: String,
    pub publish_year: Option<i32>,
    /// Page count; 0 means unknown
    pub page: i32,
    pub cover_url: String,
    pub description: String,
}

impl Book {
    /// Build an empty record for the given ISBN.
    #[cfg(test)]
    pub fn empty(isbn: String) -> Self {
        Self {
            isbn,
            title: String::new(),
            author: String::new(),
            translator: String::new(),
            genre: String::new(),
            country: String::new(),
            era: String::new(),
            opac_nlc_class: String::new(),
            publisher: String::new(),
            publish_year: None,
            page: 0,
            cover_url: String::new(),
            description: String::new(),
        }
    }
}

/// Mutable subset of a book record; the ISBN itself is never updated.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
}
