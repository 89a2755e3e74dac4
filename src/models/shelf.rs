//! Bookshelf (user-book association) models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Book;

/// A user's hold on a catalog book, with a copy counter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShelfEntry {
    pub user_id: i32,
    pub isbn: String,
    /// Number of copies on the shelf, always >= 1
    pub nums: i32,
}

/// A shelf entry joined with its catalog record, as returned by shelf
/// listings.
#[derive(Debug, Clone, Serialize)]
pub struct ShelfBook {
    #[serde(flatten)]
    pub book: Book,
    pub nums: i32,
}
