//! Per-user bookshelf service

use crate::{
    error::{AppError, AppResult},
    models::shelf::{ShelfBook, ShelfEntry},
    opac::isbn,
    repository::Repository,
    services::acquisition::AcquisitionService,
};

#[derive(Clone)]
pub struct ShelfService {
    repository: Repository,
    acquisition: AcquisitionService,
}

impl ShelfService {
    pub fn new(repository: Repository, acquisition: AcquisitionService) -> Self {
        Self { repository, acquisition }
    }

    /// List a user's shelf with full catalog records
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<ShelfBook>> {
        self.repository.shelves.list_for_user(user_id).await
    }

    /// Add a book to a user's shelf by ISBN.
    ///
    /// Unknown ISBNs are acquired from the OPAC first; repeated additions
    /// bump the copy counter.
    pub async fn add(&self, user_id: i32, raw_isbn: &str) -> AppResult<ShelfBook> {
        let book = self.acquisition.acquire(raw_isbn).await?.book;
        let entry: ShelfEntry = self
            .repository
            .shelves
            .add_or_increment(user_id, &book.isbn)
            .await?;

        tracing::debug!(
            "User {} shelved {} (copies: {})",
            user_id,
            book.isbn,
            entry.nums
        );
        Ok(ShelfBook { book, nums: entry.nums })
    }

    /// Remove a book from a user's shelf
    pub async fn remove(&self, user_id: i32, raw_isbn: &str) -> AppResult<()> {
        let key = isbn::canonicalize(raw_isbn).ok_or_else(|| {
            AppError::InvalidIsbn(format!("{} is not a 10- or 13-digit ISBN", raw_isbn))
        })?;
        self.repository.shelves.remove(user_id, &key).await
    }
}
