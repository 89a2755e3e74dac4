//! Catalog management service
//!
//! Manual CRUD on the shared book catalog. Storage-key lookups use the
//! loose canonical form (length check only) so checksum-invalid ISBNs
//! already in the catalog stay reachable; manual creation applies the
//! strict checksum, matching the acquisition pipeline.

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, UpdateBook},
    opac::isbn,
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Canonicalize a user-supplied catalog key
    fn storage_key(raw_isbn: &str) -> AppResult<String> {
        isbn::canonicalize(raw_isbn).ok_or_else(|| {
            AppError::InvalidIsbn(format!("{} is not a 10- or 13-digit ISBN", raw_isbn))
        })
    }

    pub async fn list_books(&self, page: i64, per_page: i64) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.list(page, per_page).await
    }

    pub async fn get_book(&self, raw_isbn: &str) -> AppResult<Book> {
        let key = Self::storage_key(raw_isbn)?;
        self.repository.books.get_by_isbn(&key).await
    }

    /// Create a book from manually entered data
    pub async fn create_book(&self, mut book: Book) -> AppResult<Book> {
        let isbn = isbn::validate(&book.isbn).ok_or_else(|| {
            AppError::InvalidIsbn(format!("{} is not a valid ISBN-10/13", book.isbn))
        })?;
        book.isbn = isbn;

        if book.title.trim().is_empty() {
            return Err(AppError::Validation("Book title is required".to_string()));
        }

        self.repository.books.create(&book).await
    }

    pub async fn update_book(&self, raw_isbn: &str, update: UpdateBook) -> AppResult<Book> {
        let key = Self::storage_key(raw_isbn)?;
        if let Some(ref title) = update.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Book title cannot be empty".to_string()));
            }
        }
        self.repository.books.update(&key, &update).await
    }

    pub async fn delete_book(&self, raw_isbn: &str) -> AppResult<()> {
        let key = Self::storage_key(raw_isbn)?;
        self.repository.books.delete(&key).await
    }
}
