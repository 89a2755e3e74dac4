//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Find a book by canonical ISBN
    pub async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Get a book by canonical ISBN, failing when absent
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// List books with simple pagination, ordered by title
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<Book>, i64)> {
        let offset = (page - 1) * per_page;

        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books ORDER BY title, isbn LIMIT $1 OFFSET $2",
        )
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Insert a new book record.
    ///
    /// A primary-key collision maps to [`AppError::Duplicate`] so callers
    /// can tell a lost creation race apart from other database failures.
    pub async fn create(&self, book: &Book) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                isbn, title, author, translator, genre, country, era,
                opac_nlc_class, publisher, publish_year, page, cover_url, description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.translator)
        .bind(&book.genre)
        .bind(&book.country)
        .bind(&book.era)
        .bind(&book.opac_nlc_class)
        .bind(&book.publisher)
        .bind(book.publish_year)
        .bind(book.page)
        .bind(&book.cover_url)
        .bind(&book.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::Duplicate(format!("Book with ISBN {} already exists", book.isbn))
            }
            _ => AppError::Database(e),
        })?;

        Ok(created)
    }

    /// Update the mutable fields of an existing book
    pub async fn update(&self, isbn: &str, update: &UpdateBook) -> AppResult<Book> {
        let existing = self.get_by_isbn(isbn).await?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $2, author = $3, publisher = $4
            WHERE isbn = $1
            RETURNING *
            "#,
        )
        .bind(isbn)
        .bind(update.title.as_ref().unwrap_or(&existing.title))
        .bind(update.author.as_ref().unwrap_or(&existing.author))
        .bind(update.publisher.as_ref().unwrap_or(&existing.publisher))
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a book (shelf entries cascade)
    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book with ISBN {} not found",
                isbn
            )));
        }
        Ok(())
    }
}
