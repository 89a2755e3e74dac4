//! Bookshelf (user-book association) repository

use sqlx::{FromRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        shelf::{ShelfBook, ShelfEntry},
    },
};

#[derive(Clone)]
pub struct ShelvesRepository {
    pool: Pool<Postgres>,
}

impl ShelvesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List a user's shelf joined with the catalog records
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<ShelfBook>> {
        let rows = sqlx::query(
            r#"
            SELECT b.*, ub.nums
            FROM user_books ub
            JOIN books b ON b.isbn = ub.isbn
            WHERE ub.user_id = $1
            ORDER BY b.title, b.isbn
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut shelf = Vec::with_capacity(rows.len());
        for row in rows {
            let book = Book::from_row(&row)?;
            let nums: i32 = row.try_get("nums")?;
            shelf.push(ShelfBook { book, nums });
        }
        Ok(shelf)
    }

    /// Add a book to a user's shelf, bumping the copy counter when it is
    /// already there.
    pub async fn add_or_increment(&self, user_id: i32, isbn: &str) -> AppResult<ShelfEntry> {
        let entry = sqlx::query_as::<_, ShelfEntry>(
            r#"
            INSERT INTO user_books (user_id, isbn, nums)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, isbn)
            DO UPDATE SET nums = user_books.nums + 1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(isbn)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Remove a book from a user's shelf entirely
    pub async fn remove(&self, user_id: i32, isbn: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM user_books WHERE user_id = $1 AND isbn = $2")
            .bind(user_id)
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book {} is not on this shelf",
                isbn
            )));
        }
        Ok(())
    }
}
