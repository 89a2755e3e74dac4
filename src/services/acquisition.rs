//! ISBN-driven book metadata acquisition
//!
//! Orchestrates the OPAC pipeline: validate the ISBN, short-circuit on a
//! catalog hit, fetch and parse the remote record, normalize it and
//! persist. Stateless apart from the final insert; concurrent callers on
//! the same ISBN are serialized by the primary-key constraint, and a lost
//! race is resolved by re-reading the winner's record.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Book,
    opac::{self, MetadataSource},
    repository::books::BooksRepository,
};

/// Persistence seam consumed by the pipeline. The production
/// implementation is [`BooksRepository`]; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;
    /// Must fail with [`AppError::Duplicate`] on a primary-key race.
    async fn create(&self, book: &Book) -> AppResult<Book>;
}

#[async_trait]
impl CatalogStore for BooksRepository {
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        BooksRepository::find_by_isbn(self, isbn).await
    }

    async fn create(&self, book: &Book) -> AppResult<Book> {
        BooksRepository::create(self, book).await
    }
}

/// Outcome of a successful acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquired {
    pub book: Book,
    /// false when the record already existed, either as a catalog hit
    /// before fetching or as the winner of a concurrent creation race
    pub created: bool,
}

#[derive(Clone)]
pub struct AcquisitionService {
    store: Arc<dyn CatalogStore>,
    source: Arc<dyn MetadataSource>,
}

impl AcquisitionService {
    pub fn new(store: Arc<dyn CatalogStore>, source: Arc<dyn MetadataSource>) -> Self {
        Self { store, source }
    }

    /// Acquire a catalog record for a raw ISBN string.
    ///
    /// Idempotent: an ISBN that is already cataloged is returned unchanged
    /// without touching the network, flagged via [`Acquired::created`].
    pub async fn acquire(&self, raw_isbn: &str) -> AppResult<Acquired> {
        let isbn = opac::isbn::validate(raw_isbn).ok_or_else(|| {
            AppError::InvalidIsbn(format!("{} is not a valid ISBN-10/13", raw_isbn))
        })?;

        if let Some(existing) = self.store.find_by_isbn(&isbn).await? {
            tracing::debug!("ISBN {} already cataloged, skipping OPAC lookup", isbn);
            return Ok(Acquired {
                book: existing,
                created: false,
            });
        }

        tracing::info!("Acquiring OPAC metadata for ISBN {}", isbn);
        let html = self.source.fetch(&isbn).await?;

        let meta = opac::parser::parse(&html, &isbn).ok_or_else(|| {
            tracing::warn!(
                "OPAC markup for ISBN {} did not match the expected structure ({} bytes)",
                isbn,
                html.len()
            );
            AppError::UnparseableResponse(format!(
                "no record table in OPAC response for ISBN {}",
                isbn
            ))
        })?;

        let book = opac::normalizer::normalize(&meta).ok_or_else(|| {
            AppError::IncompleteMetadata(format!(
                "OPAC record for ISBN {} is missing required fields",
                isbn
            ))
        })?;

        match self.store.create(&book).await {
            Ok(created) => {
                tracing::info!("Cataloged ISBN {} ({})", created.isbn, created.title);
                Ok(Acquired {
                    book: created,
                    created: true,
                })
            }
            Err(AppError::Duplicate(_)) => {
                // Another caller won the creation race for this ISBN;
                // their record is the canonical one.
                tracing::debug!("Creation race on ISBN {}, returning existing record", isbn);
                let book = self.store.find_by_isbn(&isbn).await?.ok_or_else(|| {
                    AppError::Internal(format!(
                        "Book {} vanished after duplicate-key conflict",
                        isbn
                    ))
                })?;
                Ok(Acquired {
                    book,
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }
}
