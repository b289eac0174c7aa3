//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook},
    repository::Repository,
};

/// Demo catalog: title, author, category, year, copies, description
const SAMPLE_BOOKS: &[(&str, &str, &str, i32, i32, &str)] = &[
    ("Đắc Nhân Tâm", "Dale Carnegie", "Self-help", 2020, 5, "A book on communication skills"),
    ("Sapiens", "Yuval Noah Harari", "History", 2018, 3, "A brief history of humankind"),
    ("Clean Code", "Robert C. Martin", "Technology", 2019, 4, "Writing clean code"),
    ("Hoàng Tử Bé", "Antoine de Saint-Exupéry", "Literature", 2015, 6, "A children's tale"),
    ("Nhà Giả Kim", "Paulo Coelho", "Literature", 2017, 5, "A philosophical novel"),
];

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book; every copy starts available
    pub async fn add(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(
            "Catalog: added book id={} '{}' ({} copies)",
            created.id,
            created.title,
            created.total_copies
        );
        Ok(created)
    }

    /// Remove a book that nobody is currently borrowing
    pub async fn remove(&self, book_id: i32) -> AppResult<()> {
        match self.repository.books.delete(book_id).await {
            Ok(book) => {
                tracing::info!("Catalog: removed book id={} '{}'", book.id, book.title);
                Ok(())
            }
            Err(AppError::BookInUse(id)) => {
                tracing::warn!("Catalog: refused to remove book id={} with open borrows", id);
                Err(AppError::BookInUse(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Add copies to both the total and the available count
    pub async fn restock(&self, book_id: i32, delta: i32) -> AppResult<Book> {
        if delta <= 0 {
            return Err(AppError::InvalidQuantity(delta));
        }

        let book = self.repository.books.restock(book_id, delta).await?;
        tracing::info!(
            "Catalog: restocked book id={} by {} (total={}, available={})",
            book.id,
            delta,
            book.total_copies,
            book.available_copies
        );
        Ok(book)
    }

    pub async fn get(&self, book_id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(book_id).await
    }

    /// All books, newest first
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_all().await
    }

    /// Fill an empty catalog with the demo books. Returns how many were added.
    pub async fn seed_samples(&self) -> AppResult<usize> {
        let (titles, _, _) = self.repository.books.copy_totals().await?;
        if titles > 0 {
            return Ok(0);
        }

        for &(title, author, category, year, copies, description) in SAMPLE_BOOKS {
            self.repository
                .books
                .create(&CreateBook {
                    title: title.to_string(),
                    author: author.to_string(),
                    category: category.to_string(),
                    year: Some(year),
                    total_copies: copies,
                    image_ref: None,
                    description: Some(description.to_string()),
                })
                .await?;
        }

        tracing::info!("Catalog: seeded {} sample books", SAMPLE_BOOKS.len());
        Ok(SAMPLE_BOOKS.len())
    }
}
