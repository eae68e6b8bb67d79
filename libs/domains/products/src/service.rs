//! Product Service - use-case layer

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct, now_ms};
use crate::repository::ProductRepository;

/// Product operations over an injected repository
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a product. Nothing is stored when a business field is null.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::try_new(input).inspect_err(|e| {
            tracing::info!("Rejected product creation: {}", e);
        })?;

        self.repository.insert(product).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn query(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_all().await
    }

    /// Products priced strictly between `min` and `max`
    #[instrument(skip(self))]
    pub async fn query_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        self.repository.find_by_price_range(min, max).await
    }

    /// Apply a partial update; the returned shape carries a freshly stamped
    /// `updated_at`
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: Uuid, changes: UpdateProduct) -> ProductResult<Product> {
        self.repository
            .update(id, changes, now_ms())
            .await?
            .map(Product::restamped)
            .ok_or(ProductError::NotFound(id))
    }

    /// Delete after confirming the product exists.
    ///
    /// Returns `false` when the product vanished between the lookup and the
    /// delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }

        self.repository.delete(id).await
    }
}
