use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, UpdateProduct};

/// Data access for products.
///
/// Implementations only store and fetch; required-field checks, id and
/// timestamp generation stay in the service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a fully built product and return it
    async fn insert(&self, product: Product) -> ProductResult<Product>;

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Every product, in store order
    async fn find_all(&self) -> ProductResult<Vec<Product>>;

    /// Products with `min < price < max`
    async fn find_by_price_range(&self, min: Decimal, max: Decimal)
    -> ProductResult<Vec<Product>>;

    /// Apply the supplied fields plus `updated_at` in one atomic step and
    /// return the document after the update, or `None` when `id` matches
    /// nothing
    async fn update(
        &self,
        id: Uuid,
        changes: UpdateProduct,
        updated_at: DateTime<Utc>,
    ) -> ProductResult<Option<Product>>;

    /// True when a document was removed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}
