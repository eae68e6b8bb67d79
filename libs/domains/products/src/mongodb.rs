//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Decimal128, Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::decimal::{from_decimal128, to_decimal128};
use crate::error::{ProductError, ProductResult};
use crate::models::{Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Default collection name
pub const PRODUCTS_COLLECTION: &str = "products";

/// Stored shape of a product. The driver's own `_id` is left to MongoDB and
/// ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProductDocument {
    id: String,
    name: String,
    quantity: i32,
    price: Decimal128,
    status: bool,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

fn from_bson_datetime(value: bson::DateTime) -> ProductResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).ok_or_else(|| {
        ProductError::Database(format!("stored datetime out of range: {}", value))
    })
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            quantity: product.quantity,
            price: to_decimal128(product.price),
            status: product.status,
            created_at: to_bson_datetime(product.created_at),
            updated_at: to_bson_datetime(product.updated_at),
        }
    }
}

impl TryFrom<ProductDocument> for Product {
    type Error = ProductError;

    fn try_from(document: ProductDocument) -> ProductResult<Self> {
        let id = Uuid::parse_str(&document.id).map_err(|e| {
            ProductError::Database(format!("stored id '{}' is not a UUID: {}", document.id, e))
        })?;

        Ok(Self {
            id,
            name: document.name,
            quantity: document.quantity,
            price: from_decimal128(document.price)?,
            status: document.status,
            created_at: from_bson_datetime(document.created_at)?,
            updated_at: from_bson_datetime(document.updated_at)?,
        })
    }
}

/// `{"id": "<uuid>"}`
pub fn id_filter(id: Uuid) -> Document {
    doc! { "id": id.to_string() }
}

/// Both bounds exclusive, compared as Decimal128
pub fn price_range_filter(min: Decimal, max: Decimal) -> Document {
    doc! {
        "price": {
            "$gt": to_decimal128(min),
            "$lt": to_decimal128(max)
        }
    }
}

/// Update pipeline setting only the supplied fields plus `updated_at`.
///
/// `updated_at` becomes the later of `now` and the stored value plus one
/// millisecond, so it strictly increases even for updates landing in the
/// same millisecond.
pub fn build_update(changes: &UpdateProduct, now: DateTime<Utc>) -> Vec<Document> {
    let mut set = Document::new();

    if let Some(quantity) = changes.quantity {
        set.insert("quantity", quantity);
    }
    if let Some(price) = changes.price {
        set.insert("price", to_decimal128(price));
    }
    if let Some(status) = changes.status {
        set.insert("status", status);
    }
    set.insert(
        "updated_at",
        doc! { "$max": [to_bson_datetime(now), { "$add": ["$updated_at", 1_i64] }] },
    );

    vec![doc! { "$set": set }]
}

fn into_products(documents: Vec<ProductDocument>) -> ProductResult<Vec<Product>> {
    documents.into_iter().map(Product::try_from).collect()
}

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    /// Repository over the `products` collection of `db`
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ProductDocument>(collection_name),
        }
    }

    /// Unique index on `id`, ascending index on `price`. Idempotent.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_price".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert(&self, product: Product) -> ProductResult<Product> {
        self.collection
            .insert_one(ProductDocument::from(&product))
            .await?;

        tracing::info!(product_id = %product.id, "Product inserted");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(Product::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let documents: Vec<ProductDocument> =
            self.collection.find(doc! {}).await?.try_collect().await?;
        into_products(documents)
    }

    #[instrument(skip(self))]
    async fn find_by_price_range(&self, min: Decimal, max: Decimal) -> ProductResult<Vec<Product>> {
        let documents: Vec<ProductDocument> = self
            .collection
            .find(price_range_filter(min, max))
            .await?
            .try_collect()
            .await?;
        into_products(documents)
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        id: Uuid,
        changes: UpdateProduct,
        updated_at: DateTime<Utc>,
    ) -> ProductResult<Option<Product>> {
        let updated = self
            .collection
            .find_one_and_update(id_filter(id), build_update(&changes, updated_at))
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(product_id = %id, "Product updated");
        }

        updated.map(Product::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;

        tracing::info!(product_id = %id, deleted = result.deleted_count, "Product delete issued");
        Ok(result.deleted_count > 0)
    }
}
