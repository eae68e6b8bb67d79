use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};

/// Business fields a create request must carry, checked individually
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "quantity", "price", "status"];

/// Product entity as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Samsung A34 PRO")]
    pub name: String,
    #[schema(example = 1500)]
    pub quantity: i32,
    /// Exact decimal, serialized as a string that keeps its scale
    #[schema(value_type = String, example = "4.800")]
    pub price: Decimal,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request. Every field is optional at the type level so a missing
/// one is reported by name instead of as a parse error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    #[schema(example = "Samsung A34 PRO")]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "ensure this value is greater than or equal to 0"))]
    #[schema(example = 1500)]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "exact_decimal")]
    #[schema(value_type = Option<String>, example = "4.800")]
    pub price: Option<Decimal>,
    #[schema(example = true)]
    pub status: Option<bool>,
}

/// Partial update. `name` and `id` are not updatable; unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(range(min = 0, message = "ensure this value is greater than or equal to 0"))]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "exact_decimal")]
    #[schema(value_type = Option<String>, example = "5.250")]
    pub price: Option<Decimal>,
    pub status: Option<bool>,
}

/// Query string of `GET /products`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Exclusive lower bound, requires `max_price`
    #[serde(default, deserialize_with = "exact_decimal")]
    #[param(value_type = Option<String>, example = "1.00")]
    pub min_price: Option<Decimal>,
    /// Exclusive upper bound, requires `min_price`
    #[serde(default, deserialize_with = "exact_decimal")]
    #[param(value_type = Option<String>, example = "10.00")]
    pub max_price: Option<Decimal>,
}

impl ProductQuery {
    /// `Some((min, max))` when both bounds are given, `None` when neither is
    pub fn price_range(&self) -> ProductResult<Option<(Decimal, Decimal)>> {
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => Ok(Some((min, max))),
            (None, None) => Ok(None),
            _ => Err(ProductError::InvalidPriceRange),
        }
    }
}

/// Decimal as sent by a client, string or JSON number
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

/// Optional decimal that must be representable without rounding.
///
/// Inputs with more than 28 fractional digits or a coefficient wider than
/// 96 bits are rejected instead of being silently rounded.
fn exact_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<RawDecimal>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let text = match raw {
        RawDecimal::Text(text) => text,
        RawDecimal::Signed(value) => value.to_string(),
        RawDecimal::Unsigned(value) => value.to_string(),
        RawDecimal::Float(value) => value.to_string(),
    };

    Decimal::from_str_exact(text.trim())
        .map(Some)
        .map_err(|e| D::Error::custom(format!("'{}' is not an exact decimal: {}", text, e)))
}

/// Current time truncated to the millisecond precision of BSON datetimes
pub fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

impl CreateProduct {
    /// Names of the required fields that are null, sorted ascending
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.name.is_some(),
            self.quantity.is_some(),
            self.price.is_some(),
            self.status.is_some(),
        ];

        let mut missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, is_present)| !is_present)
            .map(|(name, _)| *name)
            .collect();
        missing.sort_unstable();
        missing
    }
}

impl Product {
    /// Build a new product with a fresh id and `created_at == updated_at`.
    ///
    /// Fails with [`ProductError::Insertion`] when any business field is null.
    pub fn try_new(input: CreateProduct) -> ProductResult<Self> {
        let missing = input.missing_fields();

        match input {
            CreateProduct {
                name: Some(name),
                quantity: Some(quantity),
                price: Some(price),
                status: Some(status),
            } => {
                let now = now_ms();
                Ok(Self {
                    id: Uuid::new_v4(),
                    name,
                    quantity,
                    price,
                    status,
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(ProductError::Insertion { missing }),
        }
    }

    /// Update response shape: `updated_at` refreshed to the current time,
    /// never moving backwards
    pub fn restamped(mut self) -> Self {
        self.updated_at = now_ms().max(self.updated_at);
        self
    }
}
