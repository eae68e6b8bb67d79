use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::DecimalConversionError;

#[derive(Debug, Error)]
pub enum ProductError {
    /// Create input with null business fields; `missing` is sorted
    #[error("Wrong Insertion: fields required {}", quoted_list(.missing))]
    Insertion { missing: Vec<&'static str> },

    #[error("Product not found with filter: {0}")]
    NotFound(Uuid),

    #[error("Both min_price and max_price are required to filter by price")]
    InvalidPriceRange,

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// `['a', 'b']`
fn quoted_list(names: &[&str]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| format!("'{}'", name)).collect();
    format!("[{}]", quoted.join(", "))
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Insertion { .. } | ProductError::InvalidPriceRange => {
                AppError::UnprocessableEntity(err.to_string())
            }
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<DecimalConversionError> for ProductError {
    fn from(err: DecimalConversionError) -> Self {
        ProductError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_insertion_message_uses_quoted_list() {
        let err = ProductError::Insertion {
            missing: vec!["price", "status"],
        };
        assert_eq!(
            err.to_string(),
            "Wrong Insertion: fields required ['price', 'status']"
        );
    }

    #[test]
    fn test_not_found_message_names_the_id() {
        let id = Uuid::new_v4();
        assert_eq!(
            ProductError::NotFound(id).to_string(),
            format!("Product not found with filter: {}", id)
        );
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ProductError::Insertion {
                    missing: vec!["name"],
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ProductError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                ProductError::InvalidPriceRange,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ProductError::Database("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
