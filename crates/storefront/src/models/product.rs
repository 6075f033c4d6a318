//! Product catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tienda_core::{PriceValue, ProductId, StockValue};

/// A product record as stored in the remote collection.
///
/// Field names follow the remote schema (`nombre`, `precio`, `imagen`);
/// price and stock stay in their raw wire shape and are parsed at the point
/// of use, since the store does not enforce field types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned record ID.
    pub id: ProductId,
    /// Display name.
    #[serde(rename = "nombre", default)]
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional image URL.
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price in whatever shape the store holds it.
    #[serde(rename = "precio", default)]
    pub price: PriceValue,
    /// Available stock in whatever shape the store holds it.
    #[serde(default)]
    pub stock: StockValue,
    /// Server-assigned creation timestamp.
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Validation errors for a product payload submitted from the admin screens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// The name is empty or whitespace.
    #[error("product name is required")]
    MissingName,
    /// The price does not parse to a non-negative decimal.
    #[error("product price must be a non-negative number")]
    InvalidPrice,
    /// The stock does not parse to a non-negative integer.
    #[error("product stock must be a non-negative integer")]
    InvalidStock,
}

/// Payload for creating or updating a product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional image URL.
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price.
    #[serde(rename = "precio")]
    pub price: PriceValue,
    /// Available stock.
    pub stock: StockValue,
}

impl NewProduct {
    /// Validate the payload the way the admin form does before submitting.
    ///
    /// # Errors
    ///
    /// Returns `ProductValidationError` when the name is empty or the price
    /// or stock fields do not parse to non-negative values.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::MissingName);
        }
        match self.price.parse() {
            Some(p) if p >= rust_decimal::Decimal::ZERO => {}
            _ => return Err(ProductValidationError::InvalidPrice),
        }
        if self.stock.parse().is_none() {
            return Err(ProductValidationError::InvalidStock);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_deserializes_remote_shape() {
        let product: Product = serde_json::from_value(json!({
            "id": "3",
            "nombre": "Mate Imperial",
            "precio": "1500.50",
            "stock": "12",
            "imagen": "https://example.com/mate.jpg",
            "createdAt": "2025-04-29T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "3");
        assert_eq!(product.name, "Mate Imperial");
        assert_eq!(product.stock.parse(), Some(12));
        assert_eq!(product.price.or_zero().to_string(), "1500.50");
    }

    #[test]
    fn test_product_tolerates_missing_fields() {
        let product: Product = serde_json::from_value(json!({ "id": "9" })).unwrap();
        assert!(product.name.is_empty());
        assert_eq!(product.stock.parse(), None);
    }

    #[test]
    fn test_new_product_serializes_wire_names() {
        let payload = NewProduct {
            name: "Bombilla".to_owned(),
            description: None,
            image: None,
            price: PriceValue::Text("300".to_owned()),
            stock: StockValue::Int(4),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["nombre"], "Bombilla");
        assert_eq!(value["precio"], "300");
        assert_eq!(value["stock"], 4);
        assert!(value.get("imagen").is_none());
    }

    #[test]
    fn test_new_product_validation() {
        let mut payload = NewProduct {
            name: "  ".to_owned(),
            description: None,
            image: None,
            price: PriceValue::Int(10),
            stock: StockValue::Int(1),
        };
        assert_eq!(
            payload.validate(),
            Err(ProductValidationError::MissingName)
        );

        payload.name = "Yerba".to_owned();
        assert_eq!(payload.validate(), Ok(()));

        payload.stock = StockValue::Text("lots".to_owned());
        assert_eq!(
            payload.validate(),
            Err(ProductValidationError::InvalidStock)
        );

        payload.stock = StockValue::Int(1);
        payload.price = PriceValue::Text("n/a".to_owned());
        assert_eq!(
            payload.validate(),
            Err(ProductValidationError::InvalidPrice)
        );
    }
}
