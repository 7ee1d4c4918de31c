//! Wishlist entry and the product fields embedded in it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::{ProductId, Timestamp, UserId, WishlistEntryId};

/// Denormalized product display fields carried on each entry.
///
/// The store never caches products on their own; whatever the server
/// embedded at list time is what the UI renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub name: String,

    #[serde(deserialize_with = "price_from_number_or_string")]
    pub price: f64,

    #[serde(default, alias = "image", alias = "imageUrl")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub category_name: Option<String>,
}

/// One (user, product) relationship held server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: WishlistEntryId,
    pub user_id: UserId,
    pub product_id: ProductId,

    #[serde(default, alias = "Product")]
    pub product: Option<ProductSummary>,

    #[serde(alias = "createdAt")]
    pub added_at: Timestamp,
}

impl WishlistEntry {
    /// Display name, falling back to the product id when no summary was embedded.
    pub fn display_name(&self) -> String {
        self.product
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Product #{}", self.product_id))
    }
}

// DECIMAL columns come back from the server as strings ("24.99").
fn price_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(n) => Ok(n),
        Price::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}
