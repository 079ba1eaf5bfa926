use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Business, Product};

/// A business's stock record for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i64,
    pub product: Product,
    pub business: Business,
    pub quantity: i64,
    pub price_per_item: Option<f64>,
    pub total_price: Option<f64>,
    pub manufactured: Option<NaiveDate>,
    pub sell_by: Option<NaiveDate>,
    pub best_before: Option<NaiveDate>,
    pub expires: NaiveDate,
}

/// An inventory item offered for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub inventory_item: InventoryItem,
    pub quantity: i64,
    pub price: f64,
    pub more_info: Option<String>,
    pub created: DateTime<Utc>,
    pub closes: DateTime<Utc>,
}

impl Listing {
    pub fn product(&self) -> &Product {
        &self.inventory_item.product
    }

    pub fn business(&self) -> &Business {
        &self.inventory_item.business
    }
}
