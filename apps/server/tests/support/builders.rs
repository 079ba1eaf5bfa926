use axum::body::Bytes;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use wasteless::models::{
    Address, Business, BusinessType, InventoryItem, Listing, NutriScore, NutritionLevel, Product,
};

/// Converts a JSON value to request body bytes
pub fn to_json_body(value: &serde_json::Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid test timestamp")
}

pub fn business(id: i64, name: &str, business_type: BusinessType, city: &str) -> Business {
    Business {
        id,
        name: name.to_string(),
        business_type,
        address: Address {
            city: city.to_string(),
            country: "New Zealand".to_string(),
        },
    }
}

/// Builder for listings with a default product and business
pub struct ListingBuilder {
    id: i64,
    product: Product,
    business: Business,
    price: f64,
    quantity: i64,
    created: DateTime<Utc>,
    closes: DateTime<Utc>,
}

impl ListingBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            product: Product {
                id,
                name: "Product".to_string(),
                manufacturer: None,
                fat: None,
                saturated_fat: None,
                sugars: None,
                salt: None,
                is_vegan: false,
                is_vegetarian: false,
                is_gluten_free: false,
                is_palm_oil_free: false,
                is_dairy_free: false,
                nutri_score: None,
                nova_group: None,
            },
            business: business(1, "Corner Store", BusinessType::Retail, "Christchurch"),
            price: 1.0,
            quantity: 1,
            created: utc(2024, 5, 1, 9),
            closes: utc(2024, 7, 1, 12),
        }
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product.name = name.into();
        self
    }

    pub fn business(mut self, business: Business) -> Self {
        self.business = business;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn closes(mut self, closes: DateTime<Utc>) -> Self {
        self.closes = closes;
        self
    }

    pub fn fat(mut self, level: NutritionLevel) -> Self {
        self.product.fat = Some(level);
        self
    }

    pub fn vegan(mut self) -> Self {
        self.product.is_vegan = true;
        self.product.is_vegetarian = true;
        self
    }

    pub fn nutri_score(mut self, score: NutriScore) -> Self {
        self.product.nutri_score = Some(score);
        self
    }

    pub fn nova_group(mut self, group: i32) -> Self {
        self.product.nova_group = Some(group);
        self
    }

    pub fn build(self) -> Listing {
        Listing {
            id: self.id,
            inventory_item: InventoryItem {
                id: self.id,
                product: self.product,
                business: self.business,
                quantity: self.quantity * 2,
                price_per_item: Some(self.price / self.quantity as f64),
                total_price: Some(self.price),
                manufactured: None,
                sell_by: None,
                best_before: None,
                expires: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid test date"),
            },
            quantity: self.quantity,
            price: self.price,
            more_info: None,
            created: self.created,
            closes: self.closes,
        }
    }
}
