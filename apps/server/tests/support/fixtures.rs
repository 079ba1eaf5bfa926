use super::builders::{business, utc, ListingBuilder};
use wasteless::models::{Business, BusinessType, Listing, NutriScore, NutritionLevel};

pub mod ids {
    pub const MILK: i64 = 1;
    pub const BREAD_ROLL: i64 = 2;
    pub const MILK_CHOCOLATE: i64 = 3;
    pub const OAT_MILK: i64 = 4;
    pub const SOURDOUGH: i64 = 5;
    pub const CHEESE: i64 = 6;

    pub const COUNTDOWN: i64 = 10;
    pub const BAKERY: i64 = 20;
    pub const OP_SHOP: i64 = 30;
    pub const CORNER_STORE: i64 = 1;
}

pub fn countdown() -> Business {
    business(ids::COUNTDOWN, "Countdown", BusinessType::Retail, "Christchurch")
}

pub fn bakery() -> Business {
    business(
        ids::BAKERY,
        "Bakery Cafe",
        BusinessType::AccommodationAndFood,
        "Wellington",
    )
}

pub fn op_shop() -> Business {
    business(ids::OP_SHOP, "Op Shop", BusinessType::Charity, "Auckland")
}

/// Six listings across four businesses.
///
/// | id | product         | business     | price | closes           |
/// |----|-----------------|--------------|-------|------------------|
/// | 1  | Milk            | Countdown    | 3.5   | 2024-06-01 10:00 |
/// | 2  | Bread Roll      | Bakery Cafe  | 6     | 2024-06-15 12:00 |
/// | 3  | Milk Chocolate  | Op Shop      | 8     | 2024-05-20 12:00 |
/// | 4  | Oat Milk        | Corner Store | 12    | 2024-07-10 12:00 |
/// | 5  | Sourdough Bread | Bakery Cafe  | 9.5   | 2024-06-01 23:00 |
/// | 6  | Cheese          | Countdown    | 15    | 2024-08-01 12:00 |
pub fn catalog() -> Vec<Listing> {
    vec![
        ListingBuilder::new(ids::MILK)
            .product_name("Milk")
            .business(countdown())
            .price(3.5)
            .created(utc(2024, 5, 3, 9))
            .closes(utc(2024, 6, 1, 10))
            .fat(NutritionLevel::Low)
            .nutri_score(NutriScore::A)
            .nova_group(1)
            .build(),
        ListingBuilder::new(ids::BREAD_ROLL)
            .product_name("Bread Roll")
            .business(bakery())
            .price(6.0)
            .created(utc(2024, 5, 6, 9))
            .closes(utc(2024, 6, 15, 12))
            .fat(NutritionLevel::Moderate)
            .vegan()
            .nutri_score(NutriScore::B)
            .nova_group(3)
            .build(),
        ListingBuilder::new(ids::MILK_CHOCOLATE)
            .product_name("Milk Chocolate")
            .business(op_shop())
            .price(8.0)
            .created(utc(2024, 5, 1, 9))
            .closes(utc(2024, 5, 20, 12))
            .fat(NutritionLevel::High)
            .nutri_score(NutriScore::E)
            .nova_group(4)
            .build(),
        ListingBuilder::new(ids::OAT_MILK)
            .product_name("Oat Milk")
            .price(12.0)
            .created(utc(2024, 5, 2, 9))
            .closes(utc(2024, 7, 10, 12))
            .fat(NutritionLevel::Low)
            .vegan()
            .nutri_score(NutriScore::B)
            .nova_group(2)
            .build(),
        ListingBuilder::new(ids::SOURDOUGH)
            .product_name("Sourdough Bread")
            .business(bakery())
            .price(9.5)
            .created(utc(2024, 5, 5, 9))
            .closes(utc(2024, 6, 1, 23))
            .fat(NutritionLevel::Low)
            .nutri_score(NutriScore::C)
            .nova_group(3)
            .build(),
        ListingBuilder::new(ids::CHEESE)
            .product_name("Cheese")
            .business(countdown())
            .price(15.0)
            .created(utc(2024, 5, 4, 9))
            .closes(utc(2024, 8, 1, 12))
            .fat(NutritionLevel::High)
            .nutri_score(NutriScore::D)
            .nova_group(3)
            .build(),
    ]
}
