use serde::{Deserialize, Serialize};

/// Discrete nutrient level printed on a product's nutrition facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NutritionLevel {
    Low,
    Moderate,
    High,
}

impl NutritionLevel {
    pub const ALL: [NutritionLevel; 3] = [Self::Low, Self::Moderate, Self::High];

    pub fn code(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(trimmed))
    }
}

/// Nutri-Score grade. Declaration order is the scale order (`A` is best).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NutriScore {
    A,
    B,
    C,
    D,
    E,
}

impl NutriScore {
    pub const ALL: [NutriScore; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    pub fn code(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.code().eq_ignore_ascii_case(trimmed))
    }
}

/// Lowest and highest valid NOVA food processing group.
pub const NOVA_GROUP_RANGE: std::ops::RangeInclusive<i32> = 1..=4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub manufacturer: Option<String>,
    pub fat: Option<NutritionLevel>,
    pub saturated_fat: Option<NutritionLevel>,
    pub sugars: Option<NutritionLevel>,
    pub salt: Option<NutritionLevel>,
    pub is_vegan: bool,
    pub is_vegetarian: bool,
    pub is_gluten_free: bool,
    pub is_palm_oil_free: bool,
    pub is_dairy_free: bool,
    pub nutri_score: Option<NutriScore>,
    pub nova_group: Option<i32>,
}
